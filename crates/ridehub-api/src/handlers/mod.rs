//! HTTP request handlers, organized by domain.

pub mod device;
pub mod health;
pub mod notification;
pub mod trip;
