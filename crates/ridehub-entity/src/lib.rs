//! # ridehub-entity
//!
//! Domain entity models for RideHub: trips and their lifecycle statuses,
//! users (riders and drivers), and stored notifications.

pub mod notification;
pub mod trip;
pub mod user;
