//! Repository implementations over sqlx/PostgreSQL.

pub mod notification;
pub mod trip;
pub mod user;
