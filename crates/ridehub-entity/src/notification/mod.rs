//! Notification entity: stored record and kind enumeration.

pub mod kind;
pub mod model;

pub use kind::NotificationKind;
pub use model::{NewNotification, Notification};
