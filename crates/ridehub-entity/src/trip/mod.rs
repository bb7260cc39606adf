//! Trip entity: model, lifecycle status, and lifecycle events.

pub mod event;
pub mod model;
pub mod status;

pub use event::TripEvent;
pub use model::{CreateTrip, DriverSnapshot, Trip};
pub use status::TripStatus;
