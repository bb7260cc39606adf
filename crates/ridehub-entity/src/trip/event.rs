//! Trip lifecycle events.
//!
//! Emitted by the lifecycle service after a transition has been
//! persisted, and consumed by the notification layer.

use serde::{Deserialize, Serialize};

use super::model::Trip;
use super::status::TripStatus;

/// A persisted trip status transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripEvent {
    /// The trip as it looks after the transition.
    pub trip: Trip,
    /// The status the trip left.
    pub previous: TripStatus,
    /// The status the trip entered.
    pub new: TripStatus,
}

impl TripEvent {
    /// Create an event for a persisted transition.
    pub fn new(trip: Trip, previous: TripStatus, new: TripStatus) -> Self {
        Self {
            trip,
            previous,
            new,
        }
    }
}
