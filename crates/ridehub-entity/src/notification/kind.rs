//! Notification kind enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::trip::TripStatus;

/// The logical event a notification announces.
///
/// Mirrors trip lifecycle statuses, plus the driver-facing
/// `NewTripAvailable` announcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_kind", rename_all = "snake_case")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    /// A new unclaimed trip is available to a driver.
    NewTripAvailable,
    /// A driver accepted the rider's trip.
    DriverAccepted,
    /// The driver is on the way.
    DriverInWay,
    /// The driver arrived at pickup.
    DriverArrived,
    /// The rider was picked up.
    UserPickedUp,
    /// The trip is underway.
    DriverInProgress,
    /// The trip completed.
    TripCompleted,
    /// The trip was cancelled.
    TripCancelled,
}

impl NotificationKind {
    /// Map a lifecycle status to its notification kind.
    ///
    /// `Waiting` is not announced through the lifecycle path (new trips
    /// go out as `NewTripAvailable` via the fanout dispatcher).
    pub fn from_status(status: TripStatus) -> Option<Self> {
        match status {
            TripStatus::Waiting => None,
            TripStatus::DriverAccepted => Some(Self::DriverAccepted),
            TripStatus::DriverInWay => Some(Self::DriverInWay),
            TripStatus::DriverArrived => Some(Self::DriverArrived),
            TripStatus::UserPickedUp => Some(Self::UserPickedUp),
            TripStatus::DriverInProgress => Some(Self::DriverInProgress),
            TripStatus::TripCompleted => Some(Self::TripCompleted),
            TripStatus::TripCancelled => Some(Self::TripCancelled),
        }
    }

    /// The event-type string carried in push payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NewTripAvailable => "NEW_TRIP_AVAILABLE",
            Self::DriverAccepted => "DRIVER_ACCEPTED",
            Self::DriverInWay => "DRIVER_IN_WAY",
            Self::DriverArrived => "DRIVER_ARRIVED",
            Self::UserPickedUp => "USER_PICKED_UP",
            Self::DriverInProgress => "DRIVER_IN_PROGRESS",
            Self::TripCompleted => "TRIP_COMPLETED",
            Self::TripCancelled => "TRIP_CANCELLED",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
