//! Trip lifecycle status enumeration and its transition graph.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a trip.
///
/// Statuses move only forward through the transition graph; no status is
/// ever revisited. `Completed` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "trip_status", rename_all = "snake_case")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TripStatus {
    /// Created by a rider, not yet claimed by any driver.
    Waiting,
    /// A driver accepted the trip.
    DriverAccepted,
    /// The driver is on the way to the pickup location.
    DriverInWay,
    /// The driver arrived at the pickup location.
    DriverArrived,
    /// The rider is in the vehicle.
    UserPickedUp,
    /// The trip is underway.
    DriverInProgress,
    /// The trip finished normally.
    TripCompleted,
    /// The trip was cancelled before completion.
    TripCancelled,
}

impl TripStatus {
    /// Statuses reachable from this one.
    ///
    /// This table is authoritative: a transition is valid iff the
    /// requested status appears in the current status's adjacency set.
    pub fn next_statuses(&self) -> &'static [TripStatus] {
        match self {
            Self::Waiting => &[Self::DriverAccepted, Self::TripCancelled],
            Self::DriverAccepted => &[Self::DriverInWay, Self::TripCancelled],
            Self::DriverInWay => &[Self::DriverArrived, Self::TripCancelled],
            Self::DriverArrived => &[Self::UserPickedUp, Self::TripCancelled],
            Self::UserPickedUp => &[Self::DriverInProgress, Self::TripCancelled],
            Self::DriverInProgress => &[Self::TripCompleted, Self::TripCancelled],
            Self::TripCompleted => &[],
            Self::TripCancelled => &[],
        }
    }

    /// Check whether a direct transition to `target` is allowed.
    pub fn can_transition_to(&self, target: TripStatus) -> bool {
        self.next_statuses().contains(&target)
    }

    /// Check whether this status has no outgoing transitions.
    pub fn is_terminal(&self) -> bool {
        self.next_statuses().is_empty()
    }

    /// Check whether a driver is currently engaged with a trip in this
    /// status. Trips in an active status block the driver from receiving
    /// new-trip notifications.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            Self::DriverAccepted
                | Self::DriverInWay
                | Self::DriverArrived
                | Self::UserPickedUp
                | Self::DriverInProgress
        )
    }

    /// The set of statuses in which a driver counts as engaged.
    pub fn active_set() -> &'static [TripStatus] {
        &[
            Self::DriverAccepted,
            Self::DriverInWay,
            Self::DriverArrived,
            Self::UserPickedUp,
            Self::DriverInProgress,
        ]
    }

    /// All statuses, for exhaustive iteration.
    pub fn all() -> &'static [TripStatus] {
        &[
            Self::Waiting,
            Self::DriverAccepted,
            Self::DriverInWay,
            Self::DriverArrived,
            Self::UserPickedUp,
            Self::DriverInProgress,
            Self::TripCompleted,
            Self::TripCancelled,
        ]
    }

    /// Return the status as a snake_case string (matches the DB enum).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::DriverAccepted => "driver_accepted",
            Self::DriverInWay => "driver_in_way",
            Self::DriverArrived => "driver_arrived",
            Self::UserPickedUp => "user_picked_up",
            Self::DriverInProgress => "driver_in_progress",
            Self::TripCompleted => "trip_completed",
            Self::TripCancelled => "trip_cancelled",
        }
    }

    /// Return the status in the form clients exchange over the API
    /// (the serde representation). Used in client-facing messages.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::Waiting => "WAITING",
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

impl fmt::Display for TripStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TripStatus {
    type Err = ridehub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "waiting" => Ok(Self::Waiting),
            "driver_accepted" => Ok(Self::DriverAccepted),
            "driver_in_way" => Ok(Self::DriverInWay),
            "driver_arrived" => Ok(Self::DriverArrived),
            "user_picked_up" => Ok(Self::UserPickedUp),
            "driver_in_progress" => Ok(Self::DriverInProgress),
            "trip_completed" => Ok(Self::TripCompleted),
            "trip_cancelled" => Ok(Self::TripCancelled),
            _ => Err(ridehub_core::AppError::validation(format!(
                "Invalid trip status: '{s}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_is_connected() {
        let order = [
            TripStatus::Waiting,
            TripStatus::DriverAccepted,
            TripStatus::DriverInWay,
            TripStatus::DriverArrived,
            TripStatus::UserPickedUp,
            TripStatus::DriverInProgress,
            TripStatus::TripCompleted,
        ];
        for pair in order.windows(2) {
            assert!(
                pair[0].can_transition_to(pair[1]),
                "{} -> {} should be allowed",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_cancel_reachable_from_every_non_terminal() {
        for status in TripStatus::all() {
            if status.is_terminal() {
                assert!(!status.can_transition_to(TripStatus::TripCancelled));
            } else {
                assert!(status.can_transition_to(TripStatus::TripCancelled));
            }
        }
    }

    #[test]
    fn test_terminal_statuses_have_no_exits() {
        assert!(TripStatus::TripCompleted.is_terminal());
        assert!(TripStatus::TripCancelled.is_terminal());
        for target in TripStatus::all() {
            assert!(!TripStatus::TripCompleted.can_transition_to(*target));
            assert!(!TripStatus::TripCancelled.can_transition_to(*target));
        }
    }

    #[test]
    fn test_no_status_is_revisitable() {
        // Walking any edge never returns to an earlier status: the graph
        // is a chain plus cancel edges, so a status never appears in its
        // own reachable set.
        for status in TripStatus::all() {
            let mut reachable = Vec::new();
            let mut frontier = vec![*status];
            while let Some(s) = frontier.pop() {
                for next in s.next_statuses() {
                    if !reachable.contains(next) {
                        reachable.push(*next);
                        frontier.push(*next);
                    }
                }
            }
            assert!(
                !reachable.contains(status),
                "{status} must not be revisitable"
            );
        }
    }

    #[test]
    fn test_wire_name_matches_serde_representation() {
        for status in TripStatus::all() {
            let json = serde_json::to_value(status).unwrap();
            assert_eq!(json.as_str(), Some(status.wire_name()));
        }
    }

    #[test]
    fn test_active_set_matches_is_active() {
        for status in TripStatus::all() {
            assert_eq!(
                status.is_active(),
                TripStatus::active_set().contains(status)
            );
        }
        assert!(!TripStatus::Waiting.is_active());
        assert!(!TripStatus::TripCompleted.is_active());
        assert!(!TripStatus::TripCancelled.is_active());
    }

    #[test]
    fn test_skipping_a_step_is_rejected() {
        assert!(!TripStatus::Waiting.can_transition_to(TripStatus::DriverInWay));
        assert!(!TripStatus::DriverAccepted.can_transition_to(TripStatus::UserPickedUp));
        assert!(!TripStatus::DriverInWay.can_transition_to(TripStatus::TripCompleted));
    }

    #[test]
    fn test_serde_uses_screaming_snake_case() {
        let json = serde_json::to_string(&TripStatus::DriverAccepted).unwrap();
        assert_eq!(json, "\"DRIVER_ACCEPTED\"");
        let parsed: TripStatus = serde_json::from_str("\"TRIP_CANCELLED\"").unwrap();
        assert_eq!(parsed, TripStatus::TripCancelled);
    }
}
