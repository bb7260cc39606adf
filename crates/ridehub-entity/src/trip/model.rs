//! Trip entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use ridehub_core::AppError;

use super::status::TripStatus;

/// One rider's ride request and its full lifecycle record.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Trip {
    /// Unique trip identifier.
    pub id: Uuid,
    /// Current lifecycle status.
    pub status: TripStatus,
    /// The rider who requested the trip.
    pub rider_id: Uuid,
    /// Rider name at creation time.
    pub rider_name: String,
    /// Rider phone at creation time.
    pub rider_phone: String,
    /// Rider region at creation time (resolved from pickup coordinates).
    pub rider_region: String,
    /// Pickup address text.
    pub pickup_location: String,
    /// Pickup latitude.
    pub pickup_lat: f64,
    /// Pickup longitude.
    pub pickup_lng: f64,
    /// Dropoff address text.
    pub dropoff_location: String,
    /// Dropoff latitude.
    pub dropoff_lat: f64,
    /// Dropoff longitude.
    pub dropoff_lng: f64,
    /// Fare in minor currency units.
    pub price: i64,
    /// Trip distance in kilometers.
    pub distance_km: f64,
    /// Trip class (e.g. "economy", "vip").
    pub trip_class: String,
    /// Assigned driver, populated on acceptance.
    pub driver_id: Option<Uuid>,
    /// Driver name snapshot, populated on acceptance.
    pub driver_name: Option<String>,
    /// Driver phone snapshot, populated on acceptance.
    pub driver_phone: Option<String>,
    /// Driver vehicle snapshot, populated on acceptance.
    pub driver_vehicle: Option<String>,
    /// Driver rating snapshot, populated on acceptance.
    pub driver_rating: Option<f64>,
    /// When the trip was created.
    pub created_at: DateTime<Utc>,
    /// When a driver accepted the trip.
    pub accepted_at: Option<DateTime<Utc>>,
    /// When the trip completed.
    pub completed_at: Option<DateTime<Utc>>,
}

impl Trip {
    /// Check whether the trip is still unclaimed.
    pub fn is_waiting(&self) -> bool {
        self.status == TripStatus::Waiting
    }

    /// Check whether the trip has reached a terminal status.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Driver fields copied onto a trip when it is accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverSnapshot {
    /// The accepting driver's user ID.
    pub driver_id: Uuid,
    /// Driver name.
    pub name: String,
    /// Driver phone.
    pub phone: String,
    /// Vehicle description.
    pub vehicle: String,
    /// Driver rating, if rated.
    pub rating: Option<f64>,
}

/// Data required to create a new trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTrip {
    /// The requesting rider's user ID.
    pub rider_id: Uuid,
    /// Rider name snapshot.
    pub rider_name: String,
    /// Rider phone snapshot.
    pub rider_phone: String,
    /// Rider region snapshot.
    pub rider_region: String,
    /// Pickup address text.
    pub pickup_location: String,
    /// Pickup latitude.
    pub pickup_lat: f64,
    /// Pickup longitude.
    pub pickup_lng: f64,
    /// Dropoff address text.
    pub dropoff_location: String,
    /// Dropoff latitude.
    pub dropoff_lat: f64,
    /// Dropoff longitude.
    pub dropoff_lng: f64,
    /// Fare in minor currency units.
    pub price: i64,
    /// Trip distance in kilometers.
    pub distance_km: f64,
    /// Trip class.
    pub trip_class: String,
}

impl CreateTrip {
    /// Validate the request. Coordinates must be non-zero finite numbers.
    pub fn validate(&self) -> Result<(), AppError> {
        for (name, value) in [
            ("pickup_lat", self.pickup_lat),
            ("pickup_lng", self.pickup_lng),
            ("dropoff_lat", self.dropoff_lat),
            ("dropoff_lng", self.dropoff_lng),
        ] {
            if value == 0.0 || !value.is_finite() {
                return Err(AppError::validation(format!(
                    "Coordinate '{name}' must be a non-zero finite number"
                )));
            }
        }
        Ok(())
    }
}
