//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ridehub_entity::notification::Notification;
use ridehub_entity::trip::{Trip, TripStatus};

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Trip representation for responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripResponse {
    /// Trip ID.
    pub id: Uuid,
    /// Current lifecycle status.
    pub status: TripStatus,
    /// Rider ID.
    pub rider_id: Uuid,
    /// Rider name.
    pub rider_name: String,
    /// Pickup address.
    pub pickup_location: String,
    /// Dropoff address.
    pub dropoff_location: String,
    /// Fare in minor currency units.
    pub price: i64,
    /// Distance in kilometers.
    pub distance_km: f64,
    /// Trip class.
    pub trip_class: String,
    /// Assigned driver ID.
    pub driver_id: Option<Uuid>,
    /// Driver name snapshot.
    pub driver_name: Option<String>,
    /// Driver phone snapshot.
    pub driver_phone: Option<String>,
    /// Driver vehicle snapshot.
    pub driver_vehicle: Option<String>,
    /// Driver rating snapshot.
    pub driver_rating: Option<f64>,
    /// Created at.
    pub created_at: DateTime<Utc>,
    /// Accepted at.
    pub accepted_at: Option<DateTime<Utc>>,
    /// Completed at.
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<Trip> for TripResponse {
    fn from(trip: Trip) -> Self {
        Self {
            id: trip.id,
            status: trip.status,
            rider_id: trip.rider_id,
            rider_name: trip.rider_name,
            pickup_location: trip.pickup_location,
            dropoff_location: trip.dropoff_location,
            price: trip.price,
            distance_km: trip.distance_km,
            trip_class: trip.trip_class,
            driver_id: trip.driver_id,
            driver_name: trip.driver_name,
            driver_phone: trip.driver_phone,
            driver_vehicle: trip.driver_vehicle,
            driver_rating: trip.driver_rating,
            created_at: trip.created_at,
            accepted_at: trip.accepted_at,
            completed_at: trip.completed_at,
        }
    }
}

/// Notification representation for responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    /// Notification ID.
    pub id: Uuid,
    /// Event kind.
    pub kind: String,
    /// Localized title.
    pub title: String,
    /// Localized body text.
    pub message: String,
    /// Structured payload.
    pub payload: Option<serde_json::Value>,
    /// Related trip, if any.
    pub trip_id: Option<Uuid>,
    /// Whether the notification has been read.
    pub is_read: bool,
    /// Created at.
    pub created_at: DateTime<Utc>,
}

impl From<Notification> for NotificationResponse {
    fn from(n: Notification) -> Self {
        Self {
            id: n.id,
            kind: n.kind.as_str().to_string(),
            title: n.title,
            message: n.message,
            payload: n.payload,
            trip_id: n.trip_id,
            is_read: n.is_read,
            created_at: n.created_at,
        }
    }
}

/// Simple count response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountResponse {
    /// The count.
    pub count: i64,
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Database connectivity.
    pub database: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trip_response_serializes_status_screaming() {
        let response = ApiResponse::ok(CountResponse { count: 3 });
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["count"], 3);
    }
}
