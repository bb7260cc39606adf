//! Request DTOs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ridehub_entity::trip::{CreateTrip, TripStatus};
use ridehub_entity::user::DeviceToken;

/// POST /api/trips request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTripRequest {
    /// The requesting rider's user ID.
    pub rider_id: Uuid,
    /// Rider name snapshot.
    pub rider_name: String,
    /// Rider phone snapshot.
    pub rider_phone: String,
    /// Rider region (resolved from pickup coordinates by the caller).
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
    #[serde(default = "default_trip_class")]
    pub trip_class: String,
}

fn default_trip_class() -> String {
    "economy".to_string()
}

impl From<CreateTripRequest> for CreateTrip {
    fn from(req: CreateTripRequest) -> Self {
        Self {
            rider_id: req.rider_id,
            rider_name: req.rider_name,
            rider_phone: req.rider_phone,
            rider_region: req.rider_region,
            pickup_location: req.pickup_location,
            pickup_lat: req.pickup_lat,
            pickup_lng: req.pickup_lng,
            dropoff_location: req.dropoff_location,
            dropoff_lat: req.dropoff_lat,
            dropoff_lng: req.dropoff_lng,
            price: req.price,
            distance_km: req.distance_km,
            trip_class: req.trip_class,
        }
    }
}

/// POST /api/trips/{id}/transition request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionRequest {
    /// The requested target status.
    pub status: TripStatus,
    /// The acting driver, required when `status` is `DRIVER_ACCEPTED`.
    #[serde(default)]
    pub driver_id: Option<Uuid>,
}

/// PUT /api/devices/token request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterDeviceTokenRequest {
    /// The user registering the device.
    pub user_id: Uuid,
    /// The opaque per-install push delivery address.
    pub token: String,
    /// Device platform ("android", "ios").
    #[serde(default)]
    pub platform: Option<String>,
    /// Installed app version.
    #[serde(default)]
    pub app_version: Option<String>,
}

impl RegisterDeviceTokenRequest {
    /// The device token portion of the request.
    pub fn device(&self) -> DeviceToken {
        DeviceToken {
            token: self.token.clone(),
            platform: self.platform.clone(),
            app_version: self.app_version.clone(),
        }
    }
}

/// Query parameters identifying the acting user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserParams {
    /// The acting user's ID.
    pub user_id: Uuid,
}

/// Query parameters for notification listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationListParams {
    /// The recipient whose notifications to list.
    pub user_id: Uuid,
    /// Maximum number of rows to return.
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    50
}
