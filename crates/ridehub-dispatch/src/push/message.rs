//! Push message and payload shapes.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use ridehub_entity::notification::NotificationKind;
use ridehub_entity::trip::Trip;

/// Delivery priority hint forwarded to the push transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PushPriority {
    /// Deliver immediately, may light up the device.
    High,
    /// Deliver opportunistically (used for silent data-only copies).
    Normal,
}

/// Structured data payload carried by every push, in the stable shape
/// clients use for routing regardless of title/body localization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushData {
    /// Event type (`NEW_TRIP_AVAILABLE` or a lifecycle event name).
    #[serde(rename = "type")]
    pub kind: String,
    /// The trip this event concerns.
    pub trip_id: String,
    /// Pickup address text.
    pub pickup_location: String,
    /// Dropoff address text.
    pub dropoff_location: String,
    /// Fare, stringified for client display.
    pub fare: String,
    /// Distance in kilometers, stringified.
    pub distance: String,
    /// Event time, ISO-8601.
    pub timestamp: String,
    /// Rider name (new-trip announcements only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rider_name: Option<String>,
    /// Rider phone (new-trip announcements only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rider_phone: Option<String>,
}

impl PushData {
    /// Build the payload for a trip event.
    pub fn for_trip(kind: NotificationKind, trip: &Trip) -> Self {
        Self {
            kind: kind.as_str().to_string(),
            trip_id: trip.id.to_string(),
            pickup_location: trip.pickup_location.clone(),
            dropoff_location: trip.dropoff_location.clone(),
            fare: trip.price.to_string(),
            distance: format!("{:.1}", trip.distance_km),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            rider_name: None,
            rider_phone: None,
        }
    }

    /// Build the payload for a new-trip announcement, which additionally
    /// carries the rider contact snapshot.
    pub fn for_new_trip(trip: &Trip) -> Self {
        let mut data = Self::for_trip(NotificationKind::NewTripAvailable, trip);
        data.rider_name = Some(trip.rider_name.clone());
        data.rider_phone = Some(trip.rider_phone.clone());
        data
    }
}

/// One push message addressed to one or many device tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushMessage {
    /// Alert title; `None` for silent data-only messages.
    pub title: Option<String>,
    /// Alert body; `None` for silent data-only messages.
    pub body: Option<String>,
    /// Alert sound; `None` for silent data-only messages.
    pub sound: Option<String>,
    /// Structured data payload.
    pub data: PushData,
    /// Delivery priority.
    pub priority: PushPriority,
    /// Whether the message should wake background processing.
    pub content_available: bool,
}

impl PushMessage {
    /// A user-visible alert with sound, delivered at high priority.
    pub fn alert(title: impl Into<String>, body: impl Into<String>, data: PushData) -> Self {
        Self {
            title: Some(title.into()),
            body: Some(body.into()),
            sound: Some("default".to_string()),
            data,
            priority: PushPriority::High,
            content_available: false,
        }
    }

    /// A silent, data-only copy at lower delivery priority. Sent after
    /// the alert on platforms that only wake background processes for
    /// data-only messages.
    pub fn silent(data: PushData) -> Self {
        Self {
            title: None,
            body: None,
            sound: None,
            data,
            priority: PushPriority::Normal,
            content_available: true,
        }
    }

    /// Whether this is a data-only message.
    pub fn is_silent(&self) -> bool {
        self.title.is_none() && self.body.is_none()
    }
}
