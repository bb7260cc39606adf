//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::kind::NotificationKind;

/// A durable record of an attempted user-facing alert.
///
/// One row exists per (recipient, logical event); the in-app notification
/// center reads these rows regardless of push delivery outcome.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    /// Unique notification identifier.
    pub id: Uuid,
    /// The recipient user.
    pub user_id: Uuid,
    /// The logical event announced.
    pub kind: NotificationKind,
    /// Localized title.
    pub title: String,
    /// Localized body text.
    pub message: String,
    /// Structured payload forwarded to clients (JSON).
    pub payload: Option<serde_json::Value>,
    /// The trip this notification concerns, if any.
    pub trip_id: Option<Uuid>,
    /// Idempotency key (`kind:trip:user`) with a uniqueness constraint;
    /// repeated fanout passes for the same logical event insert nothing.
    pub dedup_key: Option<String>,
    /// Whether the user has read this notification.
    pub is_read: bool,
    /// When the notification was read.
    pub read_at: Option<DateTime<Utc>>,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
}

/// Data for inserting a notification row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewNotification {
    /// The recipient user.
    pub user_id: Uuid,
    /// The logical event announced.
    pub kind: NotificationKind,
    /// Localized title.
    pub title: String,
    /// Localized body text.
    pub message: String,
    /// Structured payload forwarded to clients.
    pub payload: Option<serde_json::Value>,
    /// The trip this notification concerns, if any.
    pub trip_id: Option<Uuid>,
}

impl NewNotification {
    /// The idempotency key for trip-scoped notifications.
    ///
    /// `None` for notifications not tied to a trip (those are never
    /// fanned out repeatedly, so they need no dedup).
    pub fn dedup_key(&self) -> Option<String> {
        self.trip_id
            .map(|trip_id| format!("{}:{}:{}", self.kind, trip_id, self.user_id))
    }
}
