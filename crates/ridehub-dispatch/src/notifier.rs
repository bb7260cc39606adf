//! Lifecycle event notifications.
//!
//! After a transition persists, the parties to the trip are told about
//! it: the rider for every driver-side progress event, and both rider
//! and driver when the trip reaches a terminal status. Same pattern as
//! the new-trip fanout — durable row first, push only for freshly
//! inserted rows.

use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use ridehub_core::config::push::PushConfig;
use ridehub_core::error::ErrorKind;
use ridehub_core::result::AppResult;
use ridehub_entity::notification::{NewNotification, NotificationKind};
use ridehub_entity::trip::TripEvent;

use crate::push::{PushData, PushGateway, PushMessage};
use crate::store::{NotificationStore, UserDirectory};

/// Notifies the rider (and, for terminal events, the driver) about a
/// persisted trip transition.
#[derive(Clone)]
pub struct LifecycleNotifier {
    notifications: Arc<dyn NotificationStore>,
    users: Arc<dyn UserDirectory>,
    gateway: Arc<dyn PushGateway>,
    config: PushConfig,
}

impl LifecycleNotifier {
    /// Create a new notifier.
    pub fn new(
        notifications: Arc<dyn NotificationStore>,
        users: Arc<dyn UserDirectory>,
        gateway: Arc<dyn PushGateway>,
        config: PushConfig,
    ) -> Self {
        Self {
            notifications,
            users,
            gateway,
            config,
        }
    }

    /// Announce a transition to its recipients.
    pub async fn notify(&self, event: &TripEvent) -> AppResult<()> {
        let Some(kind) = NotificationKind::from_status(event.new) else {
            return Ok(());
        };

        let trip = &event.trip;
        let (title, message) = copy_for(kind, trip.driver_name.as_deref());
        let data = PushData::for_trip(kind, trip);
        let payload = serde_json::to_value(&data)?;

        let mut tokens = Vec::new();
        for user_id in recipients(event) {
            let row = NewNotification {
                user_id,
                kind,
                title: title.to_string(),
                message: message.clone(),
                payload: Some(payload.clone()),
                trip_id: Some(trip.id),
            };
            if self.notifications.create(&row).await?.is_none() {
                continue;
            }
            match self.users.find_by_id(user_id).await? {
                Some(user) if user.has_device_token() => {
                    if let Some(token) = user.device_token {
                        tokens.push(token);
                    }
                }
                _ => {}
            }
        }

        if tokens.is_empty() {
            return Ok(());
        }

        let alert = PushMessage::alert(title, message, data.clone());
        self.deliver(&tokens, &alert).await;

        if self.config.send_silent_copy {
            self.deliver(&tokens, &PushMessage::silent(data)).await;
        }
        Ok(())
    }

    async fn deliver(&self, tokens: &[String], message: &PushMessage) {
        let invalid = match self.gateway.send_multicast(tokens, message).await {
            Ok(outcome) => outcome.invalid_tokens,
            Err(err) if err.kind == ErrorKind::PushTransport => {
                warn!(error = %err, "Lifecycle push failed at transport level");
                return;
            }
            Err(err) => {
                warn!(error = %err, "Lifecycle push failed");
                return;
            }
        };
        for token in &invalid {
            if let Err(err) = self.users.clear_device_token(token).await {
                warn!(error = %err, "Failed to clear invalid device token");
            }
        }
    }
}

/// Who gets told about this transition.
///
/// Progress events go to the rider. Terminal events go to both parties
/// (the driver needs to know the rider cancelled, and vice versa the
/// completion receipt goes to both).
fn recipients(event: &TripEvent) -> Vec<Uuid> {
    let trip = &event.trip;
    let mut out = vec![trip.rider_id];
    if event.new.is_terminal() {
        if let Some(driver_id) = trip.driver_id {
            out.push(driver_id);
        }
    }
    out
}

/// Localized title and body for a lifecycle event.
fn copy_for(kind: NotificationKind, driver_name: Option<&str>) -> (&'static str, String) {
    let driver = driver_name.unwrap_or("Your driver");
    match kind {
        NotificationKind::NewTripAvailable => {
            ("New Trip Available!", "A new trip is available near you".to_string())
        }
        NotificationKind::DriverAccepted => {
            ("Driver Accepted", format!("{driver} accepted your trip"))
        }
        NotificationKind::DriverInWay => {
            ("Driver On The Way", format!("{driver} is heading to your pickup point"))
        }
        NotificationKind::DriverArrived => {
            ("Driver Arrived", format!("{driver} is waiting at your pickup point"))
        }
        NotificationKind::UserPickedUp => ("Picked Up", "Your trip is about to start".to_string()),
        NotificationKind::DriverInProgress => {
            ("Trip In Progress", "You are on your way".to_string())
        }
        NotificationKind::TripCompleted => {
            ("Trip Completed", "Your trip has been completed".to_string())
        }
        NotificationKind::TripCancelled => {
            ("Trip Cancelled", "The trip has been cancelled".to_string())
        }
    }
}
