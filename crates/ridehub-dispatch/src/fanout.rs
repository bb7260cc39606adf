//! New-trip notification fanout.
//!
//! Announces an unclaimed trip to every eligible driver: one durable
//! notification row per recipient, then a batch push to the recipients
//! whose row was freshly inserted. Rows are written before any push
//! goes out, so a repeated pass for the same trip (the re-announcer
//! runs this every interval) inserts nothing and pushes nothing.

use std::sync::Arc;

use tracing::{info, warn};

use ridehub_core::config::push::PushConfig;
use ridehub_core::error::ErrorKind;
use ridehub_core::result::AppResult;
use ridehub_entity::notification::{NewNotification, NotificationKind};
use ridehub_entity::trip::Trip;

use crate::availability::AvailabilityResolver;
use crate::push::{PushData, PushGateway, PushMessage};
use crate::store::{NotificationStore, UserDirectory};

/// Fans a new-trip announcement out to eligible drivers.
#[derive(Clone)]
pub struct FanoutDispatcher {
    availability: AvailabilityResolver,
    notifications: Arc<dyn NotificationStore>,
    users: Arc<dyn UserDirectory>,
    gateway: Arc<dyn PushGateway>,
    config: PushConfig,
}

impl FanoutDispatcher {
    /// Create a new dispatcher.
    pub fn new(
        availability: AvailabilityResolver,
        notifications: Arc<dyn NotificationStore>,
        users: Arc<dyn UserDirectory>,
        gateway: Arc<dyn PushGateway>,
        config: PushConfig,
    ) -> Self {
        Self {
            availability,
            notifications,
            users,
            gateway,
            config,
        }
    }

    /// Announce a waiting trip to all available drivers in range.
    ///
    /// Returns the number of drivers newly notified. Zero either means
    /// no candidate was found or every candidate already holds a row
    /// for this trip.
    pub async fn notify_new_trip(&self, trip: &Trip) -> AppResult<usize> {
        let candidates = self.availability.candidate_drivers(trip).await?;
        if candidates.is_empty() {
            info!(trip_id = %trip.id, region = %trip.rider_region, "No available drivers to notify");
            return Ok(0);
        }

        let data = PushData::for_new_trip(trip);
        let payload = serde_json::to_value(&data)?;

        // Durable rows go in first; only candidates whose row actually
        // inserted get a push. Dedup conflicts mean this driver was
        // already announced this trip.
        let mut inserted = 0usize;
        let mut tokens = Vec::new();
        for driver in &candidates {
            let row = NewNotification {
                user_id: driver.id,
                kind: NotificationKind::NewTripAvailable,
                title: "New Trip Available!".to_string(),
                message: format!(
                    "Pickup from {} ({:.1} km)",
                    trip.pickup_location, trip.distance_km
                ),
                payload: Some(payload.clone()),
                trip_id: Some(trip.id),
            };
            if self.notifications.create(&row).await?.is_some() {
                inserted += 1;
                if let Some(token) = driver.device_token.as_deref() {
                    if !token.is_empty() {
                        tokens.push(token.to_string());
                    }
                }
            }
        }

        if tokens.is_empty() {
            return Ok(inserted);
        }

        let alert = PushMessage::alert(
            "New Trip Available!",
            format!("Pickup from {}", trip.pickup_location),
            data.clone(),
        );
        self.deliver(&tokens, &alert).await;

        if self.config.send_silent_copy {
            let silent = PushMessage::silent(data);
            self.deliver(&tokens, &silent).await;
        }

        info!(
            trip_id = %trip.id,
            candidates = candidates.len(),
            notified = inserted,
            "Trip announced to drivers"
        );
        Ok(inserted)
    }

    /// Deliver one message to a token batch. Push failures never fail
    /// the fanout; the durable rows are already committed.
    async fn deliver(&self, tokens: &[String], message: &PushMessage) {
        match self.gateway.send_multicast(tokens, message).await {
            Ok(outcome) => {
                if outcome.failure_count > 0 {
                    warn!(
                        failed = outcome.failure_count,
                        sent = outcome.success_count,
                        "Some push deliveries failed"
                    );
                }
                self.cleanup_tokens(&outcome.invalid_tokens).await;
            }
            Err(err) if err.kind == ErrorKind::PushTransport => {
                warn!(error = %err, batch = tokens.len(), "Multicast failed at transport level");
                if self.config.fallback_to_single_sends {
                    self.deliver_singles(tokens, message).await;
                }
            }
            Err(err) => {
                warn!(error = %err, "Push delivery failed");
            }
        }
    }

    /// Per-token fallback after a failed multicast. A token rejected as
    /// invalid here is cleared like a multicast-reported one.
    async fn deliver_singles(&self, tokens: &[String], message: &PushMessage) {
        let mut invalid = Vec::new();
        for token in tokens {
            match self.gateway.send_single(token, message).await {
                Ok(()) => {}
                Err(err) if err.kind == ErrorKind::PushDelivery => {
                    invalid.push(token.clone());
                }
                Err(err) => {
                    warn!(error = %err, "Single-send fallback failed");
                }
            }
        }
        self.cleanup_tokens(&invalid).await;
    }

    /// Clear tokens the gateway reported as permanently invalid, so
    /// dead device installs stop receiving send attempts.
    async fn cleanup_tokens(&self, invalid: &[String]) {
        for token in invalid {
            match self.users.clear_device_token(token).await {
                Ok(cleared) if cleared > 0 => {
                    info!("Cleared invalid device token");
                }
                Ok(_) => {}
                Err(err) => {
                    warn!(error = %err, "Failed to clear invalid device token");
                }
            }
        }
    }
}
