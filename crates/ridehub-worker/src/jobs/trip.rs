//! Stale waiting-trip sweeping.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::Value;

use ridehub_core::config::worker::WorkerConfig;
use ridehub_core::result::AppResult;
use ridehub_database::repositories::trip::TripRepository;
use ridehub_dispatch::TripLifecycle;
use ridehub_entity::trip::TripStatus;

/// Cancels trips stuck in `WAITING` past the configured age.
///
/// Cancellation goes through the lifecycle service so announcers are
/// stopped and riders are notified, same as a manual cancel.
#[derive(Clone)]
pub struct StaleTripSweepJob {
    trip_repo: Arc<TripRepository>,
    lifecycle: TripLifecycle,
    stale_after_minutes: i64,
}

impl StaleTripSweepJob {
    /// Create a new sweep job from the worker configuration.
    pub fn new(
        trip_repo: Arc<TripRepository>,
        lifecycle: TripLifecycle,
        config: &WorkerConfig,
    ) -> Self {
        Self {
            trip_repo,
            lifecycle,
            stale_after_minutes: config.stale_trip_after_minutes,
        }
    }

    /// Run one sweep pass. Returns a summary for logging.
    pub async fn run(&self) -> AppResult<Value> {
        let cutoff = Utc::now() - Duration::minutes(self.stale_after_minutes);
        let stale = self.trip_repo.find_stale_waiting(cutoff).await?;
        if stale.is_empty() {
            return Ok(serde_json::json!({ "task": "stale_trip_sweep", "cancelled": 0 }));
        }

        tracing::info!(count = stale.len(), "Sweeping stale waiting trips");

        let mut cancelled = 0u64;
        for trip in stale {
            // A driver may accept between the query and the cancel; the
            // conditional update makes that a lost race, not a bug.
            match self
                .lifecycle
                .transition(trip.id, TripStatus::TripCancelled, None)
                .await
            {
                Ok(_) => cancelled += 1,
                Err(err) => {
                    tracing::warn!(trip_id = %trip.id, error = %err, "Stale trip cancel skipped");
                }
            }
        }

        tracing::info!(cancelled, "Stale trip sweep complete");
        Ok(serde_json::json!({
            "task": "stale_trip_sweep",
            "cancelled": cancelled,
            "stale_after_minutes": self.stale_after_minutes,
        }))
    }
}
