//! Cron scheduler for periodic maintenance tasks.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};

use ridehub_core::config::worker::WorkerConfig;
use ridehub_core::error::AppError;
use ridehub_core::result::AppResult;

use crate::jobs::{NotificationCleanupJob, StaleTripSweepJob};

/// Cron-based scheduler for periodic background tasks.
pub struct CronScheduler {
    scheduler: JobScheduler,
    notification_cleanup: Arc<NotificationCleanupJob>,
    stale_trip_sweep: Arc<StaleTripSweepJob>,
    sweep_every_minutes: i64,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler").finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler with the given job instances.
    pub async fn new(
        notification_cleanup: Arc<NotificationCleanupJob>,
        stale_trip_sweep: Arc<StaleTripSweepJob>,
        config: &WorkerConfig,
    ) -> AppResult<Self> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;

        Ok(Self {
            scheduler,
            notification_cleanup,
            stale_trip_sweep,
            sweep_every_minutes: config.stale_sweep_every_minutes,
        })
    }

    /// Register all default scheduled tasks.
    pub async fn register_default_tasks(&self) -> AppResult<()> {
        self.register_notification_cleanup().await?;
        self.register_stale_trip_sweep().await?;

        tracing::info!("All scheduled tasks registered");
        Ok(())
    }

    /// Start the scheduler.
    pub async fn start(&self) -> AppResult<()> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;

        tracing::info!("Cron scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler.
    pub async fn shutdown(&mut self) -> AppResult<()> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {e}")))?;

        tracing::info!("Cron scheduler shut down");
        Ok(())
    }

    /// Notification cleanup — daily at 03:00
    async fn register_notification_cleanup(&self) -> AppResult<()> {
        let job = Arc::clone(&self.notification_cleanup);
        let cron = CronJob::new_async("0 0 3 * * *", move |_uuid, _lock| {
            let job = Arc::clone(&job);
            Box::pin(async move {
                if let Err(e) = job.run().await {
                    tracing::error!("Notification cleanup failed: {e}");
                }
            })
        })
        .map_err(|e| {
            AppError::internal(format!("Failed to create notification_cleanup schedule: {e}"))
        })?;

        self.scheduler.add(cron).await.map_err(|e| {
            AppError::internal(format!("Failed to add notification_cleanup schedule: {e}"))
        })?;

        tracing::info!("Registered: notification_cleanup (daily 03:00)");
        Ok(())
    }

    /// Stale trip sweep, cadence from `worker.stale_sweep_every_minutes`.
    async fn register_stale_trip_sweep(&self) -> AppResult<()> {
        let schedule = stale_sweep_cron(self.sweep_every_minutes);
        let job = self.stale_trip_sweep.clone();
        let cron = CronJob::new_async(schedule.as_str(), move |_uuid, _lock| {
            let job = Arc::clone(&job);
            Box::pin(async move {
                if let Err(e) = job.run().await {
                    tracing::error!("Stale trip sweep failed: {e}");
                }
            })
        })
        .map_err(|e| {
            AppError::internal(format!("Failed to create stale_trip_sweep schedule: {e}"))
        })?;

        self.scheduler.add(cron).await.map_err(|e| {
            AppError::internal(format!("Failed to add stale_trip_sweep schedule: {e}"))
        })?;

        tracing::info!(
            every_minutes = self.sweep_every_minutes,
            "Registered: stale_trip_sweep"
        );
        Ok(())
    }
}

/// Build the sweep cron expression. Minutes outside the 1..=59 range a
/// six-field cron step accepts are clamped.
fn stale_sweep_cron(every_minutes: i64) -> String {
    let minutes = every_minutes.clamp(1, 59);
    format!("0 */{minutes} * * * *")
}
