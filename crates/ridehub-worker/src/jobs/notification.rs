//! Notification retention maintenance.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::Value;

use ridehub_core::config::worker::WorkerConfig;
use ridehub_core::result::AppResult;
use ridehub_database::repositories::notification::NotificationRepository;

/// Deletes read notifications past their retention window and trims
/// each user's stored notifications to a fixed ceiling.
#[derive(Debug)]
pub struct NotificationCleanupJob {
    notification_repo: Arc<NotificationRepository>,
    retention_days: i64,
    max_stored_per_user: i64,
}

impl NotificationCleanupJob {
    /// Create a new cleanup job from the worker configuration.
    pub fn new(notification_repo: Arc<NotificationRepository>, config: &WorkerConfig) -> Self {
        Self {
            notification_repo,
            retention_days: config.notification_retention_days,
            max_stored_per_user: config.max_stored_per_user,
        }
    }

    /// Run one cleanup pass. Returns a summary for logging.
    pub async fn run(&self) -> AppResult<Value> {
        tracing::info!(
            retention_days = self.retention_days,
            "Running notification cleanup"
        );

        let cutoff = Utc::now() - Duration::days(self.retention_days);
        let expired = self.notification_repo.cleanup_read_before(cutoff).await?;
        let overflow = self
            .notification_repo
            .trim_per_user(self.max_stored_per_user)
            .await?;

        tracing::info!(
            expired_removed = expired,
            overflow_removed = overflow,
            "Notification cleanup complete"
        );

        Ok(serde_json::json!({
            "task": "notification_cleanup",
            "expired_removed": expired,
            "overflow_removed": overflow,
            "retention_days": self.retention_days,
            "max_per_user": self.max_stored_per_user,
        }))
    }
}
