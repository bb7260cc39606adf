//! Background worker configuration.

use serde::{Deserialize, Serialize};

/// Scheduled maintenance worker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the worker is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Days to retain read notifications before cleanup.
    #[serde(default = "default_retention_days")]
    pub notification_retention_days: i64,
    /// Maximum stored notifications per user.
    #[serde(default = "default_max_stored")]
    pub max_stored_per_user: i64,
    /// Minutes after which an unclaimed WAITING trip is cancelled.
    #[serde(default = "default_stale_after")]
    pub stale_trip_after_minutes: i64,
    /// Minutes between stale-trip sweep runs.
    #[serde(default = "default_sweep_every")]
    pub stale_sweep_every_minutes: i64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            notification_retention_days: default_retention_days(),
            max_stored_per_user: default_max_stored(),
            stale_trip_after_minutes: default_stale_after(),
            stale_sweep_every_minutes: default_sweep_every(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_retention_days() -> i64 {
    30
}

fn default_max_stored() -> i64 {
    500
}

fn default_stale_after() -> i64 {
    120
}

fn default_sweep_every() -> i64 {
    10
}
