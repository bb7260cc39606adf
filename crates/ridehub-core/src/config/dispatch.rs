//! Trip dispatch and re-announcement configuration.

use serde::{Deserialize, Serialize};

/// Settings for candidate selection and periodic re-announcement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Seconds between re-announcements of an unclaimed trip.
    #[serde(default = "default_reannounce_interval")]
    pub reannounce_interval_seconds: u64,
    /// Regions to broaden the candidate search into when no active
    /// driver matches the rider's region. Empty (the default) keeps the
    /// exact-region-match behavior.
    #[serde(default)]
    pub fallback_regions: Vec<String>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            reannounce_interval_seconds: default_reannounce_interval(),
            fallback_regions: Vec::new(),
        }
    }
}

fn default_reannounce_interval() -> u64 {
    30
}
