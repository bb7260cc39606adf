//! Push gateway configuration.

use serde::{Deserialize, Serialize};

/// Outbound push gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushConfig {
    /// Base URL of the push gateway send endpoint.
    pub gateway_url: String,
    /// Server API key sent in the `Authorization` header.
    pub server_key: String,
    /// Request timeout in seconds for gateway calls.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// Whether every alert notification is followed by a silent,
    /// data-only copy at lower delivery priority. Some mobile platforms
    /// only wake background processes for data-only messages.
    #[serde(default = "default_true")]
    pub send_silent_copy: bool,
    /// Whether to fall back to per-token sends when a multicast call
    /// fails at the transport level.
    #[serde(default = "default_true")]
    pub fallback_to_single_sends: bool,
}

fn default_request_timeout() -> u64 {
    10
}

fn default_true() -> bool {
    true
}
