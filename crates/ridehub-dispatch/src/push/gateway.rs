//! The push gateway seam.

use async_trait::async_trait;

use ridehub_core::result::AppResult;

use super::message::PushMessage;

/// Per-token results of a multicast send.
#[derive(Debug, Clone, Default)]
pub struct MulticastOutcome {
    /// Tokens the gateway accepted.
    pub success_count: usize,
    /// Tokens the gateway rejected.
    pub failure_count: usize,
    /// Tokens the gateway reported as permanently invalid. The caller
    /// clears these from their holders so subsequent fanouts stop
    /// targeting them.
    pub invalid_tokens: Vec<String>,
}

impl MulticastOutcome {
    /// An outcome where every token succeeded.
    pub fn all_ok(count: usize) -> Self {
        Self {
            success_count: count,
            ..Self::default()
        }
    }
}

/// Delivers push messages to device tokens.
///
/// The transport's own retry/backoff is its business; implementations
/// report transport-level failure as `ErrorKind::PushTransport` and
/// per-token failures through [`MulticastOutcome`].
#[async_trait]
pub trait PushGateway: Send + Sync + 'static {
    /// Deliver one message to many tokens with a single gateway call.
    async fn send_multicast(
        &self,
        tokens: &[String],
        message: &PushMessage,
    ) -> AppResult<MulticastOutcome>;

    /// Deliver one message to a single token.
    async fn send_single(&self, token: &str, message: &PushMessage) -> AppResult<()>;
}
