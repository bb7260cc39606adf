//! HTTP implementation of the push gateway seam.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use ridehub_core::config::push::PushConfig;
use ridehub_core::error::AppError;
use ridehub_core::result::AppResult;

use super::gateway::{MulticastOutcome, PushGateway};
use super::message::{PushMessage, PushPriority};

/// Push gateway client over HTTP/JSON.
#[derive(Debug, Clone)]
pub struct HttpPushGateway {
    client: reqwest::Client,
    config: PushConfig,
}

/// One entry in the gateway's per-token result list.
#[derive(Debug, Deserialize)]
struct TokenResult {
    #[serde(default)]
    error: Option<String>,
}

/// Gateway response body for a send call.
#[derive(Debug, Deserialize)]
struct GatewayResponse {
    #[serde(default)]
    success: usize,
    #[serde(default)]
    failure: usize,
    #[serde(default)]
    results: Vec<TokenResult>,
}

impl HttpPushGateway {
    /// Create a gateway client from configuration.
    pub fn new(config: PushConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ridehub_core::error::ErrorKind::Configuration,
                    format!("Failed to build push HTTP client: {e}"),
                    e,
                )
            })?;
        Ok(Self { client, config })
    }

    /// Build the JSON request body for a send call.
    fn request_body(tokens: &[String], message: &PushMessage) -> serde_json::Value {
        let mut body = serde_json::json!({
            "data": message.data,
            "priority": match message.priority {
                PushPriority::High => "high",
                PushPriority::Normal => "normal",
            },
            "content_available": message.content_available,
        });

        if tokens.len() == 1 {
            body["to"] = serde_json::json!(tokens[0]);
        } else {
            body["registration_ids"] = serde_json::json!(tokens);
        }

        if !message.is_silent() {
            body["notification"] = serde_json::json!({
                "title": message.title,
                "body": message.body,
                "sound": message.sound,
            });
        }

        body
    }

    /// Issue one send call and interpret the gateway response.
    async fn send(&self, tokens: &[String], message: &PushMessage) -> AppResult<MulticastOutcome> {
        let body = Self::request_body(tokens, message);

        let response = self
            .client
            .post(&self.config.gateway_url)
            .header("Authorization", format!("key={}", self.config.server_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                AppError::push_transport(format!("Push gateway unreachable: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::push_transport(format!(
                "Push gateway returned HTTP {status}"
            )));
        }

        let parsed: GatewayResponse = response.json().await.map_err(|e| {
            AppError::push_transport(format!("Unreadable push gateway response: {e}"))
        })?;

        let outcome = interpret_response(tokens, &parsed);
        debug!(
            success = outcome.success_count,
            failure = outcome.failure_count,
            invalid = outcome.invalid_tokens.len(),
            "Push gateway call completed"
        );
        Ok(outcome)
    }
}

/// Check whether a gateway error string marks a token as permanently dead.
fn is_invalid_token_error(error: &str) -> bool {
    error == "NotRegistered"
        || error == "InvalidRegistration"
        || error.contains("not a valid registration token")
}

/// Fold the gateway's per-token result list into an outcome.
fn interpret_response(tokens: &[String], response: &GatewayResponse) -> MulticastOutcome {
    let mut outcome = MulticastOutcome {
        success_count: response.success,
        failure_count: response.failure,
        invalid_tokens: Vec::new(),
    };

    for (i, result) in response.results.iter().enumerate() {
        if let Some(error) = &result.error {
            if is_invalid_token_error(error) {
                if let Some(token) = tokens.get(i) {
                    outcome.invalid_tokens.push(token.clone());
                }
            } else {
                warn!(error = %error, "Push delivery failed for a token");
            }
        }
    }

    outcome
}

#[async_trait]
impl PushGateway for HttpPushGateway {
    async fn send_multicast(
        &self,
        tokens: &[String],
        message: &PushMessage,
    ) -> AppResult<MulticastOutcome> {
        if tokens.is_empty() {
            return Ok(MulticastOutcome::default());
        }
        self.send(tokens, message).await
    }

    async fn send_single(&self, token: &str, message: &PushMessage) -> AppResult<()> {
        let outcome = self.send(&[token.to_string()], message).await?;
        if outcome.failure_count > 0 {
            return Err(AppError::push_delivery(format!(
                "Push delivery to token failed ({} invalid)",
                outcome.invalid_tokens.len()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::push::message::PushData;
    use crate::testutil::make_trip;

    fn tokens(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("tok-{i}")).collect()
    }

    #[test]
    fn test_interpret_response_collects_invalid_tokens() {
        let tokens = tokens(3);
        let response = GatewayResponse {
            success: 1,
            failure: 2,
            results: vec![
                TokenResult { error: None },
                TokenResult {
                    error: Some("NotRegistered".to_string()),
                },
                TokenResult {
                    error: Some("Unavailable".to_string()),
                },
            ],
        };
        let outcome = interpret_response(&tokens, &response);
        assert_eq!(outcome.success_count, 1);
        assert_eq!(outcome.failure_count, 2);
        assert_eq!(outcome.invalid_tokens, vec!["tok-1".to_string()]);
    }

    #[test]
    fn test_invalid_token_error_variants() {
        assert!(is_invalid_token_error("NotRegistered"));
        assert!(is_invalid_token_error("InvalidRegistration"));
        assert!(is_invalid_token_error(
            "the provided value is not a valid registration token"
        ));
        assert!(!is_invalid_token_error("Unavailable"));
        assert!(!is_invalid_token_error("InternalServerError"));
    }

    #[test]
    fn test_single_recipient_uses_to_field() {
        let trip = make_trip();
        let msg = PushMessage::alert("t", "b", PushData::for_new_trip(&trip));
        let one = HttpPushGateway::request_body(&tokens(1), &msg);
        assert_eq!(one["to"], "tok-0");
        assert!(one.get("registration_ids").is_none());

        let many = HttpPushGateway::request_body(&tokens(3), &msg);
        assert!(many.get("to").is_none());
        assert_eq!(many["registration_ids"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_silent_message_omits_notification_block() {
        let trip = make_trip();
        let msg = PushMessage::silent(PushData::for_new_trip(&trip));
        let body = HttpPushGateway::request_body(&tokens(2), &msg);
        assert!(body.get("notification").is_none());
        assert_eq!(body["priority"], "normal");
        assert_eq!(body["content_available"], true);
    }
}
