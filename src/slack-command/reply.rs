use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::payload::CommandPayload;

pub const IN_CHANNEL: &str = "in_channel";
pub const EPHEMERAL: &str = "ephemeral";

pub const DEFAULT_REPLY_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub response_type: String,
    pub text: String,
}

impl Reply {
    pub fn new(response_type: &str, text: &str) -> Self {
        Self {
            response_type: response_type.to_string(),
            text: text.to_string(),
        }
    }
}

/// Serialize `{"response_type": ..., "text": ...}`. The response type is passed through as-is.
pub fn build_reply(response_type: &str, text: &str) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(&Reply::new(response_type, text))?)
}

/// Posts replies to a command's `response_url`.
#[derive(Debug, Clone)]
pub struct Responder {
    client: Client,
    timeout: Duration,
}

impl Responder {
    /// `timeout` bounds the whole POST and must be non-zero.
    pub fn new(timeout: Duration) -> Result<Self> {
        if timeout.is_zero() {
            return Err(Error::Config("reply timeout must be greater than zero".into()));
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// POST the reply as JSON to `payload.response_url`.
    ///
    /// Only transport failures are errors; a non-2xx status is accepted.
    pub async fn send_deferred_reply(
        &self,
        payload: &CommandPayload,
        response_type: &str,
        text: &str,
    ) -> Result<()> {
        let body = build_reply(response_type, text)?;

        let response = self
            .client
            .post(&payload.response_url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        debug!(
            status = status.as_u16(),
            accepted = status.is_success(),
            command = %payload.command,
            "slack_deferred_reply_sent"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_reply_exact_bytes() {
        let json = build_reply(IN_CHANNEL, "hello").unwrap();
        assert_eq!(json, br#"{"response_type":"in_channel","text":"hello"}"#);
    }

    #[test]
    fn test_build_reply_passes_type_through() {
        let json = build_reply("whatever", "a \"quoted\"\nline").unwrap();
        assert_eq!(
            String::from_utf8(json).unwrap(),
            r#"{"response_type":"whatever","text":"a \"quoted\"\nline"}"#
        );
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = Responder::new(Duration::ZERO).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert_eq!(
            Responder::new(Duration::from_secs(3)).unwrap().timeout(),
            Duration::from_secs(3)
        );
    }

    #[tokio::test]
    async fn test_delivery_logs_only_at_debug() {
        use wiremock::{matchers::method, Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        let payload = CommandPayload {
            response_url: server.uri(),
            ..Default::default()
        };

        let levels = crate::test_support::LevelRecorder::default();
        let _guard = levels.set_default();
        Responder::new(DEFAULT_REPLY_TIMEOUT)
            .unwrap()
            .send_deferred_reply(&payload, IN_CHANNEL, "hello")
            .await
            .unwrap();

        assert!(!levels.recorded().is_empty());
        assert!(levels.all_debug_or_lower());
    }

    #[tokio::test]
    async fn test_send_without_response_url_fails() {
        let responder = Responder::new(DEFAULT_REPLY_TIMEOUT).unwrap();
        let err = responder
            .send_deferred_reply(&CommandPayload::default(), EPHEMERAL, "hi")
            .await
            .unwrap_err();
        assert!(matches!(err, crate::Error::Delivery(_)));
    }
}
