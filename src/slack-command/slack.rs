use std::fmt;
use std::io::Read;
use std::sync::Arc;
use std::time::Duration;

use http::HeaderMap;

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::payload::{self, CommandPayload};
use crate::reply::{self, Responder, DEFAULT_REPLY_TIMEOUT};
use crate::sink::{DiagnosticSink, TracingSink};
use crate::snapshot::RequestSnapshot;
use crate::verify::{self, TIMESTAMP_HEADER};

/// Slash command handler for one Slack app.
///
/// Holds only immutable configuration, so a single instance can serve
/// concurrent requests. The parsed [`CommandPayload`] is owned by the caller.
#[derive(Clone)]
pub struct Slack {
    signing_secret: String,
    sink: Option<Arc<dyn DiagnosticSink>>,
    max_request_age: Option<Duration>,
    responder: Responder,
}

impl fmt::Debug for Slack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slack")
            .field("signing_secret", &"<redacted>")
            .field("sink", &self.sink.is_some())
            .field("max_request_age", &self.max_request_age)
            .finish()
    }
}

impl Slack {
    /// Handler with no sink, no replay window and the default reply timeout.
    pub fn new(signing_secret: impl Into<String>) -> Result<Self> {
        Ok(Self {
            signing_secret: signing_secret.into(),
            sink: None,
            max_request_age: None,
            responder: Responder::new(DEFAULT_REPLY_TIMEOUT)?,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let mut slack = Self::new(settings.signing_secret.clone())?
            .with_responder(Responder::new(settings.reply_timeout)?);
        if settings.dump_requests {
            slack = slack.with_sink(TracingSink);
        }
        if let Some(max_age) = settings.max_request_age {
            slack = slack.with_max_request_age(max_age);
        }
        Ok(slack)
    }

    /// Dump every inbound request to `sink` before verifying it.
    pub fn with_sink(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        self.sink = Some(Arc::new(sink));
        self
    }

    /// Also reject requests whose timestamp is further than `max_age` from now.
    /// Off unless set.
    pub fn with_max_request_age(mut self, max_age: Duration) -> Self {
        self.max_request_age = Some(max_age);
        self
    }

    pub fn with_responder(mut self, responder: Responder) -> Self {
        self.responder = responder;
        self
    }

    /// Read the request body, failing on configuration before touching the stream.
    pub fn capture<R: Read>(&self, headers: HeaderMap, body: R) -> Result<RequestSnapshot> {
        self.check_secret()?;
        RequestSnapshot::capture(headers, body)
    }

    pub fn verify(&self, request: &RequestSnapshot) -> Result<()> {
        self.check_secret()?;
        if let Some(sink) = &self.sink {
            sink.dump(request.headers(), request.body());
        }

        verify::verify(&self.signing_secret, request.headers(), request.body())?;

        if let Some(max_age) = self.max_request_age {
            verify::check_freshness(
                request.header_str(TIMESTAMP_HEADER),
                chrono::Utc::now().timestamp(),
                max_age,
            )?;
        }
        Ok(())
    }

    pub fn extract(&self, request: &RequestSnapshot) -> CommandPayload {
        payload::extract(request.body())
    }

    /// Verify the request, then parse its command fields.
    pub fn parse_command(&self, request: &RequestSnapshot) -> Result<CommandPayload> {
        self.verify(request)?;
        Ok(self.extract(request))
    }

    pub fn reply_json(&self, response_type: &str, text: &str) -> Result<Vec<u8>> {
        reply::build_reply(response_type, text)
    }

    pub async fn reply_later(
        &self,
        payload: &CommandPayload,
        response_type: &str,
        text: &str,
    ) -> Result<()> {
        self.responder
            .send_deferred_reply(payload, response_type, text)
            .await
    }

    pub fn reply_timeout(&self) -> Duration {
        self.responder.timeout()
    }

    fn check_secret(&self) -> Result<()> {
        if self.signing_secret.is_empty() {
            return Err(Error::Config("signing secret cannot be empty".into()));
        }
        Ok(())
    }
}
