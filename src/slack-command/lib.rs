//! Slack slash-command plumbing.
//!
//! Verifies that an inbound request was signed by Slack, pulls the slash
//! command fields out of its form body, and builds replies either inline or
//! through the `response_url` callback.
//!
//! ```no_run
//! use slack_command::{RequestSnapshot, Slack, IN_CHANNEL};
//!
//! # fn handle(req: http::Request<Vec<u8>>) -> slack_command::Result<Vec<u8>> {
//! let slack = Slack::new("signing-secret")?;
//! let snapshot = RequestSnapshot::from_request(req);
//! let command = slack.parse_command(&snapshot)?;
//! slack.reply_json(IN_CHANNEL, &format!("you said {}", command.text))
//! # }
//! ```

pub mod config;
pub mod error;
pub mod payload;
pub mod reply;
pub mod sink;
pub mod slack;
pub mod snapshot;
pub mod verify;

#[cfg(test)]
mod test_support;

pub use config::Settings;
pub use error::{Error, Result, VerifyFailure};
pub use payload::{extract, CommandPayload};
pub use reply::{build_reply, Reply, Responder, EPHEMERAL, IN_CHANNEL};
pub use sink::{DiagnosticSink, TracingSink, WriterSink};
pub use slack::Slack;
pub use snapshot::RequestSnapshot;
pub use verify::{sign, verify, SIGNATURE_HEADER, TIMESTAMP_HEADER};
