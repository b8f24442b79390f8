//! Slack request signing, version `v0`.
//!
//! Slack signs `v0:{timestamp}:{raw body}` with HMAC-SHA256 keyed by the
//! app's signing secret and sends `v0={hex digest}` in `X-Slack-Signature`.
//! Reference: https://api.slack.com/authentication/verifying-requests-from-slack

use std::time::Duration;

use hmac::{Hmac, Mac};
use http::HeaderMap;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::error::{Error, Result, VerifyFailure};

type HmacSha256 = Hmac<Sha256>;

pub const TIMESTAMP_HEADER: &str = "X-Slack-Request-Timestamp";
pub const SIGNATURE_HEADER: &str = "X-Slack-Signature";
pub const VERSION: &str = "v0";

/// Compute the `v0=...` signature Slack would send for `body` at `timestamp`.
pub fn sign(secret: &str, timestamp: &str, body: &[u8]) -> Result<String> {
    if secret.is_empty() {
        return Err(Error::Config("signing secret cannot be empty".into()));
    }

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| Error::Config(format!("invalid signing secret: {e}")))?;
    // Exact bytes, no normalization
    mac.update(VERSION.as_bytes());
    mac.update(b":");
    mac.update(timestamp.as_bytes());
    mac.update(b":");
    mac.update(body);

    Ok(format!("{}={}", VERSION, hex::encode(mac.finalize().into_bytes())))
}

/// Check the signature headers against `body`.
///
/// Missing headers read as empty and fail the comparison. The timestamp is
/// not checked for freshness; see [`check_freshness`].
pub fn verify(secret: &str, headers: &HeaderMap, body: &[u8]) -> Result<()> {
    let timestamp = header_str(headers, TIMESTAMP_HEADER);
    let signature = header_str(headers, SIGNATURE_HEADER);

    let expected = sign(secret, timestamp, body)?;

    if bool::from(expected.as_bytes().ct_eq(signature.as_bytes())) {
        Ok(())
    } else {
        debug!(
            timestamp = %timestamp,
            has_signature = !signature.is_empty(),
            expected_length = expected.len(),
            actual_length = signature.len(),
            "slack_signature_mismatch"
        );
        Err(VerifyFailure::SignatureMismatch.into())
    }
}

/// Reject timestamps further than `max_age` from `now` (unix seconds).
pub fn check_freshness(timestamp: &str, now: i64, max_age: Duration) -> Result<()> {
    let Ok(sent_at) = timestamp.parse::<i64>() else {
        debug!(timestamp = %timestamp, "slack_signature_invalid_timestamp");
        return Err(VerifyFailure::StaleTimestamp(timestamp.to_string()).into());
    };

    let age = now.abs_diff(sent_at);
    if age > max_age.as_secs() {
        debug!(
            sent_at,
            now,
            age_seconds = age,
            max_age_seconds = max_age.as_secs(),
            "slack_signature_stale"
        );
        return Err(VerifyFailure::StaleTimestamp(timestamp.to_string()).into());
    }
    Ok(())
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}
