//! Settings read from the Lambda environment.

use std::env;
use std::time::Duration;

use tracing::warn;

use crate::error::{Error, Result};
use crate::reply::DEFAULT_REPLY_TIMEOUT;

#[derive(Clone)]
pub struct Settings {
    /// `SLACK_SIGNING_SECRET`, required.
    pub signing_secret: String,

    /// `SLACK_DUMP_REQUESTS`: log raw headers and bodies at debug level.
    pub dump_requests: bool,

    /// `SLACK_REPLY_TIMEOUT_SECS`: bound on the `response_url` POST.
    pub reply_timeout: Duration,

    /// `SLACK_MAX_REQUEST_AGE_SECS`: replay window. Unset means no window.
    pub max_request_age: Option<Duration>,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("signing_secret", &"<redacted>")
            .field("dump_requests", &self.dump_requests)
            .field("reply_timeout", &self.reply_timeout)
            .field("max_request_age", &self.max_request_age)
            .finish()
    }
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let signing_secret = lookup("SLACK_SIGNING_SECRET").unwrap_or_default();
        if signing_secret.is_empty() {
            return Err(Error::Config("SLACK_SIGNING_SECRET is not set".into()));
        }

        let dump_requests = lookup("SLACK_DUMP_REQUESTS")
            .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let reply_timeout = parse_secs(&lookup, "SLACK_REPLY_TIMEOUT_SECS")
            .unwrap_or(DEFAULT_REPLY_TIMEOUT);

        let max_request_age = parse_secs(&lookup, "SLACK_MAX_REQUEST_AGE_SECS");

        Ok(Settings {
            signing_secret,
            dump_requests,
            reply_timeout,
            max_request_age,
        })
    }
}

fn parse_secs<F>(lookup: &F, name: &str) -> Option<Duration>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(name)?;
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
        _ => {
            warn!(env_var = name, value = %raw, "Invalid seconds value, using default");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_missing_secret() {
        let err = Settings::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = Settings::from_lookup(lookup(&[("SLACK_SIGNING_SECRET", "")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_lookup(lookup(&[("SLACK_SIGNING_SECRET", "shhh")])).unwrap();
        assert_eq!(settings.signing_secret, "shhh");
        assert!(!settings.dump_requests);
        assert_eq!(settings.reply_timeout, DEFAULT_REPLY_TIMEOUT);
        assert_eq!(settings.max_request_age, None);
    }

    #[test]
    fn test_overrides() {
        let settings = Settings::from_lookup(lookup(&[
            ("SLACK_SIGNING_SECRET", "shhh"),
            ("SLACK_DUMP_REQUESTS", "true"),
            ("SLACK_REPLY_TIMEOUT_SECS", "3"),
            ("SLACK_MAX_REQUEST_AGE_SECS", "300"),
        ]))
        .unwrap();
        assert!(settings.dump_requests);
        assert_eq!(settings.reply_timeout, Duration::from_secs(3));
        assert_eq!(settings.max_request_age, Some(Duration::from_secs(300)));
    }

    #[test]
    fn test_invalid_timeout_falls_back() {
        let settings = Settings::from_lookup(lookup(&[
            ("SLACK_SIGNING_SECRET", "shhh"),
            ("SLACK_REPLY_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap();
        assert_eq!(settings.reply_timeout, DEFAULT_REPLY_TIMEOUT);
    }

    #[test]
    fn test_zero_seconds_falls_back() {
        let settings = Settings::from_lookup(lookup(&[
            ("SLACK_SIGNING_SECRET", "shhh"),
            ("SLACK_REPLY_TIMEOUT_SECS", "0"),
            ("SLACK_MAX_REQUEST_AGE_SECS", "0"),
        ]))
        .unwrap();
        assert_eq!(settings.reply_timeout, DEFAULT_REPLY_TIMEOUT);
        assert_eq!(settings.max_request_age, None);
    }
}
