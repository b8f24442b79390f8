use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while handling a slash command.
#[derive(Debug, Error)]
pub enum Error {
    /// The handler is misconfigured (e.g. no signing secret). Not an attacker signal.
    #[error("configuration error: {0}")]
    Config(String),

    /// The request must be rejected.
    #[error("cannot verify request: {0}")]
    Verification(VerifyFailure),

    #[error("failed to serialize reply: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The deferred reply could not be sent to `response_url`.
    #[error("failed to deliver reply: {0}")]
    Delivery(#[from] reqwest::Error),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VerifyFailure {
    #[error("signature mismatch")]
    SignatureMismatch,
    #[error("unreadable body: {0}")]
    UnreadableBody(String),
    #[error("request timestamp {0:?} outside the accepted window")]
    StaleTimestamp(String),
}

impl From<VerifyFailure> for Error {
    fn from(failure: VerifyFailure) -> Self {
        Error::Verification(failure)
    }
}

impl Error {
    pub fn is_verification(&self) -> bool {
        matches!(self, Error::Verification(_))
    }
}
