//! Error types for the validation pipeline.
//!
//! # Design
//! Only malformed input is an error here. A target that turns out to be
//! unreachable, HTML, or excluded is a normal [`Verdict`](crate::Verdict),
//! never a `ClientError`. Transport failures are caught by the probe plan and
//! turned into rejections before they reach the caller.

use thiserror::Error;

/// Malformed-request errors, surfaced to the caller as 4xx responses.
///
/// The `Display` text is the exact `error` string of the response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("POST only")]
    MethodNotAllowed,

    #[error("Invalid JSON")]
    InvalidJson,

    #[error("Missing url")]
    MissingUrl,

    #[error("Invalid URL")]
    InvalidUrl,
}

impl ClientError {
    /// HTTP status code reported for this error.
    pub fn status(self) -> u16 {
        match self {
            ClientError::MethodNotAllowed => 405,
            ClientError::InvalidJson | ClientError::MissingUrl | ClientError::InvalidUrl => 400,
        }
    }
}

/// Failure of a single outbound probe before any response was received.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("probe timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request could not be built: {0}")]
    InvalidRequest(String),

    #[error("too many redirects")]
    Redirect,

    #[error("transport error: {0}")]
    Other(String),
}
