//! Errors - typed failures at the worker's I/O boundaries.
//!
//! Work failures are not errors here: they travel as
//! [`ProcessingOutcome::Failure`](super::outcome::ProcessingOutcome) data
//! into the router. Only the codec, dispatch and configuration seams can fail.

use thiserror::Error;

/// Envelope decode/encode failures.
///
/// Both variants are permanent: retrying delivery of the same bytes can never
/// succeed, so the entry point drops the request instead of asking for a retry.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The request body could not be read off the connection.
    #[error("failed to read work request: {0}")]
    Unreadable(String),

    /// The body was read but is not a valid work-request envelope.
    #[error("failed to parse work request: {0}")]
    Malformed(#[from] prost::DecodeError),
}

/// Task-creation failures.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("invalid dispatch configuration: {0}")]
    Configuration(String),

    #[error("failed to obtain access token: {0}")]
    Auth(String),

    #[error("task creation request failed: {0}")]
    Transport(String),

    /// The task API answered with a non-success status.
    #[error("task API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Injected failure from the in-memory dispatcher.
    #[error("{0}")]
    Rejected(String),
}

/// Configuration values that must stop the process at startup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be one of: {expected} (got {value})")]
    UnknownVariant {
        name: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("{0} cannot be empty")]
    Empty(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[test]
    fn malformed_wraps_decode_error() {
        let err = crate::domain::envelope::SvcWorkRequest::decode(&b"\xff\xff\xff"[..]).unwrap_err();
        let codec = CodecError::from(err);
        assert!(codec.to_string().starts_with("failed to parse work request"));
    }

    #[test]
    fn api_error_mentions_status() {
        let err = DispatchError::Api {
            status: 404,
            message: "queue not found".to_string(),
        };
        assert_eq!(err.to_string(), "task API error (404): queue not found");
    }
}
