//! Error types for the autoupload client.
//!
//! # Design
//! Remote failures keep the body the service sent, so callers can inspect
//! field-level validation messages. Connectivity failures keep the raw
//! transport error. `has_remote_body` tells the two apart.

use serde_json::Value;
use thiserror::Error;

/// Boxed source error produced by an `HttpTransport` implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// No response was received: DNS failure, refused connection, timeout, or
/// an unreadable response body.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors returned by every client operation.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The service answered with a non-2xx status and a body. The body is
    /// kept as sent; a body that is not JSON is kept as a JSON string.
    #[error("remote API error (HTTP {status}): {body}")]
    Remote { status: u16, body: Value },

    /// The service answered with a non-2xx status and an empty body.
    #[error("HTTP {status} with an empty body")]
    Status { status: u16 },

    /// No response was received.
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    /// The request payload could not be encoded.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// A 2xx response body was not valid JSON.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// A 2xx response lacked a field the operation extracts.
    #[error("response is missing the `{0}` field")]
    MissingField(&'static str),
}

impl ApiError {
    pub fn has_remote_body(&self) -> bool {
        matches!(self, ApiError::Remote { .. })
    }

    pub fn remote_body(&self) -> Option<&Value> {
        match self {
            ApiError::Remote { body, .. } => Some(body),
            _ => None,
        }
    }

    /// HTTP status of the failed response, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Remote { status, .. } | ApiError::Status { status } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use serde_json::json;

    use super::*;

    #[test]
    fn remote_error_exposes_body() {
        let err = ApiError::Remote {
            status: 400,
            body: json!({"error": "invalid_grant"}),
        };
        assert!(err.has_remote_body());
        assert_eq!(err.remote_body(), Some(&json!({"error": "invalid_grant"})));
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn transport_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = ApiError::from(TransportError::with_source("POST http://x failed", io));
        assert!(!err.has_remote_body());
        assert_eq!(err.status(), None);

        let ApiError::Transport(inner) = &err else {
            panic!("expected Transport, got {err:?}");
        };
        assert_eq!(inner.message(), "POST http://x failed");
        assert_eq!(inner.source().unwrap().to_string(), "refused");
    }

    #[test]
    fn display_includes_status() {
        let err = ApiError::Status { status: 502 };
        assert_eq!(err.to_string(), "HTTP 502 with an empty body");
    }
}
