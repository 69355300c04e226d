//! Error types for the GenKit library

use crate::types::message::{Message, Role};
use std::error::Error as StdError;
use thiserror::Error;

/// The main error type for all GenKit operations
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A message role has no representation on the provider's wire
    #[error("Unsupported role: {0:?}")]
    UnsupportedRole(Role),

    /// A request cannot be expressed on the provider's wire
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A complete provider response could not be mapped to a message
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// A streamed fragment contradicts fragments already merged
    ///
    /// The snapshot accumulated before the offending fragment is carried
    /// along so callers still get everything that arrived intact.
    #[error("Protocol violation: {message}")]
    ProtocolViolation {
        /// What the provider did wrong
        message: String,
        /// Snapshot accumulated up to, but excluding, the offending fragment
        partial: Box<Message>,
    },

    /// Errors raised by the transport, passed through unmodified
    #[error("Transport error: {message}")]
    Transport {
        /// HTTP status code when the server answered
        status: Option<u16>,
        /// Error message
        message: String,
        /// Underlying error if available
        #[source]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },

    /// Authentication errors
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message
        message: String,
        /// Underlying error if available
        #[source]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The caller stopped accepting updates before the stream finished
    #[error("Stream cancelled by caller")]
    Cancelled,
}

impl Error {
    /// Create a transport error without an HTTP status
    pub fn transport(message: impl Into<String>) -> Self {
        Error::Transport {
            status: None,
            message: message.into(),
            source: None,
        }
    }

    /// The partial snapshot attached to a protocol violation, if any
    pub fn partial_message(&self) -> Option<&Message> {
        match self {
            Error::ProtocolViolation { partial, .. } => Some(partial),
            _ => None,
        }
    }
}

/// Result type alias for GenKit operations
pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_error_display() {
        let error = Error::UnsupportedRole(Role::Tool);
        assert_eq!(error.to_string(), "Unsupported role: Tool");

        let error = Error::InvalidRequest("unknown tool".into());
        assert_eq!(error.to_string(), "Invalid request: unknown tool");

        let error = Error::MalformedResponse("missing role".into());
        assert_eq!(error.to_string(), "Malformed response: missing role");

        let error = Error::ProtocolViolation {
            message: "index 0 already bound to call_a".into(),
            partial: Box::new(Message::assistant("")),
        };
        assert_eq!(
            error.to_string(),
            "Protocol violation: index 0 already bound to call_a"
        );

        let error = Error::Transport {
            status: Some(503),
            message: "HTTP 503: overloaded".into(),
            source: None,
        };
        assert_eq!(error.to_string(), "Transport error: HTTP 503: overloaded");

        let error = Error::Authentication("Invalid API key".into());
        assert_eq!(error.to_string(), "Authentication error: Invalid API key");

        let error = Error::Configuration("MISTRAL_API_KEY not set".into());
        assert_eq!(
            error.to_string(),
            "Configuration error: MISTRAL_API_KEY not set"
        );

        assert_eq!(Error::Cancelled.to_string(), "Stream cancelled by caller");
    }

    #[test]
    fn test_error_source() {
        let error = Error::transport("Connection failed");
        assert!(error.source().is_none());

        let io_error = io::Error::new(io::ErrorKind::ConnectionRefused, "refused");
        let error = Error::Transport {
            status: None,
            message: "Connection failed".into(),
            source: Some(Box::new(io_error)),
        };
        assert!(error.source().is_some());

        let error = Error::MalformedResponse("test".into());
        assert!(error.source().is_none());
    }

    #[test]
    fn test_error_from_serde_json_error() {
        let json_error = serde_json::from_str::<String>("invalid json").unwrap_err();
        let error: Error = json_error.into();

        match error {
            Error::Serialization { message, source } => {
                assert!(!message.is_empty());
                assert!(source.is_some());
            }
            _ => panic!("Expected Serialization error"),
        }
    }

    #[test]
    fn test_partial_message_only_on_protocol_violation() {
        let error = Error::ProtocolViolation {
            message: "conflict".into(),
            partial: Box::new(Message::assistant("partial text")),
        };
        assert_eq!(
            error.partial_message().and_then(Message::text).as_deref(),
            Some("partial text")
        );

        assert!(Error::Cancelled.partial_message().is_none());
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }
}
