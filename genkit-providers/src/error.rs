//! Conversions from transport and codec failures to core errors

use genkit_core::Error as CoreError;

/// Convert network errors to core errors
pub fn network_error(error: reqwest::Error) -> CoreError {
    CoreError::Transport {
        status: error.status().map(|s| s.as_u16()),
        message: error.to_string(),
        source: Some(Box::new(error)),
    }
}

/// Convert a non-success HTTP status and its body to a core error
pub fn status_error(status: u16, body: &str) -> CoreError {
    match status {
        401 | 403 => CoreError::Authentication(format!("HTTP {status}: {body}")),
        _ => CoreError::Transport {
            status: Some(status),
            message: format!("HTTP {status}: {body}"),
            source: None,
        },
    }
}

/// Convert serialization errors to core errors
pub fn serialization_error(error: serde_json::Error) -> CoreError {
    CoreError::Serialization {
        message: error.to_string(),
        source: Some(Box::new(error)),
    }
}
