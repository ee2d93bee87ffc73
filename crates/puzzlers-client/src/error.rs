//! Error types for the Puzzlers client.

use thiserror::Error;

/// Errors that can occur when using the Puzzlers client.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Base URL could not be turned into an endpoint URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTTP request failed before a status was received.
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server answered 2xx with a body that could not be used.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Server answered with a non-success status.
    #[error("Rejected ({status}): {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body as text; may be empty.
        message: String,
    },

    /// Input failed local validation; nothing was sent.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The same operation is already running.
    #[error("{0} already in progress")]
    InFlight(String),
}

impl ClientError {
    /// Plain-text message the backend attached to a rejection, if any.
    ///
    /// A JSON string body is unwrapped; JSON objects and arrays (problem
    /// details, validation maps) are not a message.
    pub fn backend_message(&self) -> Option<String> {
        let Self::Rejected { message, .. } = self else {
            return None;
        };
        let text = message.trim();
        if text.is_empty() {
            return None;
        }
        match serde_json::from_str::<serde_json::Value>(text) {
            Ok(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s),
            Ok(serde_json::Value::Object(_) | serde_json::Value::Array(_)) => None,
            _ => Some(text.to_string()),
        }
    }
}
