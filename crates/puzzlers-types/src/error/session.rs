//! Session (authentication) errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced by session operations.
///
/// The session manager also mirrors [`user_message`](Self::user_message) into
/// its `error` field, so callers may ignore the returned error and read state.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum SessionError {
    /// Required input missing; nothing was sent to the backend
    #[error("Validation failed: {message}")]
    Validation { message: String },

    /// Same operation already running
    #[error("Operation already in progress: {operation}")]
    InFlight { operation: String },

    /// Backend refused the credentials or the request
    #[error("Rejected by backend: {message}")]
    Rejected { message: String },

    /// Backend unreachable or the exchange failed in transit
    #[error("{operation} failed: {message}")]
    Transport { operation: String, message: String },

    /// Backend answered 2xx but without a usable token
    #[error("Invalid response from server")]
    InvalidResponse,
}

impl SessionError {
    /// Human-readable message stored in the session `error` field.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation { message } | Self::Rejected { message } => message.clone(),
            Self::InFlight { operation } => format!("{operation} already in progress"),
            Self::Transport { operation, .. } => format!("{operation} failed"),
            Self::InvalidResponse => "Invalid response from server".to_string(),
        }
    }
}
