//! Proxy forwarding errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while forwarding a request upstream.
///
/// Every variant is reported to the caller as HTTP 500 with the
/// [`ProxyErrorBody`](crate::models::ProxyErrorBody) envelope.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum ProxyError {
    /// Inbound body could not be read (client hung up, over the size limit)
    #[error("Failed to read request body: {message}")]
    BodyRead { message: String },

    /// Target URL could not be built from the configured base and inbound path
    #[error("Invalid target URL {url}: {message}")]
    InvalidTarget { url: String, message: String },

    /// Upstream unreachable, connection reset, TLS failure
    #[error("{message}")]
    Upstream { message: String },

    /// Upstream did not answer within the configured timeout
    #[error("Upstream request timed out after {duration_secs}s")]
    Timeout { duration_secs: u64 },

    /// Upstream declared a JSON body that failed to decode
    #[error("Malformed upstream response: {message}")]
    MalformedResponse { message: String },
}

impl ProxyError {
    /// HTTP status code reported to the caller.
    pub fn http_status_code(&self) -> u16 {
        500
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_codes() {
        assert_eq!(ProxyError::Timeout { duration_secs: 30 }.http_status_code(), 500);
        assert_eq!(
            ProxyError::MalformedResponse { message: "eof".to_string() }.http_status_code(),
            500
        );
    }

    #[test]
    fn test_upstream_display_is_bare_message() {
        let err = ProxyError::Upstream { message: "error sending request".to_string() };
        assert_eq!(err.to_string(), "error sending request");
    }
}
