//! Wire envelope for forwarding failures.

use serde::{Deserialize, Serialize};

/// JSON body returned with HTTP 500 when forwarding fails.
///
/// `trace` is only populated when trace exposure is enabled in config.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProxyErrorBody {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub trace: Option<String>,
}

impl ProxyErrorBody {
    pub const ERROR_LABEL: &'static str = "Proxy error";

    pub fn new(message: impl Into<String>) -> Self {
        Self { error: Self::ERROR_LABEL.to_string(), message: message.into(), trace: None }
    }

    #[must_use]
    pub fn with_trace(mut self, trace: Option<String>) -> Self {
        self.trace = trace;
        self
    }
}
