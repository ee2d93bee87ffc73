//! Upstream reply translation and the failure envelope.

use axum::{
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use puzzlers_types::{ProxyError, ProxyErrorBody};
use serde_json::Value;

use super::headers::relayable_response_headers;
use super::upstream::error_chain;

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Body of a translated reply, discriminated by upstream content type.
#[derive(Debug, Clone, PartialEq)]
pub enum ProxyBody {
    /// Upstream declared `application/json`; decoded and re-encoded
    Json(Value),
    /// Anything else, relayed byte-for-byte with its content type
    Raw { content_type: HeaderValue, bytes: Bytes },
}

/// Reply to send back to the original caller.
#[derive(Debug, Clone)]
pub struct ProxyResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: ProxyBody,
}

fn is_json(content_type: Option<&HeaderValue>) -> bool {
    content_type
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.to_ascii_lowercase().contains("application/json"))
}

impl ProxyResponse {
    /// Translate the parts of an upstream reply.
    ///
    /// An empty body is never decoded, so a JSON-typed 204 stays a 204.
    pub fn from_parts(
        status: StatusCode,
        upstream_headers: &HeaderMap,
        bytes: Bytes,
    ) -> Result<Self, ForwardError> {
        let content_type = upstream_headers.get(header::CONTENT_TYPE);
        let mut headers = relayable_response_headers(upstream_headers);

        let body = if is_json(content_type) && !bytes.is_empty() {
            let value: Value = serde_json::from_slice(&bytes).map_err(|e| {
                ForwardError::with_source(
                    ProxyError::MalformedResponse { message: e.to_string() },
                    &e,
                )
            })?;
            // Re-encoded below as plain JSON.
            headers.remove(header::CONTENT_ENCODING);
            ProxyBody::Json(value)
        } else {
            ProxyBody::Raw {
                content_type: content_type
                    .cloned()
                    .unwrap_or_else(|| HeaderValue::from_static(FALLBACK_CONTENT_TYPE)),
                bytes,
            }
        };

        Ok(Self { status, headers, body })
    }

    /// Read the whole upstream reply and translate it.
    pub async fn from_upstream(upstream: reqwest::Response) -> Result<Self, ForwardError> {
        let status = StatusCode::from_u16(upstream.status().as_u16())
            .unwrap_or(StatusCode::BAD_GATEWAY);
        let headers = upstream.headers().clone();
        let bytes = upstream.bytes().await.map_err(|e| {
            ForwardError::with_source(ProxyError::Upstream { message: e.to_string() }, &e)
        })?;
        Self::from_parts(status, &headers, bytes)
    }
}

impl IntoResponse for ProxyResponse {
    fn into_response(self) -> Response {
        match self.body {
            ProxyBody::Json(value) => (self.status, self.headers, Json(value)).into_response(),
            ProxyBody::Raw { content_type, bytes } => {
                let mut headers = self.headers;
                headers.insert(header::CONTENT_TYPE, content_type);
                (self.status, headers, bytes).into_response()
            },
        }
    }
}

/// A forwarding failure plus the diagnostic chain behind it.
#[derive(Debug, Clone)]
pub struct ForwardError {
    pub error: ProxyError,
    pub trace: String,
}

impl ForwardError {
    pub fn new(error: ProxyError) -> Self {
        let trace = error.to_string();
        Self { error, trace }
    }

    pub fn with_source(error: ProxyError, source: &(dyn std::error::Error + 'static)) -> Self {
        Self { error, trace: error_chain(source) }
    }

    /// 500 envelope. The trace is only attached when `expose_trace` is set.
    pub fn into_envelope(self, expose_trace: bool) -> Response {
        let status = StatusCode::from_u16(self.error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ProxyErrorBody::new(self.error.to_string())
            .with_trace(expose_trace.then_some(self.trace));
        (status, Json(body)).into_response()
    }
}

impl From<ProxyError> for ForwardError {
    fn from(error: ProxyError) -> Self {
        Self::new(error)
    }
}
