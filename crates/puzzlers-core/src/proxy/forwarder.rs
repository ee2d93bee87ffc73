//! Request forwarding: inbound axum request in, translated reply out.

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{HeaderMap, Method},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use puzzlers_types::ProxyError;
use tracing::Instrument;

use super::headers::forwardable_request_headers;
use super::response::{ForwardError, ProxyResponse};
use super::server::AppState;

/// Inbound request reduced to what gets replayed upstream.
#[derive(Debug, Clone)]
pub struct ProxyRequest {
    pub method: Method,
    /// Path with the route prefix removed; empty when the prefix itself was hit
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    /// `None` for GET and HEAD
    pub body: Option<Bytes>,
}

/// Remove `prefix` from the front of `path`. Paths outside the prefix are kept as-is.
pub fn strip_prefix<'a>(path: &'a str, prefix: &str) -> &'a str {
    if prefix.is_empty() {
        return if path == "/" { "" } else { path };
    }
    match path.strip_prefix(prefix) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => path,
    }
}

fn carries_body(method: &Method) -> bool {
    !matches!(*method, Method::GET | Method::HEAD)
}

impl ProxyRequest {
    /// Split an axum request, reading the whole body for methods that carry one.
    pub async fn from_request(
        request: Request,
        route_prefix: &str,
        max_body_bytes: usize,
    ) -> Result<Self, ForwardError> {
        let (parts, body) = request.into_parts();
        let path = strip_prefix(parts.uri.path(), route_prefix).to_string();
        let query = parts.uri.query().map(str::to_string);
        let headers = forwardable_request_headers(&parts.headers);

        let body = if carries_body(&parts.method) {
            let bytes = to_bytes(body, max_body_bytes).await.map_err(|e| {
                ForwardError::with_source(ProxyError::BodyRead { message: e.to_string() }, &e)
            })?;
            Some(bytes)
        } else {
            None
        };

        Ok(Self { method: parts.method, path, query, headers, body })
    }
}

async fn relay(state: &AppState, request: Request) -> Result<ProxyResponse, ForwardError> {
    let req =
        ProxyRequest::from_request(request, &state.config.route_prefix, state.config.max_body_bytes)
            .await?;
    let target = state.upstream.target_url(&req.path, req.query.as_deref());

    tracing::info!("Proxying {} request to: {}", req.method, target);
    if let Some(body) = &req.body {
        tracing::debug!(bytes = body.len(), "forwarding request body");
    }

    let upstream = state.upstream.send(req.method, &target, req.headers, req.body).await?;
    tracing::debug!(status = upstream.status().as_u16(), "upstream replied");
    ProxyResponse::from_upstream(upstream).await
}

/// Forward one request and always produce a reply.
pub async fn forward(state: &AppState, request: Request) -> Response {
    let request_id = uuid::Uuid::new_v4().simple().to_string();
    let span = tracing::info_span!("proxy", request_id = %&request_id[..8]);

    async move {
        match relay(state, request).await {
            Ok(response) => response.into_response(),
            Err(err) => {
                tracing::error!("Proxy error: {}", err.error);
                err.into_envelope(state.config.expose_error_trace)
            },
        }
    }
    .instrument(span)
    .await
}

/// Axum handler mounted for every method under the route prefix.
pub async fn handle_proxy(State(state): State<AppState>, request: Request<Body>) -> Response {
    forward(&state, request).await
}
