//! Header filtering for forwarded requests and relayed responses.

use axum::http::{header, HeaderMap, HeaderName};

/// Connection-scoped headers that must not be replayed on another hop.
const HOP_BY_HOP: &[&str] = &[
    "host",
    "connection",
    "content-length",
    "keep-alive",
    "proxy-connection",
    "transfer-encoding",
    "te",
    "trailer",
    "upgrade",
];

fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP.contains(&name.as_str())
}

/// Extra names listed in `Connection: close, x-foo` are hop-by-hop too.
fn connection_tokens(headers: &HeaderMap) -> Vec<String> {
    headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(|t| t.trim().to_ascii_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

fn filtered(source: &HeaderMap, also_skip: &[HeaderName]) -> HeaderMap {
    let listed = connection_tokens(source);
    let mut out = HeaderMap::with_capacity(source.len());
    for (name, value) in source {
        if is_hop_by_hop(name)
            || also_skip.contains(name)
            || listed.iter().any(|t| t == name.as_str())
        {
            continue;
        }
        out.append(name.clone(), value.clone());
    }
    out
}

/// Headers to send upstream.
///
/// `Authorization` and `Content-Type` pass through when present; nothing is
/// added, so a multipart upload keeps its boundary parameter.
/// `Accept-Encoding` is dropped: replies are decoded here, so upstream must
/// send identity bodies.
pub fn forwardable_request_headers(inbound: &HeaderMap) -> HeaderMap {
    filtered(inbound, &[header::ACCEPT_ENCODING])
}

/// Upstream headers to relay back. `Content-Type` is set by the translator.
pub fn relayable_response_headers(upstream: &HeaderMap) -> HeaderMap {
    filtered(upstream, &[header::CONTENT_TYPE])
}
