use std::time::Duration;

use axum::http::{HeaderMap, Method};
use bytes::Bytes;
use puzzlers_types::ProxyError;
use reqwest::{redirect, Client};

use super::response::ForwardError;
use crate::error::AppResult;

/// HTTP client bound to one upstream base URL.
pub struct UpstreamClient {
    http_client: Client,
    base_url: String,
    timeout_secs: u64,
}

impl UpstreamClient {
    /// `base_url` must already be trimmed of its trailing slash.
    ///
    /// Redirects are relayed to the caller rather than followed.
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .redirect(redirect::Policy::none())
            .build()?;
        Ok(Self { http_client, base_url: base_url.into(), timeout_secs })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Base + path + `?query`, with no re-encoding of either part.
    pub fn target_url(&self, path: &str, query: Option<&str>) -> String {
        match query {
            Some(q) if !q.is_empty() => format!("{}{}?{}", self.base_url, path, q),
            _ => format!("{}{}", self.base_url, path),
        }
    }

    /// Send one request upstream. Non-2xx replies are `Ok`; only transport failures are `Err`.
    pub async fn send(
        &self,
        method: Method,
        url: &str,
        headers: HeaderMap,
        body: Option<Bytes>,
    ) -> Result<reqwest::Response, ForwardError> {
        let mut request = self.http_client.request(method, url).headers(headers);
        if let Some(body) = body {
            request = request.body(body);
        }
        request.send().await.map_err(|e| ForwardError::with_source(self.classify(url, &e), &e))
    }

    fn classify(&self, url: &str, e: &reqwest::Error) -> ProxyError {
        if e.is_timeout() {
            ProxyError::Timeout { duration_secs: self.timeout_secs }
        } else if e.is_builder() {
            ProxyError::InvalidTarget { url: url.to_string(), message: e.to_string() }
        } else {
            ProxyError::Upstream { message: e.to_string() }
        }
    }
}

/// Display of an error followed by its `source()` chain, one cause per line.
pub fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str("\ncaused by: ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}
