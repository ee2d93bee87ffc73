use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, middleware, routing::any, Router};
use puzzlers_types::ProxyConfig;
use tower_http::trace::TraceLayer;

use super::forwarder::handle_proxy;
use super::middleware::edge_cors;
use super::upstream::UpstreamClient;
use crate::error::AppResult;

/// Axum application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ProxyConfig>,
    pub upstream: Arc<UpstreamClient>,
}

impl AppState {
    /// Fails when no upstream base URL is configured.
    pub fn new(config: &ProxyConfig) -> AppResult<Self> {
        let base = config.upstream_base()?.to_string();
        let upstream = UpstreamClient::new(base, config.request_timeout)?;
        Ok(Self { config: Arc::new(config.clone()), upstream: Arc::new(upstream) })
    }
}

/// Build the forwarding router: the prefix itself and everything under it, any method.
pub fn build_proxy_router(config: &ProxyConfig) -> AppResult<Router> {
    let state = AppState::new(config)?;
    let prefix = config.route_prefix.as_str();

    let (root, wildcard) = if prefix.is_empty() {
        ("/".to_string(), "/*rest".to_string())
    } else {
        (prefix.to_string(), format!("{prefix}/*rest"))
    };

    let mut router = Router::new()
        .route(&root, any(handle_proxy))
        .route(&wildcard, any(handle_proxy))
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(TraceLayer::new_for_http());

    if config.edge_cors {
        router = router.layer(middleware::from_fn(edge_cors));
    }

    tracing::debug!(
        upstream = state.upstream.base_url(),
        prefix = %root,
        edge_cors = config.edge_cors,
        "proxy router built"
    );

    Ok(router.with_state(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use puzzlers_types::ConfigError;

    use crate::error::AppError;

    #[test]
    fn test_router_requires_upstream() {
        let config = ProxyConfig::default();
        let err = build_proxy_router(&config).unwrap_err();
        assert!(matches!(err, AppError::Config(ConfigError::MissingUpstream)));
    }

    #[test]
    fn test_router_builds_with_empty_prefix() {
        let config = ProxyConfig {
            upstream_base_url: Some("http://127.0.0.1:5000/".to_string()),
            route_prefix: String::new(),
            ..ProxyConfig::default()
        };
        assert!(build_proxy_router(&config).is_ok());
    }

    #[test]
    fn test_state_trims_base() {
        let config = ProxyConfig {
            upstream_base_url: Some("http://127.0.0.1:5000/".to_string()),
            ..ProxyConfig::default()
        };
        let state = AppState::new(&config).unwrap();
        assert_eq!(state.upstream.base_url(), "http://127.0.0.1:5000");
    }
}
