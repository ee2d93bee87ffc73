use axum::{http::StatusCode, response::IntoResponse, routing::get, Router};
use puzzlers_types::ProxyConfig;
use tower_http::trace::TraceLayer;

/// Public probes plus the forwarder mounted under its route prefix.
pub fn build_router(config: &ProxyConfig) -> anyhow::Result<Router> {
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
        .route("/version", get(version_info))
        .layer(TraceLayer::new_for_http());

    let proxy_routes = puzzlers_core::proxy::build_proxy_router(config)?;

    Ok(public_routes.merge(proxy_routes))
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, axum::Json(serde_json::json!({"status": "ok"})))
}

async fn version_info() -> impl IntoResponse {
    (
        StatusCode::OK,
        axum::Json(serde_json::json!({
            "version": option_env!("GIT_VERSION").unwrap_or("dev"),
            "build_time": option_env!("BUILD_TIME").unwrap_or("unknown"),
            "cargo_version": env!("CARGO_PKG_VERSION"),
        })),
    )
}
