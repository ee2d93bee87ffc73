//! Application and proxy configuration.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::ConfigError;

pub const DEFAULT_ROUTE_PREFIX: &str = "/api-proxy";

fn validate_route_prefix(prefix: &str) -> Result<(), ValidationError> {
    if prefix.is_empty() || (prefix.starts_with('/') && !prefix.ends_with('/')) {
        return Ok(());
    }
    Err(ValidationError::new("route_prefix")
        .with_message("must start with '/' and must not end with '/'".into()))
}

/// Proxy forwarder configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
pub struct ProxyConfig {
    /// Backend every request is forwarded to (e.g. `http://10.0.0.5:5000`)
    #[serde(default)]
    #[validate(url)]
    pub upstream_base_url: Option<String>,
    /// Port to listen on
    #[serde(default = "default_port")]
    #[validate(range(min = 1_u16))]
    pub port: u16,
    /// Allow LAN access (bind to 0.0.0.0)
    #[serde(default)]
    pub allow_lan_access: bool,
    /// Local path the forwarder is mounted under; stripped before forwarding
    #[serde(default = "default_route_prefix")]
    #[validate(custom(function = "validate_route_prefix"))]
    pub route_prefix: String,
    /// Standalone cross-origin deployment: permissive CORS + OPTIONS fast path
    #[serde(default)]
    pub edge_cors: bool,
    /// Include the error source chain in 500 envelopes. Debugging only.
    #[serde(default)]
    pub expose_error_trace: bool,
    /// Upstream request timeout in seconds
    #[validate(range(min = 1_u64, max = 3600_u64))]
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
    /// Largest inbound body accepted for forwarding
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            upstream_base_url: None,
            port: default_port(),
            allow_lan_access: false,
            route_prefix: default_route_prefix(),
            edge_cors: false,
            expose_error_trace: false,
            request_timeout: default_request_timeout(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl ProxyConfig {
    /// Get the bind address based on LAN access setting.
    pub fn get_bind_address(&self) -> String {
        if self.allow_lan_access {
            "0.0.0.0".to_string()
        } else {
            "127.0.0.1".to_string()
        }
    }

    /// Get the full bind socket address.
    pub fn get_socket_addr(&self) -> String {
        format!("{}:{}", self.get_bind_address(), self.port)
    }

    /// Upstream base without a trailing slash. Errors when unset or blank.
    pub fn upstream_base(&self) -> Result<&str, ConfigError> {
        self.upstream_base_url
            .as_deref()
            .map(|u| u.trim().trim_end_matches('/'))
            .filter(|u| !u.is_empty())
            .ok_or(ConfigError::MissingUpstream)
    }
}

const fn default_port() -> u16 {
    8045
}

fn default_route_prefix() -> String {
    DEFAULT_ROUTE_PREFIX.to_string()
}

pub const fn default_request_timeout() -> u64 {
    120
}

const fn default_max_body_bytes() -> usize {
    100 * 1024 * 1024
}

/// Full application configuration (`config.json`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
pub struct AppConfig {
    #[serde(default)]
    #[validate(nested)]
    pub proxy: ProxyConfig,
    /// API root the CLI talks to (the forwarder or the backend itself)
    #[serde(default = "default_api_url")]
    #[validate(url)]
    pub api_url: String,
    /// API client timeout in seconds
    #[serde(default = "default_client_timeout")]
    pub client_timeout: u64,
    /// Directory for rolling log files; console only when unset
    #[serde(default)]
    pub log_dir: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            proxy: ProxyConfig::default(),
            api_url: default_api_url(),
            client_timeout: default_client_timeout(),
            log_dir: None,
        }
    }
}

fn default_api_url() -> String {
    format!("http://127.0.0.1:8045{DEFAULT_ROUTE_PREFIX}")
}

const fn default_client_timeout() -> u64 {
    30
}
