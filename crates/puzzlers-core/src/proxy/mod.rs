//! Proxy module - reverse proxy to the puzzle backend
//!
//! Every request under the configured route prefix is relayed to a single
//! upstream base URL:
//! - raw body bytes forwarded untouched (JSON and multipart alike)
//! - hop-by-hop headers stripped, everything else passed through
//! - JSON replies re-encoded, anything else relayed verbatim
//! - failures folded into a fixed 500 envelope

pub mod forwarder;
pub mod headers;
pub mod middleware;
pub mod response;
pub mod server;
pub mod upstream;

pub use forwarder::{forward, ProxyRequest};
pub use response::{ForwardError, ProxyBody, ProxyResponse};
pub use server::{build_proxy_router, AppState};
pub use upstream::UpstreamClient;
