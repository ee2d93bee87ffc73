//! Typed error definitions for IEEE Puzzlers.
//!
//! One enum per domain. Each is serializable for API responses and carries
//! a human-readable `Display` for logs.

mod config;
mod proxy;
mod session;

pub use config::ConfigError;
pub use proxy::ProxyError;
pub use session::SessionError;
