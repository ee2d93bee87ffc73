//! # Puzzlers Core
//!
//! Server-side logic for IEEE Puzzlers.
//!
//! ```text
//! puzzlers-core/src/
//! ├── proxy/            # Reverse-proxy forwarder to the puzzle backend
//! │   ├── server.rs     # Router + shared state
//! │   ├── forwarder.rs  # receive → target → forward → translate → reply
//! │   ├── headers.rs    # Hop-by-hop filtering
//! │   ├── response.rs   # Upstream reply translation, error envelope
//! │   ├── upstream.rs   # reqwest client for the backend
//! │   └── middleware/   # Edge CORS
//! └── modules/          # Config file + env overrides, logging setup
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod error;
pub mod modules;
pub mod proxy;

pub use error::{AppError, AppResult};
pub use puzzlers_types::models::{AppConfig, ProxyConfig};
