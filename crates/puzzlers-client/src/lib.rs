#![doc = include_str!("../README.md")]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

mod client;
mod error;
mod inflight;
pub mod session;
mod types;

pub use client::PuzzlersClient;
pub use error::ClientError;
pub use inflight::{InFlightGuard, InFlightRegistry};
pub use session::{
    AuthBackend, FileTokenStore, LogNavigator, MemoryTokenStore, Navigator, NoopNavigator, Route,
    SessionManager, StorageError, TokenStore,
};
pub use types::*;
