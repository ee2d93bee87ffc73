//! # Puzzlers Types
//!
//! Core types, models, and error definitions for IEEE Puzzlers.
//!
//! - **`error`** - Typed error hierarchy for the proxy, the session and configuration
//! - **`models`** - Domain models (session state, identity, roles, puzzles, config)
//!
//! ## Architecture Role
//!
//! `puzzlers-types` sits at the bottom of the dependency graph:
//!
//! ```text
//!                puzzlers-types (this crate)
//!                        │
//!            ┌───────────┴───────────┐
//!            ▼                       ▼
//!      puzzlers-core           puzzlers-client
//!            │                       │
//!            └───────────┬───────────┘
//!                        ▼
//!                 puzzlers-server
//! ```

pub mod error;
pub mod models;

pub use error::{ConfigError, ProxyError, SessionError};

pub use models::{
    AdminUserSummary, AppConfig, Difficulty, LoginRequest, LoginResponse, NewPuzzle,
    ProxyConfig, ProxyErrorBody, PuzzleImage, PuzzleItem, RegisterRequest, SessionState,
    UserInfo, UserRole,
};
