//! Core domain models for IEEE Puzzlers.

mod auth;
mod config;
mod normalize;
mod proxy;
mod puzzle;
mod session;

pub use auth::{AdminUserSummary, LoginRequest, LoginResponse, RegisterRequest, UserInfo, UserRole};
pub use config::{default_request_timeout, AppConfig, ProxyConfig, DEFAULT_ROUTE_PREFIX};
pub use proxy::ProxyErrorBody;
pub use puzzle::{Difficulty, NewPuzzle, PuzzleImage, PuzzleItem};
pub use session::SessionState;
