//! Client session manager.
//!
//! Owns the authentication state of one client: the bearer token, the user
//! and roles decoded from its claims, and the loading/error flags of the
//! login flow. State is published through a `watch` channel so any number
//! of observers can follow it.
//!
//! ```text
//! new ──hydrate──► Unauthenticated ──login ok──► Authenticated
//!                        ▲   │ login err (error set)     │
//!                        │   └──────────┘                │
//!                        └───────────── logout ──────────┘
//! ```

pub mod claims;
mod navigator;
mod storage;

use std::sync::Arc;

use async_trait::async_trait;
use puzzlers_types::{LoginRequest, LoginResponse, SessionError, SessionState, UserInfo, UserRole};
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use validator::Validate;

use crate::error::ClientError;
use crate::inflight::InFlightRegistry;

pub use navigator::{LogNavigator, Navigator, NoopNavigator, Route};
pub use storage::{FileTokenStore, MemoryTokenStore, StorageError, TokenStore, STORAGE_KEY};

const LOGIN_KEY: &str = "login";
const LOGIN_FAILED: &str = "Login failed";
const CREDENTIALS_REQUIRED: &str = "Username and password are required";

/// The one backend call the session manager makes.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ClientError>;
}

/// Signed-in state for `token`, or `None` when its claims carry no user.
fn state_from_token(token: &str) -> Option<SessionState> {
    let claims = claims::decode_claims(token);
    let user = claims::user_from_claims(&claims);
    let roles = claims::roles_from_claims(&claims);
    SessionState::authenticated(token.to_string(), user, roles)
}

fn hydrate(store: Option<&dyn TokenStore>) -> SessionState {
    let Some(store) = store else {
        return SessionState::default();
    };
    let token = match store.load() {
        Ok(Some(token)) => token,
        Ok(None) => return SessionState::default(),
        Err(e) => {
            tracing::warn!("Failed to read stored token: {}", e);
            return SessionState::default();
        },
    };

    match state_from_token(&token) {
        Some(state) => {
            tracing::debug!("Restored session from stored token");
            state
        },
        None => {
            tracing::warn!("Stored token carries no user claims, discarding it");
            if let Err(e) = store.remove() {
                tracing::warn!("Failed to remove stored token: {}", e);
            }
            SessionState::default()
        },
    }
}

fn session_error(err: ClientError) -> SessionError {
    match err {
        ClientError::Rejected { .. } => SessionError::Rejected {
            message: err.backend_message().unwrap_or_else(|| LOGIN_FAILED.to_string()),
        },
        other => SessionError::Transport { operation: "Login".to_string(), message: other.to_string() },
    }
}

pub struct SessionManager {
    backend: Arc<dyn AuthBackend>,
    store: Option<Arc<dyn TokenStore>>,
    navigator: Arc<dyn Navigator>,
    state: watch::Sender<SessionState>,
    in_flight: InFlightRegistry,
}

impl SessionManager {
    /// Build a manager and hydrate it from `store`.
    ///
    /// A stored token is trusted without contacting the backend. `None` for
    /// `store` means no persistence is available at all.
    pub fn new(
        backend: Arc<dyn AuthBackend>,
        store: Option<Arc<dyn TokenStore>>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let initial = hydrate(store.as_deref());
        let (state, _) = watch::channel(initial);
        Self { backend, store, navigator, state, in_flight: InFlightRegistry::new() }
    }

    /// Authenticate against the backend.
    ///
    /// The failure is also mirrored into the `error` field of the state.
    pub async fn login(&self, user_name: &str, password: &str) -> Result<(), SessionError> {
        let request = LoginRequest::new(user_name.trim(), password);
        if request.validate().is_err() {
            let err = SessionError::Validation { message: CREDENTIALS_REQUIRED.to_string() };
            self.state.send_modify(|s| s.error = Some(err.user_message()));
            return Err(err);
        }

        let Some(_guard) = self.in_flight.try_acquire(LOGIN_KEY) else {
            tracing::debug!("Login already in flight, ignoring");
            return Err(SessionError::InFlight { operation: "Login".to_string() });
        };

        self.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });

        let result = match self.backend.login(&request).await {
            Ok(response) => self.accept(&response),
            Err(e) => Err(session_error(e)),
        };

        match result {
            Ok(state) => {
                let user_name = state.user.as_ref().map(|u| u.user_name.clone()).unwrap_or_default();
                self.state.send_replace(state);
                tracing::info!("Logged in as {}", user_name);
                self.navigator.navigate(Route::Dashboard);
                Ok(())
            },
            Err(err) => {
                tracing::warn!("Login failed: {}", err);
                self.state.send_modify(|s| {
                    s.loading = false;
                    s.error = Some(err.user_message());
                });
                Err(err)
            },
        }
    }

    fn accept(&self, response: &LoginResponse) -> Result<SessionState, SessionError> {
        let token = response.usable_token().ok_or(SessionError::InvalidResponse)?;
        let state = state_from_token(token).ok_or(SessionError::InvalidResponse)?;

        if let Some(store) = &self.store {
            if let Err(e) = store.save(token) {
                tracing::warn!("Failed to persist token: {}", e);
            }
        }
        if let Some(expires) = response.expires_at() {
            tracing::debug!("Token expires at {}", expires);
        }
        Ok(state)
    }

    /// Forget the token and return to the login route.
    pub fn logout(&self) {
        if let Some(store) = &self.store {
            if let Err(e) = store.remove() {
                tracing::warn!("Failed to remove stored token: {}", e);
            }
        }
        self.state.send_replace(SessionState::default());
        tracing::info!("Logged out");
        self.navigator.navigate(Route::Login);
    }

    pub fn clear_error(&self) {
        self.state.send_if_modified(|s| s.error.take().is_some());
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated
    }

    pub fn auth_token(&self) -> Option<String> {
        self.state.borrow().token.clone()
    }

    pub fn user(&self) -> Option<UserInfo> {
        self.state.borrow().user.clone()
    }

    pub fn roles(&self) -> Vec<UserRole> {
        self.state.borrow().roles.clone()
    }

    pub fn loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.state.borrow().has_role(role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(UserRole::Admin.as_str())
    }

    pub fn can_create_puzzles(&self) -> bool {
        self.has_role(UserRole::PuzzleCreator.as_str())
    }

    pub fn can_manage_puzzles(&self) -> bool {
        self.has_role(UserRole::PuzzleCreator.as_str())
    }

    /// Read-only view of the state; sees every later change.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Stream of snapshots, starting with the current one.
    pub fn changes(&self) -> WatchStream<SessionState> {
        WatchStream::new(self.subscribe())
    }
}
