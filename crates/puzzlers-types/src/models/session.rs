//! Session state snapshot.

use serde::{Deserialize, Serialize};

use super::auth::{UserInfo, UserRole};

/// Authentication state of one client session.
///
/// `is_authenticated` holds iff `token` is non-empty and `user` is `Some`;
/// [`authenticated`](Self::authenticated) is the only constructor that sets it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub is_authenticated: bool,
    pub user: Option<UserInfo>,
    pub token: Option<String>,
    pub roles: Vec<UserRole>,
    pub loading: bool,
    pub error: Option<String>,
}

impl SessionState {
    /// Signed-in state. Returns `None` when the invariant cannot hold.
    pub fn authenticated(token: String, user: Option<UserInfo>, roles: Vec<UserRole>) -> Option<Self> {
        if token.is_empty() {
            return None;
        }
        let user = user?;
        Some(Self {
            is_authenticated: true,
            user: Some(user),
            token: Some(token),
            roles,
            loading: false,
            error: None,
        })
    }

    /// Case-insensitive role check against the canonical role names.
    pub fn has_role(&self, role: &str) -> bool {
        let want = role.trim();
        if want.is_empty() {
            return false;
        }
        self.roles.iter().any(|r| r.as_str().eq_ignore_ascii_case(want))
    }
}
