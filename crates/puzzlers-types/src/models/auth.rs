//! Identity, role and account payload models.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use validator::{Validate, ValidationError};

use super::normalize::{first_string, first_string_list};

/// Roles the backend can grant. Anything else in a token is ignored.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum UserRole {
    #[serde(rename = "PUZZLE_CREATOR")]
    PuzzleCreator,
    #[serde(rename = "Admin")]
    Admin,
}

impl UserRole {
    /// Canonical spelling, as the backend expects it in `Register`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PuzzleCreator => "PUZZLE_CREATOR",
            Self::Admin => "Admin",
        }
    }

    /// Map a raw role string (any case, surrounding whitespace allowed).
    pub fn from_claim(raw: &str) -> Option<Self> {
        match raw.trim().to_uppercase().as_str() {
            "ADMIN" => Some(Self::Admin),
            "PUZZLE_CREATOR" => Some(Self::PuzzleCreator),
            _ => None,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_claim(s).ok_or_else(|| format!("unknown role '{s}' (expected PUZZLE_CREATOR or Admin)"))
    }
}

/// Authenticated user, reconstructed from token claims.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: String,
    pub user_name: String,
    pub email: String,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

/// Credentials for `POST /api/Account/Login`.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct LoginRequest {
    #[serde(rename = "Name")]
    #[validate(custom(function = "not_blank"))]
    pub user_name: String,
    #[serde(rename = "Password")]
    #[validate(custom(function = "not_blank"))]
    pub password: String,
}

impl LoginRequest {
    pub fn new(user_name: impl Into<String>, password: impl Into<String>) -> Self {
        Self { user_name: user_name.into(), password: password.into() }
    }
}

/// Reply of the login endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub expiration: Option<String>,
}

impl LoginResponse {
    /// Token, if the backend actually sent a non-empty one.
    pub fn usable_token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }

    /// Parsed expiration timestamp, when present and RFC 3339.
    pub fn expires_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.expiration
            .as_deref()
            .and_then(|raw| chrono::DateTime::parse_from_rfc3339(raw).ok())
            .map(|dt| dt.with_timezone(&chrono::Utc))
    }
}

/// Body for `POST /api/Account/Register`.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct RegisterRequest {
    #[serde(rename = "Name")]
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[serde(rename = "Password")]
    #[validate(custom(function = "not_blank"))]
    pub password: String,
    #[serde(rename = "Role")]
    pub role: UserRole,
}

/// One row of `GET /api/Account/GetAllUsers`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserSummary {
    pub id: String,
    pub user_name: String,
    pub roles: Vec<String>,
}

impl AdminUserSummary {
    const ID: &'static [&'static str] = &["id", "Id"];
    const USER_NAME: &'static [&'static str] = &["userName", "UserName", "name", "Name"];
    const ROLES: &'static [&'static str] = &["roles", "Roles"];

    /// Normalise a backend record. Non-object input yields `None`.
    pub fn from_backend(raw: &Value) -> Option<Self> {
        if !raw.is_object() {
            return None;
        }
        Some(Self {
            id: first_string(raw, Self::ID).unwrap_or_default(),
            user_name: first_string(raw, Self::USER_NAME).unwrap_or_default(),
            roles: first_string_list(raw, Self::ROLES),
        })
    }

    /// Normalise a whole list body; anything but an array is an empty list.
    pub fn list_from_backend(raw: &Value) -> Vec<Self> {
        raw.as_array()
            .map(|items| items.iter().filter_map(Self::from_backend).collect())
            .unwrap_or_default()
    }
}
