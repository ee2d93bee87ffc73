//! Bearer token claim decoding.
//!
//! The token is trusted as-is: no signature or expiry check happens here.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use puzzlers_types::{UserInfo, UserRole};
use serde_json::{Map, Value};

pub type Claims = Map<String, Value>;

const ID_KEYS: &[&str] =
    &["nameid", "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/nameidentifier"];
const NAME_KEYS: &[&str] =
    &["unique_name", "name", "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/name"];
const ROLE_KEYS: &[&str] =
    &["role", "roles", "http://schemas.microsoft.com/ws/2008/06/identity/claims/role"];

/// Decode the payload segment of `token`. Any failure yields an empty map.
pub fn decode_claims(token: &str) -> Claims {
    let mut parts = token.split('.');
    let (Some(_), Some(payload)) = (parts.next(), parts.next()) else {
        return Claims::new();
    };

    let mut b64: String =
        payload.chars().map(|c| match c { '-' => '+', '_' => '/', c => c }).collect();
    while b64.len() % 4 != 0 {
        b64.push('=');
    }

    let Ok(bytes) = STANDARD.decode(b64.as_bytes()) else {
        return Claims::new();
    };
    match serde_json::from_slice(&bytes) {
        Ok(Value::Object(map)) => map,
        _ => Claims::new(),
    }
}

fn claim_string(claims: &Claims, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| match claims.get(*k)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// User identity from claims. `None` when no user name claim is present.
pub fn user_from_claims(claims: &Claims) -> Option<UserInfo> {
    let user_name = claim_string(claims, NAME_KEYS)?;
    let id = claim_string(claims, ID_KEYS).unwrap_or_default();
    let email = claim_string(claims, &["email"]).unwrap_or_else(|| format!("{user_name}@example.com"));
    Some(UserInfo { id, user_name, email })
}

/// Known roles from the first role claim present. Unknown names are dropped.
pub fn roles_from_claims(claims: &Claims) -> Vec<UserRole> {
    let Some(raw) = ROLE_KEYS
        .iter()
        .filter_map(|k| claims.get(*k))
        .find(|v| !v.is_null() && v.as_str() != Some(""))
    else {
        return Vec::new();
    };

    let names: Vec<&str> = match raw {
        Value::String(s) => vec![s.as_str()],
        Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    };

    let mut roles = Vec::new();
    for role in names.into_iter().filter_map(UserRole::from_claim) {
        if !roles.contains(&role) {
            roles.push(role);
        }
    }
    roles
}
