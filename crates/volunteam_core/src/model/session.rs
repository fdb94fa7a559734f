//! Authenticated session model.
//!
//! # Invariants
//! - The access credential is opaque and never rendered by `Debug`.
//! - `UserInfo` serializes to the same JSON shape the host login flow writes
//!   under the `userInfo` store key.

use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter};

/// Store key holding the JSON-encoded [`UserInfo`].
pub const USER_INFO_KEY: &str = "userInfo";
/// Store key holding the raw access credential.
pub const ACCESS_TOKEN_KEY: &str = "accessToken";
/// Every key a session owns in the store, in write order.
pub const SESSION_KEYS: [&str; 2] = [USER_INFO_KEY, ACCESS_TOKEN_KEY];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserName {
    pub first: String,
    pub last: String,
}

/// Identity of the signed-in volunteer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub name: UserName,
}

impl UserInfo {
    pub fn new(id: impl Into<String>, first: impl Into<String>, last: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: UserName {
                first: first.into(),
                last: last.into(),
            },
        }
    }

    /// `First Last`, trimmed.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.name.first.trim(), self.name.last.trim())
            .trim()
            .to_string()
    }
}

/// Opaque bearer credential issued by the login service.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl Debug for AccessToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "AccessToken(<redacted>)")
    }
}

/// User identity plus credential, as held in memory and in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: UserInfo,
    pub access_token: AccessToken,
}

impl Session {
    pub fn new(user: UserInfo, access_token: AccessToken) -> Self {
        Self { user, access_token }
    }
}
