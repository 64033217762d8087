//! Authentication types
//!
//! Shapes of the values native auth entry points resolve with and of the
//! payloads carried by `listenForAuth` events.

use crate::native::NativeValue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Firebase user account as reported by the native SDK
///
/// Field names follow the native payload (camelCase). Missing optional fields
/// default to `None`/`false`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique Firebase user ID
    pub uid: String,

    /// Email address (if available)
    #[serde(default)]
    pub email: Option<String>,

    /// Display name (if available)
    #[serde(default)]
    pub display_name: Option<String>,

    /// Photo URL (if available)
    #[serde(default, rename = "photoURL", alias = "photoUrl")]
    pub photo_url: Option<String>,

    /// Provider ID (e.g., "password", "facebook.com")
    #[serde(default)]
    pub provider_id: Option<String>,

    /// Whether the email address has been verified
    #[serde(default)]
    pub email_verified: bool,

    /// Whether this is an anonymous account
    #[serde(default)]
    pub is_anonymous: bool,

    /// Refresh token issued to the native SDK
    #[serde(default)]
    pub refresh_token: Option<String>,

    /// Account creation time, Unix milliseconds
    #[serde(default)]
    pub creation_timestamp: Option<i64>,

    /// Last sign-in time, Unix milliseconds
    #[serde(default)]
    pub last_sign_in_timestamp: Option<i64>,
}

// A sign-in that reports no user is a failure, not an empty success.
impl NativeValue for User {}

impl User {
    /// Minimal user with only a uid
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            email: None,
            display_name: None,
            photo_url: None,
            provider_id: None,
            email_verified: false,
            is_anonymous: false,
            refresh_token: None,
            creation_timestamp: None,
            last_sign_in_timestamp: None,
        }
    }

    /// Account creation time
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.creation_timestamp.and_then(DateTime::<Utc>::from_timestamp_millis)
    }

    /// Last sign-in time
    pub fn last_signed_in_at(&self) -> Option<DateTime<Utc>> {
        self.last_sign_in_timestamp.and_then(DateTime::<Utc>::from_timestamp_millis)
    }
}

/// Payload of a `listenForAuth` event
///
/// `user` is present while someone is signed in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    /// Whether a user is signed in
    pub authenticated: bool,

    /// The signed-in user
    #[serde(default)]
    pub user: Option<User>,
}

impl AuthState {
    /// Decode an event payload
    pub fn from_payload(payload: &serde_json::Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(payload)
    }
}

/// Identity provider for `signInWithProvider`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AuthProvider {
    /// facebook
    Facebook,
    /// twitter
    Twitter,
    /// google
    Google,
    /// github
    GitHub,
    /// Any other provider id understood by the native module
    Other(String),
}

impl AuthProvider {
    /// Provider name passed to the native module
    pub fn as_str(&self) -> &str {
        match self {
            AuthProvider::Facebook => "facebook",
            AuthProvider::Twitter => "twitter",
            AuthProvider::Google => "google",
            AuthProvider::GitHub => "github",
            AuthProvider::Other(name) => name,
        }
    }
}

impl From<&str> for AuthProvider {
    fn from(name: &str) -> Self {
        match name {
            "facebook" => AuthProvider::Facebook,
            "twitter" => AuthProvider::Twitter,
            "google" => AuthProvider::Google,
            "github" => AuthProvider::GitHub,
            other => AuthProvider::Other(other.to_string()),
        }
    }
}

impl fmt::Display for AuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
