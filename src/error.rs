//! Firestack error types
//!
//! Every failure reported by the native Firebase layer surfaces as
//! [`FirebaseError::Native`], carrying the payload the native side produced
//! without modification. The remaining variants describe ways a completion
//! can go wrong on the Rust side of the bridge.
//!
//! # Design
//! Uses thiserror for ergonomic error definitions. Module-specific errors
//! convert into [`FirebaseError`] via `From`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level Firestack error type
///
/// # Example
/// ```
/// use firestack::{FirebaseError, NativeError};
///
/// let err: FirebaseError = NativeError::new("wrong-password").into();
/// assert!(err.native().is_some());
/// ```
#[derive(Debug, Error)]
pub enum FirebaseError {
    /// The native operation failed; payload is exactly what the native layer reported
    #[error("Native error: {0}")]
    Native(#[from] NativeError),

    /// The native layer dropped the completion without invoking it
    #[error("Operation cancelled")]
    Cancelled,

    /// The completion was invoked with neither an error nor a result, and
    /// the result type has no empty value (a `User`, an upload)
    #[error("Native call `{method}` completed without a result")]
    EmptyResult {
        /// Native entry point name
        method: &'static str,
    },
}

impl FirebaseError {
    /// Borrow the native payload if this is a native failure
    pub fn native(&self) -> Option<&NativeError> {
        match self {
            Self::Native(err) => Some(err),
            _ => None,
        }
    }

    /// Classify a native failure as an auth error, if its code is a known one
    pub fn auth_error(&self) -> Option<AuthError> {
        self.native().and_then(NativeError::auth_error)
    }
}

/// Error payload reported by a native entry point
///
/// Native bridges usually report an error code, a human readable message and
/// an open-ended bag of extra fields. All three are carried verbatim.
#[derive(Debug, Error, Clone, PartialEq, Serialize, Deserialize)]
#[error("{}", display_native(.code, .message))]
pub struct NativeError {
    /// Platform error code (e.g. `ERROR_WRONG_PASSWORD`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// Error description
    #[serde(default)]
    pub message: String,

    /// Any further fields the native layer attached
    #[serde(flatten)]
    pub details: serde_json::Map<String, serde_json::Value>,
}

fn display_native(code: &Option<String>, message: &str) -> String {
    match code {
        Some(code) => format!("[{}] {}", code, message),
        None => message.to_string(),
    }
}

impl NativeError {
    /// Create an error with only a message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            details: serde_json::Map::new(),
        }
    }

    /// Attach a platform error code
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Attach an extra detail field
    pub fn with_detail(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.details.insert(key.into(), value);
        self
    }

    /// Map the native code to an [`AuthError`], when it is an auth code
    pub fn auth_error(&self) -> Option<AuthError> {
        let code = self.code.as_deref()?;
        match AuthError::from_error_code(code) {
            AuthError::Unknown(_) => None,
            known => Some(known),
        }
    }
}

/// Authentication errors
///
/// Maps Firebase Auth error codes, as reported by the iOS and Android SDKs
/// and by the JS SDK, to Rust enum variants.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Email address is invalid
    #[error("Invalid email address")]
    InvalidEmail,

    /// Password is too weak
    #[error("Weak password")]
    WeakPassword,

    /// Email already in use by another account
    #[error("Email already in use")]
    EmailAlreadyInUse,

    /// User not found
    #[error("User not found")]
    UserNotFound,

    /// Wrong password
    #[error("Wrong password")]
    WrongPassword,

    /// User account has been disabled
    #[error("User account disabled")]
    UserDisabled,

    /// Too many failed login attempts
    #[error("Too many requests, try again later")]
    TooManyRequests,

    /// Operation not allowed (e.g., provider disabled)
    #[error("Operation not allowed")]
    OperationNotAllowed,

    /// Invalid credential
    #[error("Invalid credential")]
    InvalidCredential,

    /// Account exists with different credential
    #[error("Account exists with different credential")]
    AccountExistsWithDifferentCredential,

    /// Requires recent login
    #[error("This operation requires recent authentication")]
    RequiresRecentLogin,

    /// Network error
    #[error("Network request failed")]
    NetworkRequestFailed,

    /// Unrecognised code
    #[error("Unknown auth error: {0}")]
    Unknown(String),
}

impl AuthError {
    /// Create from a native or JS SDK auth error code
    ///
    /// Accepts the iOS/Android form (`ERROR_WRONG_PASSWORD`) and the JS
    /// form (`auth/wrong-password`).
    pub fn from_error_code(code: &str) -> Self {
        let normalized = code
            .trim_start_matches("auth/")
            .trim_start_matches("ERROR_")
            .replace('-', "_")
            .to_ascii_uppercase();

        match normalized.as_str() {
            "INVALID_EMAIL" => Self::InvalidEmail,
            "WEAK_PASSWORD" => Self::WeakPassword,
            "EMAIL_ALREADY_IN_USE" => Self::EmailAlreadyInUse,
            "USER_NOT_FOUND" => Self::UserNotFound,
            "WRONG_PASSWORD" => Self::WrongPassword,
            "USER_DISABLED" => Self::UserDisabled,
            "TOO_MANY_REQUESTS" => Self::TooManyRequests,
            "OPERATION_NOT_ALLOWED" => Self::OperationNotAllowed,
            "INVALID_CREDENTIAL" => Self::InvalidCredential,
            "ACCOUNT_EXISTS_WITH_DIFFERENT_CREDENTIAL" => {
                Self::AccountExistsWithDifferentCredential
            }
            "REQUIRES_RECENT_LOGIN" => Self::RequiresRecentLogin,
            "NETWORK_REQUEST_FAILED" | "NETWORK_ERROR" => Self::NetworkRequestFailed,
            _ => Self::Unknown(code.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_error_into_firebase_error() {
        let native = NativeError::new("boom").with_code("ERROR_INTERNAL");
        let err: FirebaseError = native.clone().into();

        assert_eq!(err.native(), Some(&native));
    }

    #[test]
    fn test_auth_error_from_code() {
        assert_eq!(AuthError::from_error_code("ERROR_WRONG_PASSWORD"), AuthError::WrongPassword);
        assert_eq!(AuthError::from_error_code("auth/wrong-password"), AuthError::WrongPassword);
        assert_eq!(AuthError::from_error_code("auth/network-request-failed"), AuthError::NetworkRequestFailed);
        assert_eq!(
            AuthError::from_error_code("ERROR_SOMETHING_NEW"),
            AuthError::Unknown("ERROR_SOMETHING_NEW".to_string())
        );
    }

    #[test]
    fn test_auth_error_requires_known_code() {
        let err: FirebaseError = NativeError::new("nope").with_code("auth/user-not-found").into();
        assert_eq!(err.auth_error(), Some(AuthError::UserNotFound));

        let err: FirebaseError = NativeError::new("nope").into();
        assert_eq!(err.auth_error(), None);

        let err: FirebaseError = NativeError::new("nope").with_code("storage/unknown").into();
        assert_eq!(err.auth_error(), None);
    }

    #[test]
    fn test_native_error_keeps_payload() {
        let raw = serde_json::json!({
            "code": "ERROR_USER_DISABLED",
            "message": "disabled by admin",
            "userInfo": { "NSLocalizedDescription": "disabled" }
        });
        let err: NativeError = serde_json::from_value(raw.clone()).expect("decode");

        assert_eq!(err.code.as_deref(), Some("ERROR_USER_DISABLED"));
        assert!(err.details.contains_key("userInfo"));
        assert_eq!(serde_json::to_value(&err).expect("encode"), raw);
    }

    #[test]
    fn test_error_display() {
        let err = FirebaseError::Native(NativeError::new("wrong-password").with_code("17009"));
        let display = format!("{}", err);
        assert!(display.contains("Native error"));
        assert!(display.contains("[17009] wrong-password"));

        let err = FirebaseError::EmptyResult { method: "getCurrentUser" };
        assert!(format!("{}", err).contains("getCurrentUser"));
    }
}
