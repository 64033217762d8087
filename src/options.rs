//! Firebase app options
//!
//! Options are handed to the SDK initializer as-is. Known keys get typed
//! fields; anything else is kept in `extra` so nothing is lost on the way
//! through.

use serde::{Deserialize, Serialize};
use std::env;

/// Initialization options for a Firebase app
///
/// Serialized with the SDK's camelCase key names (`apiKey`, `databaseURL`, ...).
///
/// # Example
/// ```
/// use firestack::FirebaseOptions;
///
/// let options = FirebaseOptions::new("YOUR_API_KEY")
///     .with_project_id("your-project-id")
///     .with_database_url("https://your-project-id.firebaseio.com");
/// assert_eq!(options.api_key.as_deref(), Some("YOUR_API_KEY"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirebaseOptions {
    /// Web API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Auth domain (`<project>.firebaseapp.com`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_domain: Option<String>,

    /// Realtime Database URL
    #[serde(default, rename = "databaseURL", skip_serializing_if = "Option::is_none")]
    pub database_url: Option<String>,

    /// Google Cloud project ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,

    /// Default Cloud Storage bucket
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_bucket: Option<String>,

    /// Cloud Messaging sender ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messaging_sender_id: Option<String>,

    /// Firebase app ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,

    /// Analytics measurement ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurement_id: Option<String>,

    /// Keys not modelled above
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl FirebaseOptions {
    /// Options with only an API key set
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Default::default()
        }
    }

    /// Parse options from a JSON object such as a web `firebaseConfig`
    pub fn from_json(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Read options from `FIREBASE_*` environment variables
    ///
    /// Unset or empty variables leave the field `None`. Recognised:
    /// `FIREBASE_API_KEY`, `FIREBASE_AUTH_DOMAIN`, `FIREBASE_DATABASE_URL`,
    /// `FIREBASE_PROJECT_ID`, `FIREBASE_STORAGE_BUCKET`,
    /// `FIREBASE_MESSAGING_SENDER_ID`, `FIREBASE_APP_ID`,
    /// `FIREBASE_MEASUREMENT_ID`.
    pub fn from_env() -> Self {
        Self {
            api_key: env_var("FIREBASE_API_KEY"),
            auth_domain: env_var("FIREBASE_AUTH_DOMAIN"),
            database_url: env_var("FIREBASE_DATABASE_URL"),
            project_id: env_var("FIREBASE_PROJECT_ID"),
            storage_bucket: env_var("FIREBASE_STORAGE_BUCKET"),
            messaging_sender_id: env_var("FIREBASE_MESSAGING_SENDER_ID"),
            app_id: env_var("FIREBASE_APP_ID"),
            measurement_id: env_var("FIREBASE_MEASUREMENT_ID"),
            extra: serde_json::Map::new(),
        }
    }

    /// Set the auth domain
    pub fn with_auth_domain(mut self, auth_domain: impl Into<String>) -> Self {
        self.auth_domain = Some(auth_domain.into());
        self
    }

    /// Set the Realtime Database URL
    pub fn with_database_url(mut self, database_url: impl Into<String>) -> Self {
        self.database_url = Some(database_url.into());
        self
    }

    /// Set the project ID
    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    /// Set the default storage bucket
    pub fn with_storage_bucket(mut self, storage_bucket: impl Into<String>) -> Self {
        self.storage_bucket = Some(storage_bucket.into());
        self
    }

    /// Set the app ID
    pub fn with_app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = Some(app_id.into());
        self
    }

    /// Set an arbitrary extra key
    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Options as the JSON object the SDK initializer expects
    pub fn to_json(&self) -> serde_json::Value {
        // A struct of strings and a JSON map always serializes.
        serde_json::to_value(self).unwrap_or_default()
    }
}

fn env_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.is_empty())
}
