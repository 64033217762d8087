//! Cloud Storage types
//!
//! Uploads themselves run in the native SDK; this module only describes what
//! the native `uploadFile` entry point resolves with.

use crate::native::NativeValue;
use serde::{Deserialize, Serialize};

/// Result of a completed upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    /// Object name within the bucket
    #[serde(default)]
    pub name: String,

    /// Full object path
    #[serde(default)]
    pub full_path: Option<String>,

    /// Public download URL, when the platform returns one
    #[serde(default, rename = "downloadURL", alias = "downloadUrl")]
    pub download_url: Option<String>,

    /// Bucket the object was written to
    #[serde(default)]
    pub bucket: Option<String>,

    /// Size in bytes
    #[serde(default)]
    pub size: Option<u64>,

    /// MIME type recorded for the object
    #[serde(default)]
    pub content_type: Option<String>,

    /// Remaining fields the platform attached (custom metadata, generation, ...)
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl NativeValue for UploadedFile {}
