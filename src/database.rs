//! Realtime Database server value sentinels
//!
//! A write containing one of these placeholders is rewritten by the database
//! server, e.g. with the server's timestamp at commit time.

use once_cell::sync::Lazy;
use serde_json::{json, Value};

static TIMESTAMP: Lazy<Value> = Lazy::new(|| json!({ ".sv": "timestamp" }));

/// Namespace of server value sentinels
///
/// A unit value, so the sentinels read the same whether reached through
/// [`crate::Firestack::server_value`] or the type itself.
///
/// # Example
/// ```
/// use firestack::ServerValue;
/// use serde_json::json;
///
/// let update = json!({ "lastSeen": ServerValue.timestamp() });
/// assert_eq!(update["lastSeen"][".sv"], "timestamp");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServerValue;

impl ServerValue {
    /// Key the database recognises as a server value marker
    pub const MARKER: &'static str = ".sv";

    /// Placeholder replaced by the server's current time (ms since epoch)
    pub fn timestamp(&self) -> Value {
        TIMESTAMP.clone()
    }

    /// Shared reference to the timestamp placeholder
    pub fn timestamp_ref(&self) -> &'static Value {
        &TIMESTAMP
    }

    /// Placeholder that atomically adds `delta` to the stored number
    pub fn increment(&self, delta: impl Into<serde_json::Number>) -> Value {
        json!({ ".sv": { "increment": Value::Number(delta.into()) } })
    }

    /// Whether `value` is a server value placeholder
    pub fn is_sentinel(&self, value: &Value) -> bool {
        value
            .as_object()
            .is_some_and(|map| map.len() == 1 && map.contains_key(Self::MARKER))
    }
}
