//! Firebase SDK client seam
//!
//! The JS/native SDK client library owns app initialization and hands out
//! database and storage handles. [`FirebaseSdk`] describes that surface so the
//! adapter can be built against the platform SDK or a test double.

use crate::error::NativeError;
use crate::options::FirebaseOptions;

/// SDK client library used by the adapter
///
/// Handle types are whatever the SDK uses; the adapter never inspects them.
pub trait FirebaseSdk: Send + Sync {
    /// Initialized application instance
    type App: Send + Sync;

    /// Realtime Database handle
    type Database;

    /// Cloud Storage handle
    type Storage;

    /// Initialize an application from options, passed through unchanged
    fn initialize_app(&self, options: &FirebaseOptions) -> Result<Self::App, NativeError>;

    /// Obtain a database handle for `app`
    fn database(&self, app: &Self::App) -> Self::Database;

    /// Obtain a storage handle for `app`
    fn storage(&self, app: &Self::App) -> Self::Storage;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSdk {
        handles: AtomicUsize,
    }

    impl FirebaseSdk for CountingSdk {
        type App = String;
        type Database = usize;
        type Storage = usize;

        fn initialize_app(&self, options: &FirebaseOptions) -> Result<String, NativeError> {
            match &options.project_id {
                Some(project) => Ok(project.clone()),
                None => Err(NativeError::new("missing project").with_code("app/no-options")),
            }
        }

        fn database(&self, _app: &String) -> usize {
            self.handles.fetch_add(1, Ordering::SeqCst)
        }

        fn storage(&self, _app: &String) -> usize {
            self.handles.fetch_add(1, Ordering::SeqCst)
        }
    }

    #[test]
    fn test_sdk_errors_pass_through() {
        let sdk = CountingSdk { handles: AtomicUsize::new(0) };
        let err = sdk
            .initialize_app(&FirebaseOptions::default())
            .expect_err("no project");
        assert_eq!(err.code.as_deref(), Some("app/no-options"));
    }

    #[test]
    fn test_handles_are_fresh() {
        let sdk = CountingSdk { handles: AtomicUsize::new(0) };
        let app = sdk
            .initialize_app(&FirebaseOptions::default().with_project_id("demo"))
            .expect("init");
        assert_eq!(app, "demo");
        assert_ne!(sdk.database(&app), sdk.database(&app));
        assert_eq!(sdk.storage(&app), 2);
    }
}
