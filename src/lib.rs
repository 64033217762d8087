//! Firestack
//!
//! Future-based bridge from Rust application code to the host platform's
//! native Firebase SDK (Auth, Realtime Database, Storage, Analytics).
//!
//! Nothing here talks to Firebase directly. Each call is forwarded to an
//! injected [`NativeModule`] and comes back through a [`NativeCall`] future;
//! native events arrive through an injected [`EventEmitter`].
//!
//! # Example (Email/Password Auth)
//! ```no_run
//! # async fn example(
//! #     firestack: &firestack::Firestack<impl firestack::FirebaseSdk>,
//! # ) -> Result<(), Box<dyn std::error::Error>> {
//! let user = firestack.sign_in_with_email("user@example.com", "password").await?;
//! println!("Signed in: {}", user.uid);
//!
//! let _sub = firestack.listen_for_auth(|state| {
//!     println!("authenticated: {}", state.authenticated);
//! });
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod app;
pub mod database;
pub mod error;
pub mod events;
pub mod firestack;
pub mod logging;
pub mod native;
pub mod options;

// Auth module
pub mod auth {
    //! Firebase Authentication types

    pub mod types;

    pub use types::{AuthProvider, AuthState, User};
}

pub mod storage;

// Re-exports for convenience
pub use app::FirebaseSdk;
pub use database::ServerValue;
pub use error::{AuthError, FirebaseError, NativeError};
pub use events::{EventEmitter, EventPayload, EventStream, LocalEventEmitter, Subscription};
pub use firestack::{Firestack, AUTH_EVENT};
pub use native::{Completion, NativeCall, NativeMethod, NativeModule, NativeValue};
pub use options::FirebaseOptions;

// Auth re-exports
pub use auth::{AuthProvider, AuthState, User};

// Storage re-exports
pub use storage::UploadedFile;
