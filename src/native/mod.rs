//! Native module bridge
//!
//! The host platform's Firebase SDK is reached through a [`NativeModule`]:
//! one typed method per capability, each finishing through a [`Completion`].
//! Implementations live outside this crate (an FFI layer, a JNI binding, or a
//! fake in tests).
//!
//! Entry point names follow the native module's exported names
//! (`createUserWithEmail`, `logEventWithName`, ...) so logs line up with the
//! platform side.

mod call;

pub use call::{Completion, NativeCall, NativeValue};
pub(crate) use call::{promisify, promisify_with};

use crate::auth::types::{AuthProvider, User};
use crate::storage::UploadedFile;
use std::fmt;
use std::path::PathBuf;

/// Native entry points known to the bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeMethod {
    /// One-time platform configuration
    Configure,
    /// Start emitting auth state events
    ListenForAuth,
    /// Stop emitting auth state events
    UnlistenForAuth,
    /// Create an email/password account
    CreateUserWithEmail,
    /// Sign in with email/password
    SignInWithEmail,
    /// Sign in with a third-party provider token
    SignInWithProvider,
    /// Sign out the current user
    SignOut,
    /// Fetch the current user
    GetCurrentUser,
    /// Log an analytics event
    LogEventWithName,
    /// Point storage at a bucket URL
    SetStorageUrl,
    /// Upload a local file to storage
    UploadFile,
}

impl NativeMethod {
    /// Every entry point, in declaration order
    pub const ALL: [NativeMethod; 11] = [
        NativeMethod::Configure,
        NativeMethod::ListenForAuth,
        NativeMethod::UnlistenForAuth,
        NativeMethod::CreateUserWithEmail,
        NativeMethod::SignInWithEmail,
        NativeMethod::SignInWithProvider,
        NativeMethod::SignOut,
        NativeMethod::GetCurrentUser,
        NativeMethod::LogEventWithName,
        NativeMethod::SetStorageUrl,
        NativeMethod::UploadFile,
    ];

    /// Name exported by the native module
    pub fn as_str(&self) -> &'static str {
        match self {
            NativeMethod::Configure => "configure",
            NativeMethod::ListenForAuth => "listenForAuth",
            NativeMethod::UnlistenForAuth => "unlistenForAuth",
            NativeMethod::CreateUserWithEmail => "createUserWithEmail",
            NativeMethod::SignInWithEmail => "signInWithEmail",
            NativeMethod::SignInWithProvider => "signInWithProvider",
            NativeMethod::SignOut => "signOut",
            NativeMethod::GetCurrentUser => "getCurrentUser",
            NativeMethod::LogEventWithName => "logEventWithName",
            NativeMethod::SetStorageUrl => "setStorageUrl",
            NativeMethod::UploadFile => "uploadFile",
        }
    }
}

impl fmt::Display for NativeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handle to the platform's native Firebase module
///
/// Every method receives its arguments unchanged and must eventually settle
/// the completion, from any thread. `listen_for_auth` is the exception: it
/// only switches on the `listenForAuth` event and takes no completion.
pub trait NativeModule: Send + Sync {
    /// `configure`
    fn configure(&self, done: Completion<()>);

    /// `listenForAuth`
    fn listen_for_auth(&self);

    /// `unlistenForAuth`
    fn unlisten_for_auth(&self, done: Completion<()>);

    /// `createUserWithEmail`
    fn create_user_with_email(&self, email: String, password: String, done: Completion<User>);

    /// `signInWithEmail`
    fn sign_in_with_email(&self, email: String, password: String, done: Completion<User>);

    /// `signInWithProvider`
    fn sign_in_with_provider(
        &self,
        provider: AuthProvider,
        auth_token: String,
        auth_secret: Option<String>,
        done: Completion<User>,
    );

    /// `signOut`
    fn sign_out(&self, done: Completion<()>);

    /// `getCurrentUser`
    fn get_current_user(&self, done: Completion<Option<User>>);

    /// `logEventWithName`
    fn log_event_with_name(
        &self,
        name: String,
        props: serde_json::Value,
        done: Completion<serde_json::Value>,
    );

    /// `setStorageUrl`
    fn set_storage_url(&self, url: String, done: Completion<()>);

    /// `uploadFile`
    fn upload_file(
        &self,
        name: String,
        file_path: PathBuf,
        metadata: serde_json::Value,
        done: Completion<UploadedFile>,
    );
}
