//! Firestack adapter
//!
//! One façade over the native Firebase module: every capability is a typed
//! method that issues the native call right away and returns a
//! [`NativeCall`] future, and named native events are managed as
//! [`Subscription`]s.

use crate::app::FirebaseSdk;
use crate::auth::types::{AuthProvider, AuthState, User};
use crate::database::ServerValue;
use crate::error::FirebaseError;
use crate::events::{EventEmitter, EventPayload, EventStream, Subscription};
use crate::native::{promisify, promisify_with, NativeCall, NativeMethod, NativeModule};
use crate::options::FirebaseOptions;
use crate::storage::UploadedFile;
use async_stream::stream;
use futures::{Stream, StreamExt};
use std::collections::HashMap;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;

/// Event name the native layer uses for auth state changes
pub const AUTH_EVENT: &str = "listenForAuth";

/// Bridge between application code and the native Firebase SDK
///
/// Holds the options the app was initialized with, the SDK app instance,
/// whether `configure` has completed, and every event subscription made
/// through [`Firestack::on`], grouped by event name.
///
/// # Example
/// ```no_run
/// # async fn example<S: firestack::FirebaseSdk>(
/// #     sdk: S,
/// #     native: std::sync::Arc<dyn firestack::NativeModule>,
/// # ) -> Result<(), firestack::FirebaseError> {
/// use firestack::{Firestack, FirebaseOptions, LocalEventEmitter};
/// use std::sync::Arc;
///
/// let emitter = LocalEventEmitter::new();
/// let firestack = Firestack::new(
///     FirebaseOptions::new("YOUR_API_KEY"),
///     sdk,
///     native,
///     Arc::new(emitter.clone()),
/// )?;
///
/// firestack.configure().await?;
/// let user = firestack.sign_in_with_email("user@example.com", "password").await?;
/// println!("Signed in: {}", user.uid);
/// # Ok(())
/// # }
/// ```
pub struct Firestack<S: FirebaseSdk> {
    options: FirebaseOptions,
    sdk: S,
    app: S::App,
    native: Arc<dyn NativeModule>,
    emitter: Arc<dyn EventEmitter>,
    configured: Arc<AtomicBool>,
    handlers: Mutex<HashMap<String, Vec<Subscription>>>,
}

impl<S: FirebaseSdk> Firestack<S> {
    /// Initialize the SDK app with `options` and wrap the native module
    ///
    /// Fails only if the SDK initializer reports an error; the options
    /// themselves are not checked.
    pub fn new(
        options: FirebaseOptions,
        sdk: S,
        native: Arc<dyn NativeModule>,
        emitter: Arc<dyn EventEmitter>,
    ) -> Result<Self, FirebaseError> {
        let app = sdk.initialize_app(&options)?;
        tracing::info!(project_id = ?options.project_id, "firebase app initialized");

        Ok(Self {
            options,
            sdk,
            app,
            native,
            emitter,
            configured: Arc::new(AtomicBool::new(false)),
            handlers: Mutex::new(HashMap::new()),
        })
    }

    /// Options the app was initialized with
    pub fn options(&self) -> &FirebaseOptions {
        &self.options
    }

    /// SDK app instance
    pub fn app(&self) -> &S::App {
        &self.app
    }

    /// Whether `configure` has completed successfully
    pub fn is_configured(&self) -> bool {
        self.configured.load(Ordering::SeqCst)
    }

    /// Run the native one-time configuration
    ///
    /// The configured flag flips when the native side reports success, even
    /// if the returned future is never awaited. Nothing else waits for it.
    pub fn configure(&self) -> NativeCall<()> {
        let configured = Arc::clone(&self.configured);
        let mark_configured: Box<dyn FnOnce(&Result<(), FirebaseError>) + Send> =
            Box::new(move |outcome| {
                if outcome.is_ok() {
                    configured.store(true, Ordering::SeqCst);
                }
            });

        promisify_with(
            NativeMethod::Configure,
            |done| self.native.configure(done),
            Some(mark_configured),
        )
    }

    // Auth

    /// Receive auth state changes
    ///
    /// Registers under [`AUTH_EVENT`] and asks the native layer to start
    /// emitting. Payloads that don't decode as [`AuthState`] are logged and
    /// skipped.
    pub fn listen_for_auth<F>(&self, callback: F) -> Subscription
    where
        F: Fn(AuthState) + Send + Sync + 'static,
    {
        let subscription = self.on(AUTH_EVENT, move |payload| match AuthState::from_payload(payload) {
            Ok(state) => callback(state),
            Err(err) => tracing::warn!(error = %err, "ignoring malformed auth event"),
        });
        self.native.listen_for_auth();
        subscription
    }

    /// Auth state changes as a stream
    ///
    /// Same as [`Firestack::listen_for_auth`]; dropping the stream removes
    /// its subscription.
    pub fn auth_state_changes(&self) -> Pin<Box<dyn Stream<Item = AuthState> + Send>> {
        let mut events = self.events(AUTH_EVENT);
        self.native.listen_for_auth();

        Box::pin(stream! {
            while let Some(payload) = events.next().await {
                match AuthState::from_payload(&payload) {
                    Ok(state) => yield state,
                    Err(err) => tracing::warn!(error = %err, "ignoring malformed auth event"),
                }
            }
        })
    }

    /// Drop every auth subscription and tell the native layer to stop
    pub fn unlisten_for_auth(&self) -> NativeCall<()> {
        self.off(AUTH_EVENT);
        promisify(NativeMethod::UnlistenForAuth, |done| {
            self.native.unlisten_for_auth(done)
        })
    }

    /// Create an email/password account
    pub fn create_user_with_email(
        &self,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> NativeCall<User> {
        promisify(NativeMethod::CreateUserWithEmail, |done| {
            self.native
                .create_user_with_email(email.into(), password.into(), done)
        })
    }

    /// Sign in with email and password
    pub fn sign_in_with_email(
        &self,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> NativeCall<User> {
        promisify(NativeMethod::SignInWithEmail, |done| {
            self.native
                .sign_in_with_email(email.into(), password.into(), done)
        })
    }

    /// Sign in with a provider token (and secret, for OAuth 1 providers)
    pub fn sign_in_with_provider(
        &self,
        provider: impl Into<AuthProvider>,
        auth_token: impl Into<String>,
        auth_secret: Option<String>,
    ) -> NativeCall<User> {
        promisify(NativeMethod::SignInWithProvider, |done| {
            self.native.sign_in_with_provider(
                provider.into(),
                auth_token.into(),
                auth_secret,
                done,
            )
        })
    }

    /// Sign out the current user
    pub fn sign_out(&self) -> NativeCall<()> {
        promisify(NativeMethod::SignOut, |done| self.native.sign_out(done))
    }

    /// Currently signed-in user, if any
    pub fn get_current_user(&self) -> NativeCall<Option<User>> {
        promisify(NativeMethod::GetCurrentUser, |done| {
            self.native.get_current_user(done)
        })
    }

    // Analytics

    /// Log an analytics event
    pub fn log_event_with_name(
        &self,
        name: impl Into<String>,
        props: serde_json::Value,
    ) -> NativeCall<serde_json::Value> {
        promisify(NativeMethod::LogEventWithName, |done| {
            self.native.log_event_with_name(name.into(), props, done)
        })
    }

    // Storage

    /// Point storage at a bucket URL (`gs://...`)
    pub fn set_storage_url(&self, url: impl Into<String>) -> NativeCall<()> {
        promisify(NativeMethod::SetStorageUrl, |done| {
            self.native.set_storage_url(url.into(), done)
        })
    }

    /// Upload a local file under `name`
    pub fn upload_file(
        &self,
        name: impl Into<String>,
        file_path: impl Into<PathBuf>,
        metadata: serde_json::Value,
    ) -> NativeCall<UploadedFile> {
        promisify(NativeMethod::UploadFile, |done| {
            self.native
                .upload_file(name.into(), file_path.into(), metadata, done)
        })
    }

    // SDK handles

    /// Fresh Realtime Database handle from the SDK
    pub fn database(&self) -> S::Database {
        self.sdk.database(&self.app)
    }

    /// Fresh Cloud Storage handle from the SDK
    pub fn storage(&self) -> S::Storage {
        self.sdk.storage(&self.app)
    }

    /// Server value sentinels for database writes
    pub fn server_value(&self) -> ServerValue {
        ServerValue
    }

    // Events

    /// Register `callback` for the named native event
    ///
    /// Handles accumulate per name; registering twice keeps both.
    pub fn on<F>(&self, name: impl Into<String>, callback: F) -> Subscription
    where
        F: Fn(&EventPayload) + Send + Sync + 'static,
    {
        let name = name.into();
        let subscription = self.emitter.add_listener(&name, Arc::new(callback));
        tracing::debug!(event = %name, id = %subscription.id(), "listener added");

        let mut handlers = self.handlers();
        let subscriptions = handlers.entry(name).or_default();
        // Handles removed elsewhere (a dropped stream, `Subscription::remove`) are pruned here.
        subscriptions.retain(Subscription::is_active);
        subscriptions.push(subscription.clone());
        subscription
    }

    /// Remove every subscription registered under `name`
    ///
    /// Other event names are left alone. Returns how many handles were
    /// dropped from the mapping.
    pub fn off(&self, name: &str) -> usize {
        let removed = self.handlers().remove(name).unwrap_or_default();
        for subscription in &removed {
            subscription.remove();
        }
        tracing::debug!(event = name, count = removed.len(), "listeners removed");
        removed.len()
    }

    /// Payloads of the named event as a stream
    ///
    /// Recorded like [`Firestack::on`], so [`Firestack::off`] ends the stream.
    pub fn events(&self, name: impl Into<String>) -> EventStream {
        let (tx, rx) = mpsc::unbounded_channel();
        let subscription = self.on(name, move |payload| {
            // Receiver gone means the stream was dropped and is unsubscribing.
            let _ = tx.send(payload.clone());
        });
        EventStream::new(rx, subscription)
    }

    /// Number of still-active subscriptions recorded under `name`
    pub fn handler_count(&self, name: &str) -> usize {
        self.handlers()
            .get(name)
            .map_or(0, |subs| subs.iter().filter(|s| s.is_active()).count())
    }

    fn handlers(&self) -> MutexGuard<'_, HashMap<String, Vec<Subscription>>> {
        self.handlers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S: FirebaseSdk> std::fmt::Debug for Firestack<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Firestack")
            .field("options", &self.options)
            .field("configured", &self.is_configured())
            .finish_non_exhaustive()
    }
}
