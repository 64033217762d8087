//! Fake native module and SDK shared by the integration tests

#![allow(dead_code)]

use firestack::{
    AuthProvider, Completion, FirebaseOptions, FirebaseSdk, NativeError, NativeMethod,
    NativeModule, NativeValue, UploadedFile, User,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

/// How the fake settles a call
#[derive(Debug, Clone)]
pub enum Reply {
    /// Resolve with this JSON, decoded into the call's result type
    Value(Value),
    /// Reject with this error
    Error(NativeError),
    /// Keep the completion until `release` is called
    Hold,
    /// Drop the completion without settling it
    Drop,
    /// Settle with neither an error nor a result
    Empty,
}

/// One recorded native invocation
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: NativeMethod,
    pub args: Vec<Value>,
}

type Held = Box<dyn FnOnce(Option<NativeError>, Option<Value>) + Send>;

/// Scriptable stand-in for the platform module
///
/// Unscripted methods resolve with `null`.
#[derive(Default)]
pub struct FakeNative {
    calls: Mutex<Vec<RecordedCall>>,
    replies: Mutex<HashMap<NativeMethod, Reply>>,
    held: Mutex<Vec<(NativeMethod, Held)>>,
    listening: AtomicBool,
}

impl FakeNative {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&self, method: NativeMethod, reply: Reply) {
        self.replies.lock().unwrap().insert(method, reply);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_call(&self) -> Option<RecordedCall> {
        self.calls.lock().unwrap().last().cloned()
    }

    pub fn is_listening(&self) -> bool {
        self.listening.load(Ordering::SeqCst)
    }

    /// Settle the oldest held completion for `method`
    pub fn release(&self, method: NativeMethod, error: Option<NativeError>, result: Option<Value>) {
        let held = {
            let mut held = self.held.lock().unwrap();
            let index = held
                .iter()
                .position(|(m, _)| *m == method)
                .expect("no held completion for method");
            held.remove(index).1
        };
        held(error, result);
    }

    fn respond<T>(&self, method: NativeMethod, args: Vec<Value>, done: Completion<T>)
    where
        T: DeserializeOwned + NativeValue + Send + 'static,
    {
        assert_eq!(done.method(), method);
        self.calls.lock().unwrap().push(RecordedCall { method, args });

        let reply = self
            .replies
            .lock()
            .unwrap()
            .get(&method)
            .cloned()
            .unwrap_or(Reply::Value(Value::Null));

        match reply {
            Reply::Value(value) => settle(done, None, Some(value)),
            Reply::Error(err) => settle(done, Some(err), None),
            Reply::Hold => self.held.lock().unwrap().push((
                method,
                Box::new(move |err: Option<NativeError>, value: Option<Value>| {
                    settle(done, err, value)
                }),
            )),
            Reply::Drop => drop(done),
            Reply::Empty => done.call(None, None),
        }
    }
}

fn settle<T: DeserializeOwned + NativeValue>(done: Completion<T>, error: Option<NativeError>, value: Option<Value>) {
    let result = match value.map(serde_json::from_value::<T>) {
        Some(Ok(decoded)) => Some(decoded),
        Some(Err(err)) => return done.reject(NativeError::new(err.to_string()).with_code("fake/decode")),
        None => None,
    };
    done.call(error, result);
}

impl NativeModule for FakeNative {
    fn configure(&self, done: Completion<()>) {
        self.respond(NativeMethod::Configure, vec![], done);
    }

    fn listen_for_auth(&self) {
        self.listening.store(true, Ordering::SeqCst);
        self.calls.lock().unwrap().push(RecordedCall {
            method: NativeMethod::ListenForAuth,
            args: vec![],
        });
    }

    fn unlisten_for_auth(&self, done: Completion<()>) {
        self.listening.store(false, Ordering::SeqCst);
        self.respond(NativeMethod::UnlistenForAuth, vec![], done);
    }

    fn create_user_with_email(&self, email: String, password: String, done: Completion<User>) {
        self.respond(
            NativeMethod::CreateUserWithEmail,
            vec![json!(email), json!(password)],
            done,
        );
    }

    fn sign_in_with_email(&self, email: String, password: String, done: Completion<User>) {
        self.respond(
            NativeMethod::SignInWithEmail,
            vec![json!(email), json!(password)],
            done,
        );
    }

    fn sign_in_with_provider(
        &self,
        provider: AuthProvider,
        auth_token: String,
        auth_secret: Option<String>,
        done: Completion<User>,
    ) {
        self.respond(
            NativeMethod::SignInWithProvider,
            vec![json!(provider.as_str()), json!(auth_token), json!(auth_secret)],
            done,
        );
    }

    fn sign_out(&self, done: Completion<()>) {
        self.respond(NativeMethod::SignOut, vec![], done);
    }

    fn get_current_user(&self, done: Completion<Option<User>>) {
        self.respond(NativeMethod::GetCurrentUser, vec![], done);
    }

    fn log_event_with_name(&self, name: String, props: Value, done: Completion<Value>) {
        self.respond(NativeMethod::LogEventWithName, vec![json!(name), props], done);
    }

    fn set_storage_url(&self, url: String, done: Completion<()>) {
        self.respond(NativeMethod::SetStorageUrl, vec![json!(url)], done);
    }

    fn upload_file(
        &self,
        name: String,
        file_path: PathBuf,
        metadata: Value,
        done: Completion<UploadedFile>,
    ) {
        self.respond(
            NativeMethod::UploadFile,
            vec![json!(name), json!(file_path.to_string_lossy()), metadata],
            done,
        );
    }
}

/// SDK double: the app is the options it was given, handles are counters
#[derive(Default)]
pub struct FakeSdk {
    next_handle: AtomicU64,
    fail_with: Option<NativeError>,
}

impl FakeSdk {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(error: NativeError) -> Self {
        Self {
            next_handle: AtomicU64::new(0),
            fail_with: Some(error),
        }
    }
}

impl FirebaseSdk for FakeSdk {
    type App = FirebaseOptions;
    type Database = u64;
    type Storage = (Option<String>, u64);

    fn initialize_app(&self, options: &FirebaseOptions) -> Result<FirebaseOptions, NativeError> {
        match &self.fail_with {
            Some(err) => Err(err.clone()),
            None => Ok(options.clone()),
        }
    }

    fn database(&self, _app: &FirebaseOptions) -> u64 {
        self.next_handle.fetch_add(1, Ordering::SeqCst)
    }

    fn storage(&self, app: &FirebaseOptions) -> (Option<String>, u64) {
        (
            app.storage_bucket.clone(),
            self.next_handle.fetch_add(1, Ordering::SeqCst),
        )
    }
}
