//! Completion-to-future adapter
//!
//! A native entry point finishes by invoking a [`Completion`] from whatever
//! thread the platform chooses. The caller holds the matching [`NativeCall`]
//! future, which resolves once the completion fires.

use crate::error::{FirebaseError, NativeError};
use crate::native::NativeMethod;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

type SettleHook<T> = Box<dyn FnOnce(&Result<T, FirebaseError>) + Send>;

/// Result type a native entry point delivers
///
/// [`NativeValue::absent`] is what a completion settled with neither an
/// error nor a result resolves to. Types without an empty value keep the
/// default `None`, which turns such a completion into
/// [`FirebaseError::EmptyResult`].
pub trait NativeValue: Sized {
    /// Value standing in for a missing result
    fn absent() -> Option<Self> {
        None
    }
}

impl NativeValue for () {
    fn absent() -> Option<Self> {
        Some(())
    }
}

impl<U> NativeValue for Option<U> {
    fn absent() -> Option<Self> {
        Some(None)
    }
}

impl NativeValue for serde_json::Value {
    fn absent() -> Option<Self> {
        Some(serde_json::Value::Null)
    }
}

/// One-shot completion handed to a native entry point
///
/// Mirrors the two-argument `(error, result)` callback of native bridges:
/// an error always wins; otherwise the result is delivered. Dropping a
/// completion without invoking it fails the pending call with
/// [`FirebaseError::Cancelled`].
pub struct Completion<T> {
    method: NativeMethod,
    tx: oneshot::Sender<Result<T, FirebaseError>>,
    on_settle: Option<SettleHook<T>>,
}

impl<T> Completion<T> {
    /// Native entry point this completion belongs to
    pub fn method(&self) -> NativeMethod {
        self.method
    }

    /// Resolve with a value
    pub fn resolve(self, value: T) {
        self.settle(Ok(value));
    }

    /// Reject with a native error
    pub fn reject(self, error: NativeError) {
        self.settle(Err(FirebaseError::Native(error)));
    }

    /// Settle from a `Result`
    pub fn finish(self, result: Result<T, NativeError>) {
        self.settle(result.map_err(FirebaseError::Native));
    }

    fn settle(mut self, outcome: Result<T, FirebaseError>) {
        match &outcome {
            Ok(_) => tracing::trace!(method = self.method.as_str(), "native call resolved"),
            Err(err) => tracing::warn!(method = self.method.as_str(), error = %err, "native call rejected"),
        }

        if let Some(hook) = self.on_settle.take() {
            hook(&outcome);
        }

        // Receiver gone means the caller stopped waiting; the result is discarded.
        let _ = self.tx.send(outcome);
    }
}

impl<T: NativeValue> Completion<T> {
    /// Settle with the two-argument callback convention
    ///
    /// `error` present rejects regardless of `result`. No error and no
    /// result resolves with [`NativeValue::absent`] (`()`, `None`, `null`);
    /// result types with no empty value fail with
    /// [`FirebaseError::EmptyResult`].
    pub fn call(self, error: Option<NativeError>, result: Option<T>) {
        let outcome = match (error, result.or_else(T::absent)) {
            (Some(err), _) => Err(FirebaseError::Native(err)),
            (None, Some(value)) => Ok(value),
            (None, None) => Err(FirebaseError::EmptyResult {
                method: self.method.as_str(),
            }),
        };
        self.settle(outcome);
    }
}

impl<T> std::fmt::Debug for Completion<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Completion")
            .field("method", &self.method)
            .finish()
    }
}

/// Future for the outcome of a native call
///
/// The native entry point has already been invoked by the time this value
/// exists; awaiting only waits for the completion. Dropping it does not
/// cancel the native operation.
#[must_use = "the native call has been issued; await the result or drop it explicitly"]
pub struct NativeCall<T> {
    method: NativeMethod,
    rx: oneshot::Receiver<Result<T, FirebaseError>>,
}

impl<T> NativeCall<T> {
    /// Native entry point backing this call
    pub fn method(&self) -> NativeMethod {
        self.method
    }
}

impl<T> Future for NativeCall<T> {
    type Output = Result<T, FirebaseError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Ok(outcome)) => Poll::Ready(outcome),
            Poll::Ready(Err(_)) => Poll::Ready(Err(FirebaseError::Cancelled)),
        }
    }
}

/// Issue a native call and return its future
///
/// `invoke` runs immediately with the completion the native side must settle.
pub(crate) fn promisify<T, F>(method: NativeMethod, invoke: F) -> NativeCall<T>
where
    F: FnOnce(Completion<T>),
{
    promisify_with(method, invoke, None)
}

/// Like [`promisify`], with a hook that observes the outcome at settle time
pub(crate) fn promisify_with<T, F>(
    method: NativeMethod,
    invoke: F,
    on_settle: Option<SettleHook<T>>,
) -> NativeCall<T>
where
    F: FnOnce(Completion<T>),
{
    let (tx, rx) = oneshot::channel();
    tracing::debug!(method = method.as_str(), "issuing native call");

    invoke(Completion {
        method,
        tx,
        on_settle,
    });

    NativeCall { method, rx }
}
