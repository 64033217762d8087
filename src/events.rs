//! Named event streams
//!
//! Native layers push events (auth state changes, for example) through an
//! emitter keyed by event name. The emitter is injected into the adapter as
//! an [`EventEmitter`], so tests and embedders each get their own bus instead
//! of sharing a process-wide one.
//!
//! [`LocalEventEmitter`] is the in-process implementation. Native code holds a
//! clone and calls [`LocalEventEmitter::emit`]; listeners registered through
//! [`EventEmitter::add_listener`] receive the payload.

use futures::Stream;
use std::collections::HashMap;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use uuid::Uuid;

/// Event body as delivered by the native layer
pub type EventPayload = serde_json::Value;

/// Listener callback shared between the emitter and its subscription
pub type EventCallback = Arc<dyn Fn(&EventPayload) + Send + Sync>;

/// Registration side of an event bus
pub trait EventEmitter: Send + Sync {
    /// Register `callback` for events named `name`
    ///
    /// The returned [`Subscription`] unregisters it when removed.
    fn add_listener(&self, name: &str, callback: EventCallback) -> Subscription;
}

type Remover = Box<dyn FnOnce() + Send>;

/// Handle for a registered listener
///
/// Clones refer to the same registration. Removal is idempotent.
#[derive(Clone)]
pub struct Subscription {
    inner: Arc<SubscriptionInner>,
}

struct SubscriptionInner {
    id: Uuid,
    name: String,
    remover: Mutex<Option<Remover>>,
}

impl Subscription {
    /// Build a handle that runs `remover` the first time it is removed
    ///
    /// Emitter implementations call this from `add_listener`.
    pub fn new(name: impl Into<String>, remover: impl FnOnce() + Send + 'static) -> Self {
        let remover: Remover = Box::new(remover);
        Self {
            inner: Arc::new(SubscriptionInner {
                id: Uuid::new_v4(),
                name: name.into(),
                remover: Mutex::new(Some(remover)),
            }),
        }
    }

    /// Unique id of this registration
    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    /// Event name this listener is registered for
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Whether the listener is still registered
    pub fn is_active(&self) -> bool {
        self.remover().is_some()
    }

    /// Unregister the listener
    ///
    /// Returns `true` if this call performed the removal.
    pub fn remove(&self) -> bool {
        // Take first, run after the guard is released; the remover may re-enter.
        let remover = self.remover().take();
        match remover {
            Some(remove) => {
                remove();
                tracing::debug!(event = %self.inner.name, id = %self.inner.id, "listener removed");
                true
            }
            None => false,
        }
    }

    fn remover(&self) -> MutexGuard<'_, Option<Remover>> {
        self.inner.remover.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PartialEq for Subscription {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for Subscription {}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.inner.id)
            .field("name", &self.inner.name)
            .field("active", &self.is_active())
            .finish()
    }
}

#[derive(Default)]
struct Registry {
    listeners: HashMap<String, Vec<(Uuid, EventCallback)>>,
}

/// In-process event bus
///
/// Cheap to clone; clones share the same listeners.
#[derive(Clone, Default)]
pub struct LocalEventEmitter {
    registry: Arc<Mutex<Registry>>,
}

impl LocalEventEmitter {
    /// Create an empty bus
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `payload` to every listener registered for `name`
    ///
    /// Listeners run in registration order, outside the registry lock, so a
    /// listener may add or remove listeners. Returns the number notified.
    pub fn emit(&self, name: &str, payload: &EventPayload) -> usize {
        let callbacks: Vec<EventCallback> = match lock(&self.registry).listeners.get(name) {
            Some(entries) => entries.iter().map(|(_, cb)| Arc::clone(cb)).collect(),
            None => Vec::new(),
        };

        tracing::trace!(event = name, listeners = callbacks.len(), "emitting event");
        for callback in &callbacks {
            callback(payload);
        }
        callbacks.len()
    }

    /// Number of listeners registered for `name`
    pub fn listener_count(&self, name: &str) -> usize {
        lock(&self.registry)
            .listeners
            .get(name)
            .map_or(0, Vec::len)
    }
}

impl EventEmitter for LocalEventEmitter {
    fn add_listener(&self, name: &str, callback: EventCallback) -> Subscription {
        let id = Uuid::new_v4();
        lock(&self.registry)
            .listeners
            .entry(name.to_string())
            .or_default()
            .push((id, callback));

        let registry: Weak<Mutex<Registry>> = Arc::downgrade(&self.registry);
        let key = name.to_string();
        Subscription::new(name, move || {
            let Some(registry) = registry.upgrade() else {
                return;
            };
            let mut registry = lock(&registry);
            if let Some(entries) = registry.listeners.get_mut(&key) {
                entries.retain(|(entry_id, _)| *entry_id != id);
                if entries.is_empty() {
                    registry.listeners.remove(&key);
                }
            }
        })
    }
}

fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A stream of payloads for one event name
///
/// Ends when its subscription is removed elsewhere (for example by
/// `Firestack::off`). Dropping the stream removes the subscription.
pub struct EventStream {
    receiver: UnboundedReceiverStream<EventPayload>,
    subscription: Subscription,
}

impl EventStream {
    pub(crate) fn new(receiver: mpsc::UnboundedReceiver<EventPayload>, subscription: Subscription) -> Self {
        Self {
            receiver: UnboundedReceiverStream::new(receiver),
            subscription,
        }
    }

    /// Subscription backing this stream
    pub fn subscription(&self) -> &Subscription {
        &self.subscription
    }
}

impl Stream for EventStream {
    type Item = EventPayload;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.receiver).poll_next(cx)
    }
}

impl Drop for EventStream {
    fn drop(&mut self) {
        self.subscription.remove();
    }
}
