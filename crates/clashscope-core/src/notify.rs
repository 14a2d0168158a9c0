// ── Change notification ──
//
// Broadcast of freshly cached payloads to any number of listeners.
// Subscriptions are scoped handles: dropping one unregisters its listener.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use dashmap::DashMap;
use tokio::sync::mpsc;

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Registry<T> {
    next_id: AtomicU64,
    listeners: DashMap<u64, Listener<T>>,
}

/// Type-erased removal hook so [`Subscription`] need not be generic.
trait Detach: Send + Sync {
    fn detach(&self, id: u64);
}

impl<T: 'static> Detach for Registry<T> {
    fn detach(&self, id: u64) {
        self.listeners.remove(&id);
    }
}

/// Publish/subscribe channel for one payload type.
///
/// Listeners run synchronously on the publishing task, in no particular
/// order. Publishing with no listeners does nothing.
pub struct Notifier<T> {
    registry: Arc<Registry<T>>,
}

impl<T: 'static> Notifier<T> {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Registry {
                next_id: AtomicU64::new(0),
                listeners: DashMap::new(),
            }),
        }
    }

    /// Register `listener`. It stays registered until the returned
    /// [`Subscription`] is dropped or unsubscribed.
    #[must_use = "dropping the subscription unregisters the listener immediately"]
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed);
        self.registry.listeners.insert(id, Arc::new(listener));
        let registry: Weak<dyn Detach> = Arc::downgrade(&self.registry) as Weak<dyn Detach>;
        Subscription {
            id,
            registry: Some(registry),
        }
    }

    /// Deliver `payload` to every registered listener.
    pub fn publish(&self, payload: &T) {
        // Snapshot first so a listener may unsubscribe (or subscribe) without
        // contending with the map shard we are iterating.
        let listeners: Vec<Listener<T>> = self
            .registry
            .listeners
            .iter()
            .map(|r| Arc::clone(r.value()))
            .collect();
        for listener in listeners {
            listener(payload);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.registry.listeners.len()
    }
}

impl<T: Clone + Send + 'static> Notifier<T> {
    /// Forward every published payload into an unbounded channel.
    ///
    /// Handy for async consumers that want to `.recv().await` changes.
    #[must_use = "dropping the subscription closes the channel"]
    pub fn subscribe_channel(&self) -> (Subscription, mpsc::UnboundedReceiver<T>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let sub = self.subscribe(move |payload: &T| {
            let _ = tx.send(payload.clone());
        });
        (sub, rx)
    }
}

impl<T: 'static> Default for Notifier<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle for one registered listener.
///
/// Unsubscribing is idempotent, and dropping the handle unsubscribes. A
/// subscription that outlives its notifier is inert.
pub struct Subscription {
    id: u64,
    registry: Option<Weak<dyn Detach>>,
}

impl Subscription {
    /// Remove the listener. Calling this more than once does nothing.
    pub fn unsubscribe(&mut self) {
        if let Some(registry) = self.registry.take().and_then(|w| w.upgrade()) {
            registry.detach(self.id);
        }
    }

    /// Whether this handle still owns a registered listener.
    pub fn is_active(&self) -> bool {
        self.registry
            .as_ref()
            .is_some_and(|w| w.strong_count() > 0)
    }

    /// Give up the handle but keep the listener registered for the
    /// notifier's whole lifetime.
    pub fn detach(mut self) {
        self.registry = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
