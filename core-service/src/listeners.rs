//! Host-style event listeners over the sound event bus.
//!
//! Mirrors an event-emitter API: handlers are registered per event kind and
//! removed through the [`Subscription`] returned at registration.

use core_runtime::events::{EventBus, SoundEvent, SoundEventKind};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

/// Callback invoked with each matching event.
pub type EventHandler = Arc<dyn Fn(&SoundEvent) + Send + Sync>;

#[derive(Default)]
pub(crate) struct ListenerRegistry {
    next_id: AtomicU64,
    handlers: Mutex<HashMap<u64, (SoundEventKind, EventHandler)>>,
}

impl ListenerRegistry {
    pub(crate) fn add(self: &Arc<Self>, kind: SoundEventKind, handler: EventHandler) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.handlers.lock().insert(id, (kind, handler));
        Subscription {
            id,
            kind,
            registry: Arc::downgrade(self),
        }
    }

    fn remove(&self, id: u64) -> bool {
        self.handlers.lock().remove(&id).is_some()
    }

    pub(crate) fn len(&self) -> usize {
        self.handlers.lock().len()
    }

    /// Invoke every handler registered for the event's kind.
    ///
    /// Handlers run without the registry lock held, so they may add or
    /// remove subscriptions themselves.
    fn dispatch(&self, event: &SoundEvent) {
        let kind = event.kind();
        let mut matching: Vec<(u64, EventHandler)> = self
            .handlers
            .lock()
            .iter()
            .filter(|(_, (k, _))| *k == kind)
            .map(|(id, (_, handler))| (*id, Arc::clone(handler)))
            .collect();
        matching.sort_by_key(|(id, _)| *id);

        for (id, handler) in matching {
            // An earlier handler may have removed this one.
            if !self.handlers.lock().contains_key(&id) {
                continue;
            }
            handler(event);
        }
    }
}

/// Forward bus events to registered handlers until the bus closes.
pub(crate) fn spawn_dispatcher(events: &EventBus, registry: Arc<ListenerRegistry>) {
    let mut receiver = events.subscribe();
    tokio::spawn(async move {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    debug!(event = event.name(), "Dispatching sound event");
                    registry.dispatch(&event);
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Listener dispatch fell behind, events dropped");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });
}

/// Handle to a registered listener.
#[derive(Clone)]
pub struct Subscription {
    id: u64,
    kind: SoundEventKind,
    registry: Weak<ListenerRegistry>,
}

impl Subscription {
    pub fn kind(&self) -> SoundEventKind {
        self.kind
    }

    /// Unregister the listener. Returns `false` if it was already removed.
    pub fn remove(&self) -> bool {
        self.registry
            .upgrade()
            .map(|registry| registry.remove(self.id))
            .unwrap_or(false)
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .finish()
    }
}
