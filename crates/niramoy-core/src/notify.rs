//! In-process change notification.
//!
//! Any component can emit a payload-free "data changed" signal after a
//! successful mutation; views hold a [`Subscription`] and re-fetch when one
//! arrives. Subscriptions unregister themselves on drop. Nothing here is
//! persisted or durable.

use std::collections::HashMap;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};

/// Registry of change-notification subscribers.
pub struct ChangeBus {
    inner: Mutex<BusInner>,
}

struct BusInner {
    next_id: u64,
    subscribers: HashMap<u64, Sender<()>>,
}

impl ChangeBus {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(BusInner {
                next_id: 0,
                subscribers: HashMap::new(),
            }),
        })
    }

    /// Register a new subscriber.
    pub fn subscribe(self: &Arc<Self>) -> Subscription {
        let (tx, rx) = channel();
        let mut inner = self.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.subscribers.insert(id, tx);
        Subscription {
            id,
            bus: Arc::clone(self),
            receiver: rx,
        }
    }

    /// Broadcast a change to all live subscribers.
    pub fn notify(&self) {
        let mut inner = self.lock();
        inner.subscribers.retain(|_, tx| tx.send(()).is_ok());
    }

    /// Number of registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }

    fn unsubscribe(&self, id: u64) {
        self.lock().subscribers.remove(&id);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BusInner> {
        // A poisoned registry is still structurally sound
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// A live change subscription; dropping it unregisters the subscriber.
pub struct Subscription {
    id: u64,
    bus: Arc<ChangeBus>,
    receiver: Receiver<()>,
}

impl Subscription {
    /// Drain pending notifications; true if any arrived since the last poll.
    pub fn changed(&self) -> bool {
        let mut changed = false;
        while self.receiver.try_recv().is_ok() {
            changed = true;
        }
        changed
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.bus.unsubscribe(self.id);
    }
}
