use parking_lot::Mutex;
use std::sync::{Arc, Weak};

type Callback<M> = Arc<dyn Fn(&M) + Send + Sync>;

struct Slots<M> {
    next_id: u64,
    entries: Vec<(u64, Callback<M>)>,
}

/// Removal hook a [`Subscription`] uses without knowing the message type.
trait Detach: Send + Sync {
    fn detach(&self, id: u64);
}

impl<M> Detach for Mutex<Slots<M>> {
    fn detach(&self, id: u64) {
        self.lock().entries.retain(|(entry_id, _)| *entry_id != id);
    }
}

/// Set of callbacks notified with every message of type `M`.
///
/// The lock only guards the callback list. `notify` copies the list and releases the
/// lock before invoking anything, so a callback may attach or detach subscribers.
pub struct Registry<M> {
    slots: Arc<Mutex<Slots<M>>>,
}

impl<M: 'static> Registry<M> {
    pub fn new() -> Self {
        Self {
            slots: Arc::new(Mutex::new(Slots {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }

    /// Registers `callback`; it stays attached until the returned handle is dropped.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&M) + Send + Sync + 'static,
    {
        let id = {
            let mut slots = self.slots.lock();
            let id = slots.next_id;
            slots.next_id += 1;
            let callback: Callback<M> = Arc::new(callback);
            slots.entries.push((id, callback));
            id
        };
        let slots: Weak<Mutex<Slots<M>>> = Arc::downgrade(&self.slots);
        let owner: Weak<dyn Detach> = slots;
        Subscription { id, owner }
    }

    /// Invokes every callback attached at the time of the call, in attach order.
    pub fn notify(&self, message: &M) {
        let callbacks: Vec<Callback<M>> = self
            .slots
            .lock()
            .entries
            .iter()
            .map(|(_, cb)| Arc::clone(cb))
            .collect();
        for callback in callbacks {
            callback(message);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.slots.lock().entries.len()
    }

    pub fn has_subscribers(&self) -> bool {
        self.subscriber_count() > 0
    }
}

impl<M: 'static> Default for Registry<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> std::fmt::Debug for Registry<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("subscribers", &self.slots.lock().entries.len())
            .finish()
    }
}

/// Handle for an attached callback. Dropping it detaches the callback.
#[must_use = "dropping a Subscription detaches its callback immediately"]
pub struct Subscription {
    id: u64,
    owner: Weak<dyn Detach>,
}

impl Subscription {
    /// Detaches the callback now.
    pub fn unsubscribe(self) {}

    /// True while the registry that issued this handle is alive.
    pub fn is_active(&self) -> bool {
        self.owner.strong_count() > 0
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(owner) = self.owner.upgrade() {
            owner.detach(self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
