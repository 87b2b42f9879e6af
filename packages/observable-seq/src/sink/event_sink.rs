use super::registry::{Registry, Subscription};
use crate::change::ChangeEvent;

/// Publish-only channel for change events.
///
/// Subscribers see every event published after they attach; nothing is replayed.
#[derive(Debug, Default)]
pub struct EventSink {
    registry: Registry<ChangeEvent>,
}

impl EventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&ChangeEvent) + Send + Sync + 'static,
    {
        self.registry.subscribe(callback)
    }

    pub fn publish(&self, event: &ChangeEvent) {
        self.registry.notify(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry.subscriber_count()
    }
}
