use super::registry::{Registry, Subscription};
use arc_swap::ArcSwapOption;
use std::sync::Arc;

/// Immutable copy of a sequence's elements at one point in time.
pub type Snapshot<T> = Arc<Vec<T>>;

/// Replay-latest channel for element snapshots.
///
/// A new subscriber is called at once with the current snapshot, then with every
/// snapshot published afterwards. The sink also caches the latest snapshot so
/// repeated reads between mutations share one copy; the owner invalidates it
/// whenever the elements change.
pub struct StateSink<T> {
    latest: ArcSwapOption<Vec<T>>,
    registry: Registry<Snapshot<T>>,
}

impl<T: 'static> StateSink<T> {
    pub fn new() -> Self {
        Self {
            latest: ArcSwapOption::empty(),
            registry: Registry::new(),
        }
    }

    /// Attaches `callback` and hands it `current` before returning.
    pub fn subscribe_with<F>(&self, current: Snapshot<T>, callback: F) -> Subscription
    where
        F: Fn(&Snapshot<T>) + Send + Sync + 'static,
    {
        self.latest.store(Some(Arc::clone(&current)));
        callback(&current);
        self.registry.subscribe(callback)
    }

    /// Records `snapshot` as the latest value and pushes it to every subscriber.
    pub fn publish(&self, snapshot: Snapshot<T>) {
        self.latest.store(Some(Arc::clone(&snapshot)));
        self.registry.notify(&snapshot);
    }

    /// Caches `snapshot` as the latest value without notifying anyone.
    pub fn store(&self, snapshot: Snapshot<T>) {
        self.latest.store(Some(snapshot));
    }

    /// Drops the cached snapshot; the elements it copied are out of date.
    pub fn invalidate(&self) {
        self.latest.store(None);
    }

    /// Latest snapshot, unless it was invalidated since.
    pub fn latest(&self) -> Option<Snapshot<T>> {
        self.latest.load_full()
    }

    pub fn has_subscribers(&self) -> bool {
        self.registry.has_subscribers()
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry.subscriber_count()
    }
}

impl<T: 'static> Default for StateSink<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for StateSink<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateSink")
            .field("registry", &self.registry)
            .finish()
    }
}
