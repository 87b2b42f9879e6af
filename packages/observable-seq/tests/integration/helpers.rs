//! Shared test fixtures.

use std::sync::Arc;

use observable_seq::{ChangeEvent, ObservableSequence, Snapshot, Subscription};
use parking_lot::Mutex;

/// Records every event a sequence emits while the subscription lives.
pub struct EventLog {
    pub events: Arc<Mutex<Vec<ChangeEvent>>>,
    _sub: Subscription,
}

impl EventLog {
    pub fn attach<T: 'static>(seq: &ObservableSequence<T>) -> Self {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sub = {
            let events = Arc::clone(&events);
            seq.subscribe_events(move |e| events.lock().push(e.clone()))
        };
        Self { events, _sub: sub }
    }

    pub fn take(&self) -> Vec<ChangeEvent> {
        std::mem::take(&mut *self.events.lock())
    }
}

/// A list view that patches its rows from change events, the way an incremental
/// renderer would: deletions by old index, insertions by new index, then reloads of
/// the updated rows at their new positions, taking row contents from the latest
/// element snapshot.
pub struct ListView<T> {
    pub rows: Arc<Mutex<Vec<T>>>,
    _state: Subscription,
    _events: Subscription,
}

impl<T: Clone + Send + Sync + 'static> ListView<T> {
    pub fn attach(seq: &ObservableSequence<T>) -> Self {
        let latest: Arc<Mutex<Option<Snapshot<T>>>> = Arc::new(Mutex::new(None));
        let rows = Arc::new(Mutex::new(Vec::new()));

        let state = {
            let latest = Arc::clone(&latest);
            let rows = Arc::clone(&rows);
            let first_seen = Mutex::new(true);
            seq.subscribe_elements(move |snapshot: &Snapshot<T>| {
                let mut initial = first_seen.lock();
                if *initial {
                    *rows.lock() = snapshot.to_vec();
                    *initial = false;
                }
                *latest.lock() = Some(Arc::clone(snapshot));
            })
        };

        let events = {
            let latest = Arc::clone(&latest);
            let rows = Arc::clone(&rows);
            seq.subscribe_events(move |event| {
                let latest = latest.lock();
                let Some(snapshot) = latest.as_ref() else {
                    return;
                };
                let mut rows = rows.lock();
                let mut deleted = event.deleted_indexes().to_vec();
                deleted.sort_unstable_by(|a, b| b.cmp(a));
                for index in deleted {
                    rows.remove(index);
                }
                let mut inserted = event.inserted_indexes().to_vec();
                inserted.sort_unstable();
                for index in inserted {
                    rows.insert(index, snapshot[index].clone());
                }
                for index in event.updated_indexes_after() {
                    rows[index] = snapshot[index].clone();
                }
            })
        };

        Self {
            rows,
            _state: state,
            _events: events,
        }
    }

    pub fn rows(&self) -> Vec<T> {
        self.rows.lock().clone()
    }
}
