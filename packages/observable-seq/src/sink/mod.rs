//! Push-based delivery of change events and element snapshots.
//!
//! Each sequence owns one [`EventSink`] and one [`StateSink`]. Both are plain
//! observer registries: callbacks run inline on the mutating thread, and a sink
//! with no subscribers drops what it is given.

mod event_sink;
mod registry;
mod state_sink;

pub use event_sink::EventSink;
pub use registry::{Registry, Subscription};
pub use state_sink::{Snapshot, StateSink};
