//! Mutation-observable sequence container.
//!
//! Provides an ordered collection that reports, for every mutation, which positions
//! were inserted, deleted or updated, so list views can patch instead of reload.

pub mod change;
pub mod config;
pub mod error;
pub mod sequence;
pub mod sink;

pub use change::{ChangeEvent, ChangeSet};
pub use config::SequenceConfig;
pub use error::SeqError;
pub use sequence::{Batch, ObservableSequence};
pub use sink::{EventSink, Snapshot, StateSink, Subscription};
