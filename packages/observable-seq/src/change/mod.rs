//! Change values: what a caller asks for and what a mutation reports.

mod change_event;
mod change_set;

pub use change_event::ChangeEvent;
pub use change_set::ChangeSet;
