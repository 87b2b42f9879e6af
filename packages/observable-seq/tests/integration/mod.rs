//! Integration test suite.
//!
//! - `scenarios`: worked examples of single mutations and batches
//! - `properties`: proptest checks against a reference model and a list-view consumer
//! - `delivery`: subscriber semantics of the event and state sinks

pub mod helpers;
pub mod properties;
