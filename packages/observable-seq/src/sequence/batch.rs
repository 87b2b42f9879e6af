//! Batched multi-change application.
//!
//! A [`Batch`] carries updates, deletions and insertions all indexed against the
//! sequence as it is before the batch runs. Application order is update, delete,
//! add; the result is reported as a single [`ChangeEvent`].

use super::ObservableSequence;
use crate::change::{ChangeEvent, ChangeSet};
use crate::error::SeqError;
use std::collections::HashSet;

/// Updates, deletions and insertions to apply in one step.
///
/// Every index refers to the sequence before any part of the batch is applied.
/// Add targets mean "insert before this position"; a target equal to the current
/// length appends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch<T> {
    updated: Option<ChangeSet<T>>,
    deleted: Option<ChangeSet<T>>,
    added: Option<ChangeSet<T>>,
}

impl<T> Batch<T> {
    pub fn new() -> Self {
        Self {
            updated: None,
            deleted: None,
            added: None,
        }
    }

    pub fn from_parts(
        updated: Option<ChangeSet<T>>,
        deleted: Option<ChangeSet<T>>,
        added: Option<ChangeSet<T>>,
    ) -> Self {
        Self {
            updated,
            deleted,
            added,
        }
    }

    /// Replaces elements in place; needs one element per index.
    pub fn update(mut self, set: ChangeSet<T>) -> Self {
        self.updated = Some(set);
        self
    }

    /// Removes positions. Elements carried by `set` are ignored.
    pub fn delete(mut self, set: ChangeSet<T>) -> Self {
        self.deleted = Some(set);
        self
    }

    /// Inserts elements, either one per target index or as a block built with
    /// [`ChangeSet::at`].
    pub fn add(mut self, set: ChangeSet<T>) -> Self {
        self.added = Some(set);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.updated.is_none() && self.deleted.is_none() && self.added.is_none()
    }

    /// Checks the batch against a sequence of `len` elements.
    ///
    /// Rejects out-of-range or repeated update/delete positions, positions that are
    /// both updated and deleted, add targets past `len`, and element counts that
    /// don't match their indexes.
    pub fn validate(&self, len: usize) -> Result<(), SeqError> {
        let mut updated_positions = HashSet::new();
        if let Some(updated) = &self.updated {
            if updated.elements().len() != updated.len() {
                return Err(SeqError::InvalidArgument(format!(
                    "update has {} indexes but {} elements",
                    updated.len(),
                    updated.elements().len()
                )));
            }
            updated_positions = unique_positions("update", updated.indexes(), len)?;
        }

        if let Some(deleted) = &self.deleted {
            let deleted_positions = unique_positions("delete", deleted.indexes(), len)?;
            if let Some(index) = deleted_positions
                .iter()
                .find(|index| updated_positions.contains(index))
            {
                return Err(SeqError::InvalidArgument(format!(
                    "position {} is both updated and deleted",
                    index
                )));
            }
        }

        if let Some(added) = &self.added {
            if added.elements().is_empty() {
                return Err(SeqError::invalid("add requires elements"));
            }
            if !added.is_block() && added.elements().len() != added.len() {
                return Err(SeqError::InvalidArgument(format!(
                    "add has {} indexes but {} elements",
                    added.len(),
                    added.elements().len()
                )));
            }
            if let Some(index) = added.indexes().iter().find(|&&index| index > len) {
                return Err(SeqError::InvalidArgument(format!(
                    "add target {} past end (len: {})",
                    index, len
                )));
            }
        }

        Ok(())
    }

    /// Applies the batch to `elements`, returning the event describing it.
    ///
    /// Must only be called after `validate` succeeded for `elements.len()`.
    fn apply_to(self, elements: &mut Vec<T>) -> Option<ChangeEvent> {
        let Batch {
            updated,
            deleted,
            added,
        } = self;

        let mut updated_indexes = Vec::new();
        if let Some(set) = updated {
            let (indexes, values) = set.into_parts();
            for (&index, value) in indexes.iter().zip(values) {
                elements[index] = value;
            }
            updated_indexes = indexes;
        }

        let (targets, additions, block) = match added {
            Some(set) => {
                let block = set.is_block();
                let (indexes, values) = set.into_parts();
                (indexes, values, block)
            }
            None => (Vec::new(), Vec::new(), false),
        };
        // Add targets tracked in the shrinking post-deletion index space.
        let mut shifted = targets.clone();

        let mut deleted_indexes = Vec::new();
        if let Some(set) = deleted {
            let (indexes, _) = set.into_parts();
            let mut descending = indexes.clone();
            descending.sort_unstable_by(|a, b| b.cmp(a));
            for &index in &descending {
                elements.remove(index);
                for target in shifted.iter_mut().filter(|target| **target > index) {
                    *target -= 1;
                }
            }
            deleted_indexes = indexes;
        }

        let mut inserted_indexes = Vec::with_capacity(additions.len());
        if block {
            let start = shifted[0];
            let count = additions.len();
            elements.splice(start..start, additions);
            inserted_indexes.extend(start..start + count);
        } else if !additions.is_empty() {
            let mut pending: Vec<(usize, usize, T)> = shifted
                .into_iter()
                .zip(targets)
                .zip(additions)
                .map(|((shifted, original), value)| (shifted, original, value))
                .collect();
            // Stable: equal targets keep their supplied order.
            pending.sort_by_key(|(shifted, original, _)| (*shifted, *original));

            // Every earlier insertion sits at or before the current target, so the
            // k-th insertion lands k places further right.
            for (offset, (target, _, value)) in pending.into_iter().enumerate() {
                let position = target + offset;
                if position < elements.len() {
                    elements.insert(position, value);
                    inserted_indexes.push(position);
                } else {
                    inserted_indexes.push(elements.len());
                    elements.push(value);
                }
            }
        }

        if updated_indexes.len() + deleted_indexes.len() + inserted_indexes.len() == 0 {
            return None;
        }
        tracing::debug!(
            updated = updated_indexes.len(),
            deleted = deleted_indexes.len(),
            inserted = inserted_indexes.len(),
            len = elements.len(),
            "Applied batch"
        );
        Some(ChangeEvent::from_positions(
            inserted_indexes,
            deleted_indexes,
            updated_indexes,
        ))
    }
}

impl<T> Default for Batch<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Checks that `indexes` are in `0..len` and distinct.
fn unique_positions(
    kind: &str,
    indexes: &[usize],
    len: usize,
) -> Result<HashSet<usize>, SeqError> {
    let mut seen = HashSet::with_capacity(indexes.len());
    for &index in indexes {
        if index >= len {
            return Err(SeqError::InvalidArgument(format!(
                "{} position {} out of range (len: {})",
                kind, index, len
            )));
        }
        if !seen.insert(index) {
            return Err(SeqError::InvalidArgument(format!(
                "{} position {} given twice",
                kind, index
            )));
        }
    }
    Ok(seen)
}

impl<T: Clone + 'static> ObservableSequence<T> {
    /// Applies `batch` atomically and emits one event for the net result.
    ///
    /// Returns the emitted event, or `None` when the batch was empty.
    ///
    /// # Errors
    /// `InvalidArgument` when the batch does not fit the current sequence (see
    /// [`Batch::validate`]). The sequence is left unchanged and nothing is emitted.
    pub fn apply(&mut self, batch: Batch<T>) -> Result<Option<ChangeEvent>, SeqError> {
        if let Err(e) = batch.validate(self.elements.len()) {
            tracing::warn!("Refusing batch: {}", e);
            return Err(e);
        }
        let event = batch.apply_to(&mut self.elements);
        if let Some(event) = &event {
            self.emit(event.clone());
        }
        Ok(event)
    }

    /// Applies optional update, delete and add sets in one step. See [`apply`].
    ///
    /// [`apply`]: ObservableSequence::apply
    pub fn change(
        &mut self,
        updated: Option<ChangeSet<T>>,
        deleted: Option<ChangeSet<T>>,
        added: Option<ChangeSet<T>>,
    ) -> Result<Option<ChangeEvent>, SeqError> {
        self.apply(Batch::from_parts(updated, deleted, added))
    }
}
