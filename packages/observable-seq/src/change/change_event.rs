use crate::error::SeqError;
use serde::{Deserialize, Serialize};

/// Net effect of one mutation, or one batch of mutations.
///
/// `deleted` positions are numbered as they were before the mutation and `inserted`
/// positions as they are after it. `updated` positions are numbered before the
/// mutation too: a batch reports its updates at the positions the caller gave. For a
/// single-element update nothing moves, so the old and new positions coincide.
///
/// A consumer patching a list view applies deletions by old index, then insertions by
/// new index, then reloads the rows named by [`updated_indexes_after`].
///
/// [`updated_indexes_after`]: ChangeEvent::updated_indexes_after
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawChangeEvent")]
pub struct ChangeEvent {
    inserted: Vec<usize>,
    deleted: Vec<usize>,
    updated: Vec<usize>,
}

#[derive(Deserialize)]
struct RawChangeEvent {
    #[serde(default)]
    inserted: Vec<usize>,
    #[serde(default)]
    deleted: Vec<usize>,
    #[serde(default)]
    updated: Vec<usize>,
}

impl TryFrom<RawChangeEvent> for ChangeEvent {
    type Error = SeqError;

    fn try_from(raw: RawChangeEvent) -> Result<Self, Self::Error> {
        ChangeEvent::new(raw.inserted, raw.deleted, raw.updated)
    }
}

impl ChangeEvent {
    /// Creates an event from its three position lists.
    ///
    /// # Errors
    /// `InvalidArgument` when all three lists are empty. A no-op mutation must not
    /// produce an event.
    pub fn new(
        inserted: Vec<usize>,
        deleted: Vec<usize>,
        updated: Vec<usize>,
    ) -> Result<Self, SeqError> {
        if inserted.is_empty() && deleted.is_empty() && updated.is_empty() {
            return Err(SeqError::invalid("change event requires at least one position"));
        }
        Ok(Self {
            inserted,
            deleted,
            updated,
        })
    }

    /// Builds an event from lists the caller has already checked to be non-empty.
    pub(crate) fn from_positions(
        inserted: Vec<usize>,
        deleted: Vec<usize>,
        updated: Vec<usize>,
    ) -> Self {
        debug_assert!(!(inserted.is_empty() && deleted.is_empty() && updated.is_empty()));
        Self {
            inserted,
            deleted,
            updated,
        }
    }

    pub fn inserted(positions: Vec<usize>) -> Result<Self, SeqError> {
        Self::new(positions, Vec::new(), Vec::new())
    }

    pub fn deleted(positions: Vec<usize>) -> Result<Self, SeqError> {
        Self::new(Vec::new(), positions, Vec::new())
    }

    pub fn updated(positions: Vec<usize>) -> Result<Self, SeqError> {
        Self::new(Vec::new(), Vec::new(), positions)
    }

    /// Post-mutation positions of new elements.
    pub fn inserted_indexes(&self) -> &[usize] {
        &self.inserted
    }

    /// Pre-mutation positions of removed elements.
    pub fn deleted_indexes(&self) -> &[usize] {
        &self.deleted
    }

    /// Pre-mutation positions whose element was replaced in place.
    pub fn updated_indexes(&self) -> &[usize] {
        &self.updated
    }

    /// Post-mutation positions of the updated elements, in `updated` order.
    ///
    /// An updated element survives the mutation. Its rank among survivors is its old
    /// position minus the deletions before it; its new position is that rank plus
    /// every insertion landing at or before it.
    pub fn updated_indexes_after(&self) -> Vec<usize> {
        let mut deleted = self.deleted.clone();
        deleted.sort_unstable();
        let mut inserted = self.inserted.clone();
        inserted.sort_unstable();

        self.updated
            .iter()
            .map(|&old| {
                let mut position = old.saturating_sub(deleted.partition_point(|&d| d < old));
                for &index in &inserted {
                    if index > position {
                        break;
                    }
                    position += 1;
                }
                position
            })
            .collect()
    }

    /// True when the event inserts or removes positions.
    pub fn is_structural(&self) -> bool {
        !self.inserted.is_empty() || !self.deleted.is_empty()
    }

    /// Change in element count described by this event.
    pub fn count_delta(&self) -> isize {
        self.inserted.len() as isize - self.deleted.len() as isize
    }
}
