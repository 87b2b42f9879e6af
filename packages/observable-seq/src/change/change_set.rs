use crate::error::SeqError;

/// Positions affected by one class of change, with the elements involved when the
/// change carries new values.
///
/// Three shapes are meaningful:
/// - positions only, for deletions;
/// - one element per position, for updates and scattered insertions;
/// - a single start position with several elements, inserted as one block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSet<T> {
    indexes: Vec<usize>,
    elements: Vec<T>,
}

impl<T> ChangeSet<T> {
    /// Creates a change set that names positions only.
    ///
    /// # Errors
    /// `InvalidArgument` when `indexes` is empty.
    pub fn new(indexes: Vec<usize>) -> Result<Self, SeqError> {
        Self::with_elements(indexes, Vec::new())
    }

    /// Creates a change set with explicit positions and a parallel list of elements.
    ///
    /// # Errors
    /// `InvalidArgument` when `indexes` is empty.
    pub fn with_elements(indexes: Vec<usize>, elements: Vec<T>) -> Result<Self, SeqError> {
        if indexes.is_empty() {
            return Err(SeqError::invalid("change set requires at least one index"));
        }
        Ok(Self { indexes, elements })
    }

    /// Creates a change set whose elements occupy consecutive positions from `start`.
    ///
    /// # Errors
    /// `InvalidArgument` when `elements` is empty.
    pub fn at(elements: Vec<T>, start: usize) -> Result<Self, SeqError> {
        if elements.is_empty() {
            return Err(SeqError::invalid("change set requires at least one element"));
        }
        Ok(Self {
            indexes: vec![start],
            elements,
        })
    }

    pub fn indexes(&self) -> &[usize] {
        &self.indexes
    }

    pub fn elements(&self) -> &[T] {
        &self.elements
    }

    /// Number of positions named.
    pub fn len(&self) -> usize {
        self.indexes.len()
    }

    /// Always false; kept for parity with `len`.
    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }

    /// True when one start position carries several elements.
    pub fn is_block(&self) -> bool {
        self.indexes.len() == 1 && self.elements.len() > 1
    }

    pub fn into_parts(self) -> (Vec<usize>, Vec<T>) {
        (self.indexes, self.elements)
    }
}
