//! The observable sequence container.
//!
//! Every mutator validates its arguments, changes the backing storage, then reports
//! exactly what changed: the new snapshot goes to the state sink first, the
//! [`ChangeEvent`] to the event sink second. Storage is left untouched when a call
//! fails.
//!
//! Mutation requires `&mut self`, so a subscriber callback cannot mutate the sequence
//! that is notifying it. The container is single-writer; share it across threads
//! only behind the caller's own synchronization.

mod batch;


pub use batch::Batch;

use crate::change::ChangeEvent;
use crate::config::SequenceConfig;
use crate::error::SeqError;
use crate::sink::{EventSink, Snapshot, StateSink, Subscription};
use std::fmt;
use std::ops::{Index, Range};
use std::sync::Arc;

/// Ordered, resizable collection that broadcasts a [`ChangeEvent`] per mutation.
pub struct ObservableSequence<T> {
    elements: Vec<T>,
    config: SequenceConfig,
    events: EventSink,
    state: StateSink<T>,
}

impl<T: 'static> ObservableSequence<T> {
    pub fn new() -> Self {
        Self::with_config(SequenceConfig::default())
    }

    /// Creates an empty sequence, reserving `config.initial_capacity` slots.
    pub fn with_config(config: SequenceConfig) -> Self {
        Self {
            elements: Vec::with_capacity(config.initial_capacity),
            config,
            events: EventSink::new(),
            state: StateSink::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_config(SequenceConfig {
            initial_capacity: capacity,
            ..SequenceConfig::default()
        })
    }

    /// Seeds the sequence with `elements`. No event is emitted.
    pub fn from_vec(elements: Vec<T>) -> Self {
        Self {
            elements,
            config: SequenceConfig::default(),
            events: EventSink::new(),
            state: StateSink::new(),
        }
    }

    /// Seeds the sequence with `count` copies of `value`.
    pub fn from_elem(value: T, count: usize) -> Self
    where
        T: Clone,
    {
        Self::from_vec(vec![value; count])
    }

    /// Attaches `callback` to every change event emitted from now on.
    pub fn subscribe_events<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&ChangeEvent) + Send + Sync + 'static,
    {
        self.events.subscribe(callback)
    }

    /// Attaches `callback` to element snapshots. It is called immediately with the
    /// current elements, then after every mutation.
    pub fn subscribe_elements<F>(&self, callback: F) -> Subscription
    where
        T: Clone,
        F: Fn(&Snapshot<T>) + Send + Sync + 'static,
    {
        self.state.subscribe_with(self.snapshot(), callback)
    }

    pub fn event_subscriber_count(&self) -> usize {
        self.events.subscriber_count()
    }

    pub fn element_subscriber_count(&self) -> usize {
        self.state.subscriber_count()
    }
}

impl<T: 'static> ObservableSequence<T> {
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.elements.capacity()
    }

    /// Reserves room for at least `additional` more elements. No event is emitted.
    pub fn reserve(&mut self, additional: usize) {
        self.elements.reserve(additional);
    }

    pub fn config(&self) -> &SequenceConfig {
        &self.config
    }

    /// Returns the element at `index`.
    ///
    /// # Errors
    /// `IndexOutOfBounds` when `index >= len`.
    pub fn get(&self, index: usize) -> Result<&T, SeqError> {
        self.elements.get(index).ok_or(SeqError::IndexOutOfBounds {
            index,
            len: self.elements.len(),
        })
    }

    /// Returns the elements in `range`.
    ///
    /// # Errors
    /// `IndexOutOfBounds` when the range is reversed or ends past `len`.
    pub fn get_range(&self, range: Range<usize>) -> Result<&[T], SeqError> {
        check_range(&range, self.elements.len())?;
        Ok(&self.elements[range])
    }

    pub fn first(&self) -> Option<&T> {
        self.elements.first()
    }

    pub fn last(&self) -> Option<&T> {
        self.elements.last()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.elements
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.elements.iter()
    }

    /// Returns an immutable snapshot of the current elements.
    ///
    /// The copy is cached in the state sink and shared until the next mutation.
    pub fn snapshot(&self) -> Snapshot<T>
    where
        T: Clone,
    {
        if let Some(cached) = self.state.latest() {
            return cached;
        }
        let snapshot = Arc::new(self.elements.clone());
        self.state.store(Arc::clone(&snapshot));
        snapshot
    }

    /// Consumes the sequence, returning its storage. Subscribers are detached.
    pub fn into_vec(self) -> Vec<T> {
        self.elements
    }
}

impl<T: Clone + 'static> ObservableSequence<T> {
    /// Appends `element`. Emits `inserted = [len - 1]`.
    pub fn push(&mut self, element: T) {
        self.elements.push(element);
        let index = self.elements.len() - 1;
        self.emit(ChangeEvent::from_positions(vec![index], Vec::new(), Vec::new()));
    }

    /// Appends every element of `iter`. Emits `inserted = [old_len..new_len)`, or
    /// nothing when `iter` is empty.
    pub fn extend_from<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        let start = self.elements.len();
        self.elements.extend(iter);
        let end = self.elements.len();
        if start == end {
            return;
        }
        self.emit(ChangeEvent::from_positions((start..end).collect(), Vec::new(), Vec::new()));
    }

    /// Inserts `element` before position `index`. Emits `inserted = [index]`.
    ///
    /// # Errors
    /// `IndexOutOfBounds` when `index > len`.
    pub fn insert(&mut self, index: usize, element: T) -> Result<(), SeqError> {
        check_insert_position(index, self.elements.len())?;
        self.elements.insert(index, element);
        self.emit(ChangeEvent::from_positions(vec![index], Vec::new(), Vec::new()));
        Ok(())
    }

    /// Inserts `elements` as a block starting at `index`. Emits
    /// `inserted = [index..index + n)`, or nothing when `elements` is empty.
    ///
    /// # Errors
    /// `IndexOutOfBounds` when `index > len`.
    pub fn insert_range<I>(&mut self, index: usize, elements: I) -> Result<(), SeqError>
    where
        I: IntoIterator<Item = T>,
    {
        check_insert_position(index, self.elements.len())?;
        let before = self.elements.len();
        self.elements.splice(index..index, elements);
        let added = self.elements.len() - before;
        if added == 0 {
            return Ok(());
        }
        self.emit(ChangeEvent::from_positions(
            (index..index + added).collect(),
            Vec::new(),
            Vec::new(),
        ));
        Ok(())
    }

    /// Removes and returns the element at `index`. Emits `deleted = [index]`.
    ///
    /// # Errors
    /// `IndexOutOfBounds` when `index >= len`.
    pub fn remove(&mut self, index: usize) -> Result<T, SeqError> {
        check_position(index, self.elements.len())?;
        let removed = self.elements.remove(index);
        self.emit(ChangeEvent::from_positions(Vec::new(), vec![index], Vec::new()));
        Ok(removed)
    }

    /// Removes the last element. Returns `None`, emitting nothing, when empty.
    pub fn remove_last(&mut self) -> Option<T> {
        let removed = self.elements.pop()?;
        let index = self.elements.len();
        self.emit(ChangeEvent::from_positions(Vec::new(), vec![index], Vec::new()));
        Some(removed)
    }

    /// Removes the elements in `range`, returning them in order. Emits
    /// `deleted = range`, or nothing when the range is empty.
    ///
    /// # Errors
    /// `IndexOutOfBounds` when the range is reversed or ends past `len`.
    pub fn remove_range(&mut self, range: Range<usize>) -> Result<Vec<T>, SeqError> {
        check_range(&range, self.elements.len())?;
        if range.is_empty() {
            return Ok(Vec::new());
        }
        let removed: Vec<T> = self.elements.drain(range.clone()).collect();
        self.emit(ChangeEvent::from_positions(Vec::new(), range.collect(), Vec::new()));
        Ok(removed)
    }

    /// Removes every element. Emits `deleted = [0..old_len)`, or nothing when
    /// already empty. Capacity is released unless `keep_capacity_on_clear` is set.
    pub fn clear(&mut self) {
        self.remove_all(self.config.keep_capacity_on_clear);
    }

    /// Removes every element, keeping the allocated buffer when `keep_capacity` is
    /// true. Emits `deleted = [0..old_len)`, or nothing when already empty.
    pub fn remove_all(&mut self, keep_capacity: bool) {
        let count = self.elements.len();
        if count == 0 {
            return;
        }
        if keep_capacity {
            self.elements.clear();
        } else {
            self.elements = Vec::new();
        }
        self.emit(ChangeEvent::from_positions(Vec::new(), (0..count).collect(), Vec::new()));
    }

    /// Writes `element` at `index`.
    ///
    /// `index == len` appends and emits `inserted = [index]`; a smaller index
    /// replaces in place and emits `updated = [index]`.
    ///
    /// # Errors
    /// `IndexOutOfBounds` when `index > len`.
    pub fn set(&mut self, index: usize, element: T) -> Result<(), SeqError> {
        let len = self.elements.len();
        if index == len {
            self.elements.push(element);
            self.emit(ChangeEvent::from_positions(vec![index], Vec::new(), Vec::new()));
            return Ok(());
        }
        check_position(index, len)?;
        self.elements[index] = element;
        self.emit(ChangeEvent::from_positions(Vec::new(), Vec::new(), vec![index]));
        Ok(())
    }

    /// Replaces the span `range` with `replacement`, which may differ in length.
    ///
    /// Emits `deleted = range` (old positions) together with
    /// `inserted = [range.start..range.start + n)` (new positions). Nothing is
    /// emitted when both the range and the replacement are empty.
    ///
    /// # Errors
    /// `IndexOutOfBounds` when the range is reversed or ends past `len`.
    pub fn replace_range<I>(&mut self, range: Range<usize>, replacement: I) -> Result<(), SeqError>
    where
        I: IntoIterator<Item = T>,
    {
        check_range(&range, self.elements.len())?;
        let old_len = self.elements.len();
        self.elements.splice(range.clone(), replacement);
        let inserted_count = self.elements.len() + range.len() - old_len;
        if range.is_empty() && inserted_count == 0 {
            return Ok(());
        }
        let start = range.start;
        self.emit(ChangeEvent::from_positions(
            (start..start + inserted_count).collect(),
            range.collect(),
            Vec::new(),
        ));
        Ok(())
    }

    /// Pushes the snapshot, then the event.
    fn emit(&self, event: ChangeEvent) {
        tracing::trace!(
            inserted = event.inserted_indexes().len(),
            deleted = event.deleted_indexes().len(),
            updated = event.updated_indexes().len(),
            len = self.elements.len(),
            "Sequence changed"
        );
        self.state.invalidate();
        if self.state.has_subscribers() {
            self.state.publish(self.snapshot());
        }
        self.events.publish(&event);
    }
}

fn check_position(index: usize, len: usize) -> Result<(), SeqError> {
    if index >= len {
        return Err(SeqError::IndexOutOfBounds { index, len });
    }
    Ok(())
}

fn check_insert_position(index: usize, len: usize) -> Result<(), SeqError> {
    if index > len {
        return Err(SeqError::IndexOutOfBounds { index, len });
    }
    Ok(())
}

fn check_range(range: &Range<usize>, len: usize) -> Result<(), SeqError> {
    if range.start > range.end {
        return Err(SeqError::IndexOutOfBounds {
            index: range.start,
            len,
        });
    }
    if range.end > len {
        return Err(SeqError::IndexOutOfBounds {
            index: range.end,
            len,
        });
    }
    Ok(())
}

impl<T: 'static> Default for ObservableSequence<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> From<Vec<T>> for ObservableSequence<T> {
    fn from(elements: Vec<T>) -> Self {
        Self::from_vec(elements)
    }
}

impl<T: 'static> FromIterator<T> for ObservableSequence<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl<T: Clone + 'static> Extend<T> for ObservableSequence<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.extend_from(iter);
    }
}

impl<T> Index<usize> for ObservableSequence<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.elements[index]
    }
}

impl<'a, T> IntoIterator for &'a ObservableSequence<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl<T: fmt::Debug> fmt::Debug for ObservableSequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.elements, f)
    }
}

impl<T: fmt::Display> fmt::Display for ObservableSequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, element) in self.elements.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", element)?;
        }
        write!(f, "]")
    }
}
