//! Property checks: batches against a reference model, single mutations against a
//! plain `Vec` and a list-view consumer.

use observable_seq::{Batch, ChangeSet, ObservableSequence};
use proptest::prelude::*;

use super::helpers::{EventLog, ListView};

const UPDATE_OFFSET: u32 = 100_000;
const ADD_BASE: u32 = 200_000;

#[derive(Debug, Clone)]
struct BatchCase {
    base: Vec<u32>,
    /// Per original position: 0 keep, 1 delete, 2 update.
    roles: Vec<u8>,
    /// Add targets in the original index space, one element each.
    adds: Vec<usize>,
    /// Delete positions in the order the caller lists them.
    deletes: Vec<usize>,
}

impl BatchCase {
    fn updates(&self) -> Vec<usize> {
        positions_with_role(&self.roles, 2)
    }

    fn add_value(k: usize) -> u32 {
        ADD_BASE + k as u32
    }

    fn batch(&self) -> Batch<u32> {
        let mut batch = Batch::new();
        let updates = self.updates();
        if !updates.is_empty() {
            let values = updates.iter().map(|&i| self.base[i] + UPDATE_OFFSET).collect();
            batch = batch.update(ChangeSet::with_elements(updates, values).unwrap());
        }
        if !self.deletes.is_empty() {
            batch = batch.delete(ChangeSet::new(self.deletes.clone()).unwrap());
        }
        if !self.adds.is_empty() {
            let values = (0..self.adds.len()).map(Self::add_value).collect();
            batch = batch.add(ChangeSet::with_elements(self.adds.clone(), values).unwrap());
        }
        batch
    }

    /// Final elements and the positions the added elements end up at, built
    /// slot by slot: adds anchored before a position come first, in supplied order.
    fn expected(&self) -> (Vec<u32>, Vec<usize>) {
        let mut out = Vec::new();
        let mut inserted = Vec::new();
        for slot in 0..=self.base.len() {
            for (k, _) in self.adds.iter().enumerate().filter(|&(_, &t)| t == slot) {
                inserted.push(out.len());
                out.push(Self::add_value(k));
            }
            if slot < self.base.len() {
                match self.roles[slot] {
                    1 => {}
                    2 => out.push(self.base[slot] + UPDATE_OFFSET),
                    _ => out.push(self.base[slot]),
                }
            }
        }
        (out, inserted)
    }
}

fn positions_with_role(roles: &[u8], role: u8) -> Vec<usize> {
    roles
        .iter()
        .enumerate()
        .filter(|(_, r)| **r == role)
        .map(|(i, _)| i)
        .collect()
}

fn batch_case() -> impl Strategy<Value = BatchCase> {
    prop::collection::vec(0u32..1000, 0..16)
        .prop_flat_map(|base| {
            let len = base.len();
            (
                Just(base),
                prop::collection::vec(0u8..3, len),
                prop::collection::vec(0..=len, 0..6),
            )
        })
        .prop_flat_map(|(base, roles, adds)| {
            let deletes = positions_with_role(&roles, 1);
            (Just(base), Just(roles), Just(adds), Just(deletes).prop_shuffle())
        })
        .prop_map(|(base, roles, adds, deletes)| BatchCase {
            base,
            roles,
            adds,
            deletes,
        })
}

#[derive(Debug, Clone)]
enum Op {
    Push(u32),
    Extend(Vec<u32>),
    Insert(usize, u32),
    InsertRange(usize, Vec<u32>),
    Remove(usize),
    RemoveLast,
    RemoveRange(usize, usize),
    Clear,
    Set(usize, u32),
    ReplaceRange(usize, usize, Vec<u32>),
}

fn op() -> impl Strategy<Value = Op> {
    let small_vec = || prop::collection::vec(0u32..1000, 0..4);
    prop_oneof![
        4 => (0u32..1000).prop_map(Op::Push),
        2 => small_vec().prop_map(Op::Extend),
        4 => (0usize..12, 0u32..1000).prop_map(|(i, v)| Op::Insert(i, v)),
        2 => (0usize..12, small_vec()).prop_map(|(i, v)| Op::InsertRange(i, v)),
        3 => (0usize..12).prop_map(Op::Remove),
        2 => Just(Op::RemoveLast),
        2 => (0usize..12, 0usize..4).prop_map(|(s, n)| Op::RemoveRange(s, n)),
        1 => Just(Op::Clear),
        3 => (0usize..12, 0u32..1000).prop_map(|(i, v)| Op::Set(i, v)),
        2 => (0usize..12, 0usize..4, small_vec())
            .prop_map(|(s, n, v)| Op::ReplaceRange(s, n, v)),
    ]
}

/// Applies `op` to both containers, skipping ops that would be out of range.
/// Returns `(expected_inserted, expected_deleted)` counts when the op ran.
fn apply_op(
    seq: &mut ObservableSequence<u32>,
    model: &mut Vec<u32>,
    op: &Op,
) -> Option<(usize, usize)> {
    let len = model.len();
    match op.clone() {
        Op::Push(v) => {
            seq.push(v);
            model.push(v);
            Some((1, 0))
        }
        Op::Extend(vs) => {
            let n = vs.len();
            seq.extend_from(vs.clone());
            model.extend(vs);
            Some((n, 0))
        }
        Op::Insert(i, v) if i <= len => {
            seq.insert(i, v).unwrap();
            model.insert(i, v);
            Some((1, 0))
        }
        Op::InsertRange(i, vs) if i <= len => {
            let n = vs.len();
            seq.insert_range(i, vs.clone()).unwrap();
            model.splice(i..i, vs);
            Some((n, 0))
        }
        Op::Remove(i) if i < len => {
            assert_eq!(seq.remove(i).unwrap(), model.remove(i));
            Some((0, 1))
        }
        Op::RemoveLast => {
            let removed = model.pop();
            assert_eq!(seq.remove_last(), removed);
            Some((0, usize::from(removed.is_some())))
        }
        Op::RemoveRange(s, n) if s + n <= len => {
            let removed = seq.remove_range(s..s + n).unwrap();
            assert_eq!(removed, model.drain(s..s + n).collect::<Vec<_>>());
            Some((0, n))
        }
        Op::Clear => {
            seq.clear();
            let n = model.len();
            model.clear();
            Some((0, n))
        }
        Op::Set(i, v) if i <= len => {
            seq.set(i, v).unwrap();
            if i == len {
                model.push(v);
                Some((1, 0))
            } else {
                model[i] = v;
                Some((0, 0))
            }
        }
        Op::ReplaceRange(s, n, vs) if s + n <= len => {
            let inserted = vs.len();
            seq.replace_range(s..s + n, vs.clone()).unwrap();
            model.splice(s..s + n, vs);
            Some((inserted, n))
        }
        _ => None,
    }
}

proptest! {
    #[test]
    fn prop_batch_matches_model(case in batch_case()) {
        let mut seq = ObservableSequence::from_vec(case.base.clone());
        let log = EventLog::attach(&seq);
        let view = ListView::attach(&seq);
        let (expected, expected_inserted) = case.expected();

        let event = seq.apply(case.batch()).unwrap();

        prop_assert_eq!(seq.as_slice(), expected.as_slice());
        prop_assert_eq!(view.rows(), expected.clone());
        prop_assert_eq!(
            seq.len(),
            case.base.len() - case.deletes.len() + case.adds.len()
        );
        match event {
            None => {
                prop_assert!(case.adds.is_empty() && case.deletes.is_empty());
                prop_assert!(case.updates().is_empty());
                prop_assert!(log.take().is_empty());
            }
            Some(event) => {
                prop_assert_eq!(event.inserted_indexes(), expected_inserted.as_slice());
                prop_assert_eq!(event.deleted_indexes(), case.deletes.as_slice());
                let updates = case.updates();
                prop_assert_eq!(event.updated_indexes(), updates.as_slice());
                prop_assert_eq!(log.take(), vec![event]);
            }
        }
    }

    #[test]
    fn prop_batch_event_patches_old_rows(case in batch_case()) {
        let mut seq = ObservableSequence::from_vec(case.base.clone());
        let Some(event) = seq.apply(case.batch()).unwrap() else {
            return Ok(());
        };

        // Reload by old index, then delete by old index, then insert by new index.
        let mut rows = case.base.clone();
        for &index in event.updated_indexes() {
            rows[index] = case.base[index] + UPDATE_OFFSET;
        }
        let mut deleted = event.deleted_indexes().to_vec();
        deleted.sort_unstable_by(|a, b| b.cmp(a));
        for index in deleted {
            rows.remove(index);
        }
        for &index in event.inserted_indexes() {
            rows.insert(index, seq[index]);
        }

        prop_assert_eq!(rows.as_slice(), seq.as_slice());
    }

    #[test]
    fn prop_block_insert_is_contiguous(
        base in prop::collection::vec(0u32..1000, 0..12),
        block in prop::collection::vec(1000u32..2000, 2..6),
        start_seed in any::<usize>(),
    ) {
        let start = start_seed % (base.len() + 1);
        let mut seq = ObservableSequence::from_vec(base.clone());

        let event = seq
            .apply(Batch::new().add(ChangeSet::at(block.clone(), start).unwrap()))
            .unwrap()
            .unwrap();

        let expected_positions: Vec<usize> = (start..start + block.len()).collect();
        prop_assert_eq!(event.inserted_indexes(), expected_positions.as_slice());
        prop_assert_eq!(&seq.as_slice()[start..start + block.len()], block.as_slice());
        prop_assert_eq!(seq.len(), base.len() + block.len());
    }

    #[test]
    fn prop_single_ops_track_model(ops in prop::collection::vec(op(), 0..40)) {
        let mut seq = ObservableSequence::new();
        let mut model = Vec::new();
        let log = EventLog::attach(&seq);
        let view = ListView::attach(&seq);

        for op in &ops {
            let before = seq.len();
            let Some((added, removed)) = apply_op(&mut seq, &mut model, op) else {
                continue;
            };
            prop_assert_eq!(seq.len(), before + added - removed);
            prop_assert_eq!(seq.as_slice(), model.as_slice());

            let events = log.take();
            let noop = added == 0 && removed == 0 && !matches!(op, Op::Set(..));
            if noop {
                prop_assert!(events.is_empty());
            } else {
                prop_assert_eq!(events.len(), 1);
                let event = &events[0];
                prop_assert_eq!(event.inserted_indexes().len(), added);
                prop_assert_eq!(event.deleted_indexes().len(), removed);
            }
            prop_assert_eq!(view.rows(), model.clone());
        }
    }
}
