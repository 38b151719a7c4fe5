//! Collapse of raw task lists into one record per logical unit.

use std::collections::{HashMap, hash_map::Entry};

use swarm_model::{TaskRecord, UnitKey};

/// Latest known record per logical unit.
pub type Reconciled = HashMap<UnitKey, TaskRecord>;

/// Keep the most recent record for every [`UnitKey`] in `records`.
///
/// A record replaces the stored one only when its timestamp is strictly later,
/// so on equal timestamps the first record in input order wins.
/// The result is always built from scratch; nothing carries over between calls.
pub fn reconcile<I>(records: I) -> Reconciled
where
    I: IntoIterator<Item = TaskRecord>,
{
    let mut latest = Reconciled::new();

    for record in records {
        match latest.entry(record.key()) {
            Entry::Vacant(slot) => {
                slot.insert(record);
            }
            Entry::Occupied(mut slot) => {
                if record.timestamp > slot.get().timestamp {
                    slot.insert(record);
                }
            }
        }
    }
    latest
}
