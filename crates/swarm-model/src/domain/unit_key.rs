use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Slot, TaskRecord};

/// Logical identity of a service replica: network alias plus slot index.
///
/// Known collisions, both accepted:
/// - tasks without a resolvable alias share the empty alias and collide per slot;
/// - global-mode tasks carry no slot, so every per-node task of a global service
///   lands on `alias.0` and only the latest of them is kept.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitKey {
    alias: String,
    slot: Slot,
}

impl UnitKey {
    pub fn new(alias: impl Into<String>, slot: Slot) -> Self {
        Self {
            alias: alias.into(),
            slot,
        }
    }

    /// Derive the key of a record. Missing alias or slot degrade to `""` and `0`.
    pub fn of(record: &TaskRecord) -> Self {
        Self {
            alias: record.alias.clone().unwrap_or_default(),
            slot: record.slot.unwrap_or(0),
        }
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }
}

/// Renders as `alias.slot`, e.g. `web.0`.
impl fmt::Display for UnitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.alias, self.slot)
    }
}
