use serde::{Deserialize, Serialize};
use std::time::SystemTime;

use crate::{Slot, TaskState, UnitKey};

/// Point-in-time snapshot of one scheduled task instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    /// Physical task identifier assigned by the orchestrator.
    pub id: String,
    /// Owning service identifier.
    pub service_id: String,
    /// First network alias of the task, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Replica slot (absent for global-mode services).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot: Option<Slot>,
    /// Observed state.
    pub state: TaskState,
    /// State the orchestrator is driving the task towards.
    pub desired_state: TaskState,
    /// Time of the last state transition.
    #[serde(with = "time_serde")]
    pub timestamp: SystemTime,
    /// Error reported by the orchestrator for the last transition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TaskRecord {
    pub fn key(&self) -> UnitKey {
        UnitKey::of(self)
    }

    /// Error detail as exported in labels; empty when none.
    pub fn error_label(&self) -> &str {
        self.error.as_deref().unwrap_or("")
    }
}

mod time_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    pub fn serialize<S>(time: &SystemTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let since_epoch = time
            .duration_since(UNIX_EPOCH)
            .map_err(serde::ser::Error::custom)?;
        let nanos = u64::try_from(since_epoch.as_nanos()).map_err(serde::ser::Error::custom)?;
        nanos.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<SystemTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let nanos = u64::deserialize(deserializer)?;
        Ok(UNIX_EPOCH + Duration::from_nanos(nanos))
    }
}
