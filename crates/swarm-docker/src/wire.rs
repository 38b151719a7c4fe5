use std::time::{SystemTime, UNIX_EPOCH};

use serde::Deserialize;
use swarm_model::{TaskRecord, TaskState};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// Subset of the Engine API `Task` object needed to build a [`TaskRecord`].
///
/// Every field is optional; the engine omits or nulls several of them depending
/// on service mode and task age.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub(crate) struct WireTask {
    #[serde(rename = "ID")]
    pub id: Option<String>,
    #[serde(rename = "ServiceID")]
    pub service_id: Option<String>,
    pub slot: Option<u64>,
    pub spec: Option<WireTaskSpec>,
    pub status: Option<WireTaskStatus>,
    pub desired_state: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub(crate) struct WireTaskSpec {
    pub networks: Option<Vec<WireNetworkAttachment>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub(crate) struct WireNetworkAttachment {
    pub aliases: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub(crate) struct WireTaskStatus {
    pub timestamp: Option<String>,
    pub state: Option<String>,
    pub err: Option<String>,
}

/// `GET /version` body; only the API version is read.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub(crate) struct WireVersion {
    pub api_version: Option<String>,
}

impl WireTask {
    /// First non-empty alias across the task's network attachments.
    fn alias(&self) -> Option<String> {
        self.spec
            .as_ref()?
            .networks
            .as_deref()?
            .iter()
            .filter_map(|n| n.aliases.as_deref())
            .flatten()
            .map(|a| a.trim())
            .find(|a| !a.is_empty())
            .map(str::to_string)
    }
}

impl From<WireTask> for TaskRecord {
    fn from(task: WireTask) -> Self {
        let alias = task.alias();
        let status = task.status.unwrap_or_default();

        TaskRecord {
            id: task.id.unwrap_or_default(),
            service_id: task.service_id.unwrap_or_default(),
            alias,
            slot: task.slot,
            state: status
                .state
                .as_deref()
                .map(TaskState::parse)
                .unwrap_or(TaskState::Unknown),
            desired_state: task
                .desired_state
                .as_deref()
                .map(TaskState::parse)
                .unwrap_or(TaskState::Unknown),
            timestamp: status
                .timestamp
                .as_deref()
                .map(parse_timestamp)
                .unwrap_or(UNIX_EPOCH),
            error: status.err.filter(|e| !e.trim().is_empty()),
        }
    }
}

/// Parse an RFC3339 engine timestamp; unparseable or pre-epoch values become the epoch.
pub(crate) fn parse_timestamp(raw: &str) -> SystemTime {
    match OffsetDateTime::parse(raw.trim(), &Rfc3339) {
        Ok(ts) if ts > OffsetDateTime::UNIX_EPOCH => SystemTime::from(ts),
        _ => UNIX_EPOCH,
    }
}
