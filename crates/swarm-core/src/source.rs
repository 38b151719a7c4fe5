use async_trait::async_trait;
use swarm_model::TaskRecord;

use crate::error::SourceError;

/// Supplier of the cluster task inventory.
///
/// Each call returns every task the control plane currently retains,
/// including historical instances that share a logical unit with the live one.
#[async_trait]
pub trait TaskSource: Send + Sync + 'static {
    async fn list_tasks(&self) -> Result<Vec<TaskRecord>, SourceError>;

    /// Short name used in logs.
    fn name(&self) -> &'static str {
        "task-source"
    }
}
