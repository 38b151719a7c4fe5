use std::time::Duration;

use crate::{error::CoreError, reconcile::Reconciled};

/// Result of one collection cycle, as reported to the publisher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Success,
    SourceError,
    PublishError,
}

impl CycleOutcome {
    pub fn as_label(&self) -> &'static str {
        match self {
            CycleOutcome::Success => "success",
            CycleOutcome::SourceError => "source_error",
            CycleOutcome::PublishError => "publish_error",
        }
    }
}

/// Sink for reconciled snapshots.
///
/// `publish` must replace everything published before: units missing from
/// `reconciled` must no longer be visible once it returns.
pub trait StatePublisher: Send + Sync + 'static {
    fn publish(&self, reconciled: &Reconciled) -> Result<(), CoreError>;

    /// Called once at the end of every cycle, whatever its outcome.
    fn record_cycle(&self, _outcome: CycleOutcome, _elapsed: Duration) {}
}
