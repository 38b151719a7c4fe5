pub mod error;
pub use error::{CoreError, SourceError};

mod source;
pub use source::TaskSource;

mod publisher;
pub use publisher::{CycleOutcome, StatePublisher};

pub mod reconcile;
pub use reconcile::{Reconciled, reconcile};

pub mod collector;
pub use collector::{Collector, CycleReport};
