mod task_state;
pub use task_state::TaskState;

mod task_record;
pub use task_record::TaskRecord;

mod unit_key;
pub use unit_key::UnitKey;

/// Replica slot index inside a service.
///
/// Global-mode services have no slot; such tasks report slot `0`.
pub type Slot = u64;
