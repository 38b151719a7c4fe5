use thiserror::Error;

/// Failure of a task source to deliver the task list.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("task source unavailable: {0}")]
    Unavailable(String),

    #[error("task source rejected request (status {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("invalid task source response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    #[error("publish failed: {0}")]
    Publish(String),

    #[error("invalid collection interval: must be greater than zero")]
    InvalidInterval,
}
