use swarm_core::SourceError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DockerError {
    #[error("invalid docker config: {0}")]
    InvalidConfig(String),

    #[error("http request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    #[error("docker api returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl From<DockerError> for SourceError {
    fn from(err: DockerError) -> Self {
        match err {
            DockerError::InvalidConfig(msg) => SourceError::Unavailable(msg),
            DockerError::HttpRequest(e) => SourceError::Unavailable(e.to_string()),
            DockerError::Status { status, body } => SourceError::Rejected {
                status,
                message: body,
            },
            DockerError::InvalidResponse(msg) => SourceError::InvalidResponse(msg),
        }
    }
}
