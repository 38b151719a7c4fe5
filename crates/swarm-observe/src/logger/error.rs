use thiserror::Error;
use tracing_subscriber::{filter::ParseError, util::TryInitError};

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("invalid log format {0:?} (expected text|json|journald)")]
    InvalidFormat(String),
    #[error("journald logging needs linux and the `journald` feature")]
    JournaldNotSupported,
    #[error("invalid log filter {directives:?}: {source}")]
    InvalidLogLevel {
        directives: String,
        #[source]
        source: ParseError,
    },
    #[error("journald socket unavailable: {0}")]
    Journald(#[source] std::io::Error),
    #[error("a global logger is already installed")]
    AlreadyInitialized(#[from] TryInitError),
}
