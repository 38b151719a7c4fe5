use time::{UtcOffset, format_description::well_known::Rfc3339};
use tracing_subscriber::{
    EnvFilter, fmt, fmt::time::OffsetTime, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::logger::{config::LoggerConfig, error::LoggerError, format::LoggerFormat};

/// Install the global tracing subscriber described by `cfg`.
///
/// Fails with [`LoggerError::AlreadyInitialized`] when a subscriber or `log`
/// logger is already in place; the existing one is left untouched.
pub fn init_logger(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    let registry = tracing_subscriber::registry().with(level_filter(&cfg.level)?);

    match cfg.format {
        LoggerFormat::Text => registry
            .with(
                fmt::layer()
                    .with_ansi(cfg.use_color)
                    .with_target(cfg.with_targets)
                    .with_timer(local_timer()),
            )
            .try_init()?,
        LoggerFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_target(cfg.with_targets)
                    .with_timer(local_timer()),
            )
            .try_init()?,
        #[cfg(all(target_os = "linux", feature = "journald"))]
        LoggerFormat::Journald => registry
            .with(tracing_journald::layer().map_err(LoggerError::Journald)?)
            .try_init()?,
        #[cfg(not(all(target_os = "linux", feature = "journald")))]
        LoggerFormat::Journald => return Err(LoggerError::JournaldNotSupported),
    }
    Ok(())
}

fn level_filter(directives: &str) -> Result<EnvFilter, LoggerError> {
    EnvFilter::try_new(directives).map_err(|source| LoggerError::InvalidLogLevel {
        directives: directives.to_string(),
        source,
    })
}

// Local offset lookup fails once other threads exist; fall back to UTC.
fn local_timer() -> OffsetTime<Rfc3339> {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    OffsetTime::new(offset, Rfc3339)
}
