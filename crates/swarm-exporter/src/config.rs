use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use swarm_docker::{ApiVersion, DEFAULT_DOCKER_HOST, DockerConfig, DockerError};
use swarm_observe::{LoggerConfig, LoggerFormat};

/// Command line and environment settings.
#[derive(Debug, Clone, Parser)]
#[command(name = "swarm-exporter")]
#[command(about = "Exports Docker Swarm task states as Prometheus metrics", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Port of the /metrics endpoint
    #[arg(long, env = "EXPORTER_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Poll interval in milliseconds
    #[arg(long = "interval-ms", env = "EXPORTER_INTERVAL", default_value_t = 30_000)]
    pub interval_ms: u64,

    /// Docker Engine endpoint (unix://, tcp://, http:// or https://)
    #[arg(long, env = "DOCKER_HOST", default_value = DEFAULT_DOCKER_HOST)]
    pub docker_host: String,

    /// Pin the Engine API version instead of negotiating it
    #[arg(long, env = "DOCKER_API_VERSION")]
    pub docker_api_version: Option<ApiVersion>,

    /// Highest Engine API version to negotiate
    #[arg(long, env = "EXPORTER_DOCKER_MAX_API_VERSION", default_value_t = ApiVersion::DEFAULT_MAX)]
    pub docker_max_api_version: ApiVersion,

    /// Timeout of a task list request in milliseconds
    #[arg(long, env = "EXPORTER_DOCKER_TIMEOUT_MS", default_value_t = 10_000)]
    pub docker_timeout_ms: u64,

    /// Log filter directive
    #[arg(long, env = "EXPORTER_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Log format: text, json or journald
    #[arg(long, env = "EXPORTER_LOG_FORMAT", default_value = "text")]
    pub log_format: LoggerFormat,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid interval: must be greater than zero")]
    InvalidInterval,

    #[error("invalid docker settings: {0}")]
    Docker(#[from] DockerError),
}

/// Validated exporter configuration.
#[derive(Debug, Clone)]
pub struct ExporterConfig {
    pub listen: SocketAddr,
    pub interval: Duration,
    pub docker: DockerConfig,
    pub logger: LoggerConfig,
}

impl TryFrom<Cli> for ExporterConfig {
    type Error = ConfigError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        if cli.interval_ms == 0 {
            return Err(ConfigError::InvalidInterval);
        }

        let docker = DockerConfig {
            host: cli.docker_host,
            api_version: cli.docker_api_version,
            max_api_version: cli.docker_max_api_version,
            timeout_ms: cli.docker_timeout_ms,
        };
        docker.validate()?;

        Ok(Self {
            listen: SocketAddr::from((Ipv4Addr::UNSPECIFIED, cli.port)),
            interval: Duration::from_millis(cli.interval_ms),
            docker,
            logger: LoggerConfig {
                format: cli.log_format,
                level: cli.log_level,
                ..Default::default()
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let argv = std::iter::once("swarm-exporter").chain(args.iter().copied());
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn explicit_flags_are_applied() {
        let cli = parse(&[
            "--port",
            "9323",
            "--interval-ms",
            "5000",
            "--docker-host",
            "tcp://manager:2375",
            "--log-format",
            "json",
        ]);
        let cfg = ExporterConfig::try_from(cli).unwrap();

        assert_eq!(cfg.listen.port(), 9323);
        assert_eq!(cfg.interval, Duration::from_millis(5000));
        assert_eq!(cfg.docker.host, "tcp://manager:2375");
        assert_eq!(cfg.logger.format, LoggerFormat::Json);
    }

    #[test]
    fn zero_interval_is_rejected() {
        let cli = parse(&["--interval-ms", "0"]);
        let err = ExporterConfig::try_from(cli).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidInterval));
    }

    #[test]
    fn api_version_can_be_pinned_or_capped() {
        let cli = parse(&[
            "--docker-api-version",
            "v1.41",
            "--docker-max-api-version",
            "1.44",
        ]);
        let cfg = ExporterConfig::try_from(cli).unwrap();
        assert_eq!(cfg.docker.api_version, Some(ApiVersion::new(1, 41)));
        assert_eq!(cfg.docker.max_api_version, ApiVersion::new(1, 44));
    }

    #[test]
    fn malformed_api_version_fails_parsing() {
        let argv = ["swarm-exporter", "--docker-api-version", "latest"];
        assert!(Cli::try_parse_from(argv).is_err());
    }

    #[test]
    fn unsupported_docker_host_is_rejected() {
        let cli = parse(&["--docker-host", "ssh://manager"]);
        let err = ExporterConfig::try_from(cli).unwrap_err();
        assert!(matches!(err, ConfigError::Docker(_)));
    }

    #[test]
    fn unknown_log_format_fails_parsing() {
        let argv = ["swarm-exporter", "--log-format", "yaml"];
        assert!(Cli::try_parse_from(argv).is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
