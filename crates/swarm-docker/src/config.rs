use std::path::PathBuf;

use crate::errors::DockerError;
use crate::version::ApiVersion;

/// Daemon socket used when `DOCKER_HOST` is not set.
pub const DEFAULT_DOCKER_HOST: &str = "unix:///var/run/docker.sock";

/// Connection settings for the Docker Engine API.
#[derive(Debug, Clone)]
pub struct DockerConfig {
    /// `unix:///path`, `tcp://host:port`, `http://host:port` or `https://host:port`.
    pub host: String,
    /// Fixed API version. When set, no negotiation takes place.
    pub api_version: Option<ApiVersion>,
    /// Upper bound for the negotiated version.
    pub max_api_version: ApiVersion,
    /// Request timeout.
    pub timeout_ms: u64,
}

impl Default for DockerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_DOCKER_HOST.to_string(),
            api_version: None,
            max_api_version: ApiVersion::DEFAULT_MAX,
            timeout_ms: 10_000,
        }
    }
}

/// Where requests are sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// HTTP(S) base URL without trailing slash.
    Http(String),
    /// Path of a local unix socket.
    Unix(PathBuf),
}

impl DockerConfig {
    pub fn validate(&self) -> Result<(), DockerError> {
        if self.timeout_ms == 0 {
            return Err(DockerError::InvalidConfig(
                "timeout_ms must be greater than zero".into(),
            ));
        }
        match self.endpoint()? {
            #[cfg(not(unix))]
            Endpoint::Unix(_) => Err(DockerError::InvalidConfig(
                "unix socket hosts are not supported on this platform".into(),
            )),
            _ => Ok(()),
        }
    }

    /// Parse `host` into an [`Endpoint`].
    pub fn endpoint(&self) -> Result<Endpoint, DockerError> {
        let host = self.host.trim();

        if let Some(path) = host.strip_prefix("unix://") {
            if path.is_empty() {
                return Err(DockerError::InvalidConfig(
                    "unix docker host has no socket path".into(),
                ));
            }
            return Ok(Endpoint::Unix(PathBuf::from(path)));
        }

        let host = host.trim_end_matches('/');
        if let Some(rest) = host.strip_prefix("tcp://") {
            Ok(Endpoint::Http(format!("http://{rest}")))
        } else if host.starts_with("http://") || host.starts_with("https://") {
            Ok(Endpoint::Http(host.to_string()))
        } else {
            Err(DockerError::InvalidConfig(format!(
                "unsupported docker host '{}' (expected unix://, tcp://, http:// or https://)",
                self.host
            )))
        }
    }
}
