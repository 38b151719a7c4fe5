use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use swarm_core::{SourceError, TaskSource};
use swarm_model::TaskRecord;
use tracing::{debug, info, trace, warn};

use crate::config::{DockerConfig, Endpoint};
use crate::errors::DockerError;
use crate::version::ApiVersion;
use crate::wire::{WireTask, WireVersion};

/// [`TaskSource`] backed by the Docker Engine `GET /tasks` endpoint.
#[derive(Debug)]
pub struct DockerTaskSource {
    client: reqwest::Client,
    host: String,
    base_url: String,
    pinned: Option<ApiVersion>,
    max_version: ApiVersion,
    negotiated: Mutex<Option<ApiVersion>>,
}

impl DockerTaskSource {
    pub fn new(config: DockerConfig) -> Result<Self, DockerError> {
        config.validate()?;

        let builder = reqwest::Client::builder().timeout(Duration::from_millis(config.timeout_ms));
        let (client, base_url) = match config.endpoint()? {
            Endpoint::Http(url) => (builder.build()?, url),
            #[cfg(unix)]
            Endpoint::Unix(path) => {
                (builder.unix_socket(path).build()?, "http://localhost".to_string())
            }
            #[cfg(not(unix))]
            Endpoint::Unix(_) => {
                return Err(DockerError::InvalidConfig(
                    "unix socket hosts are not supported on this platform".into(),
                ));
            }
        };
        debug!(host = %config.host, base = %base_url, "docker task source configured");

        Ok(Self {
            client,
            host: config.host,
            base_url,
            pinned: config.api_version,
            max_version: config.max_api_version,
            negotiated: Mutex::new(None),
        })
    }

    /// Configured `DOCKER_HOST` value.
    pub fn host(&self) -> &str {
        &self.host
    }

    async fn fetch(&self) -> Result<Vec<TaskRecord>, DockerError> {
        let version = self.api_version().await?;
        let url = format!("{}/{}/tasks", self.base_url, version.path_segment());

        let body = self.get(&url).await.inspect_err(|e| {
            if matches!(e, DockerError::Status { status: 400, .. }) {
                self.forget_version(version);
            }
        })?;

        let tasks: Vec<WireTask> = serde_json::from_str(&body).map_err(|e| {
            DockerError::InvalidResponse(format!("failed to parse task list: {}", e))
        })?;
        trace!(count = tasks.len(), "docker task list received");

        Ok(tasks.into_iter().map(TaskRecord::from).collect())
    }

    /// Version used for the next request: pinned, cached, or negotiated now.
    async fn api_version(&self) -> Result<ApiVersion, DockerError> {
        if let Some(version) = self.pinned {
            return Ok(version);
        }
        let cached = *self.negotiated.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(version) = cached {
            return Ok(version);
        }

        let version = self.negotiate().await?;
        *self.negotiated.lock().unwrap_or_else(PoisonError::into_inner) = Some(version);
        Ok(version)
    }

    async fn negotiate(&self) -> Result<ApiVersion, DockerError> {
        let body = self.get(&format!("{}/version", self.base_url)).await?;
        let reply: WireVersion = serde_json::from_str(&body).map_err(|e| {
            DockerError::InvalidResponse(format!("failed to parse version: {}", e))
        })?;

        let server = match reply.api_version.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => raw.parse().map_err(|_| {
                DockerError::InvalidResponse(format!("daemon reported api version '{raw}'"))
            })?,
            _ => ApiVersion::LEGACY,
        };
        let version = server.min(self.max_version);
        info!(daemon = %server, using = %version, "docker api version negotiated");
        Ok(version)
    }

    /// Drop a negotiated version the daemon refused, so the next cycle asks again.
    fn forget_version(&self, refused: ApiVersion) {
        if self.pinned.is_some() {
            return;
        }
        let mut cached = self.negotiated.lock().unwrap_or_else(PoisonError::into_inner);
        if *cached == Some(refused) {
            warn!(version = %refused, "docker rejected request; api version will be renegotiated");
            *cached = None;
        }
    }

    async fn get(&self, url: &str) -> Result<String, DockerError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(DockerError::Status {
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }
        Ok(body)
    }
}

#[async_trait]
impl TaskSource for DockerTaskSource {
    async fn list_tasks(&self) -> Result<Vec<TaskRecord>, SourceError> {
        Ok(self.fetch().await?)
    }

    fn name(&self) -> &'static str {
        "docker"
    }
}
