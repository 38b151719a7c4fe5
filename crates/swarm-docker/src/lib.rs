//! Docker Engine task source.
//!
//! Lists swarm tasks through the Engine HTTP API (`GET /v{version}/tasks`),
//! over a unix socket or TCP. Unless a version is pinned, the API version is
//! negotiated once from `GET /version`, capped at the configured maximum, and
//! renegotiated after the daemon rejects a request with `400`.

mod config;
pub use config::{DEFAULT_DOCKER_HOST, DockerConfig, Endpoint};

mod errors;
pub use errors::DockerError;

mod version;
pub use version::ApiVersion;

mod wire;

mod source;
pub use source::DockerTaskSource;
