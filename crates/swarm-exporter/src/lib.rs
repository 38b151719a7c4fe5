//! Docker Swarm task-state exporter.
//!
//! Wires a [`DockerTaskSource`] and a [`PrometheusMetrics`] publisher into a
//! [`Collector`] and serves the registry on `GET /metrics`.

use std::io;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

use swarm_core::Collector;
use swarm_docker::DockerTaskSource;
use swarm_prometheus::PrometheusMetrics;

mod config;
pub use config::{Cli, ConfigError, ExporterConfig};

mod http;
pub use http::MetricsApi;

/// Bind the configured address and run until `token` is cancelled.
pub async fn run(config: ExporterConfig, token: CancellationToken) -> anyhow::Result<()> {
    let listener = TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("failed to bind {}", config.listen))?;
    serve(config, listener, token).await
}

/// Run the collector and the metrics endpoint on an already bound listener.
pub async fn serve(
    config: ExporterConfig,
    listener: TcpListener,
    token: CancellationToken,
) -> anyhow::Result<()> {
    let addr = listener.local_addr().context("listener has no local address")?;
    let metrics = PrometheusMetrics::new().context("failed to register metrics")?;
    let source =
        DockerTaskSource::new(config.docker.clone()).context("failed to create docker client")?;
    info!(host = source.host(), "docker task source ready");

    let collector = Collector::new(
        Arc::new(source),
        Arc::new(metrics.clone()),
        config.interval,
    )?;
    let collector_task = collector.spawn(token.child_token());

    let router = MetricsApi::new(Arc::new(metrics)).router();
    info!(%addr, "metrics endpoint listening");

    let served = axum::serve(listener, router)
        .with_graceful_shutdown(token.clone().cancelled_owned())
        .await;
    wind_down(served, &token, collector_task).await?;
    info!("exporter stopped");
    Ok(())
}

/// Stop and join the collector however the server ended, then report the server result.
async fn wind_down(
    served: io::Result<()>,
    token: &CancellationToken,
    collector: JoinHandle<()>,
) -> anyhow::Result<()> {
    token.cancel();
    let joined = collector.await;
    served.context("metrics server failed")?;
    joined.context("collector task panicked")?;
    Ok(())
}
