use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use swarm_exporter::{Cli, ExporterConfig};
use swarm_observe::init_logger;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1) Config
    let config = ExporterConfig::try_from(Cli::parse())?;

    // 2) Logger
    init_logger(&config.logger)?;
    info!(
        port = config.listen.port(),
        interval_ms = config.interval.as_millis() as u64,
        docker_host = %config.docker.host,
        "swarm exporter starting"
    );

    // 3) Shutdown on signal
    let token = CancellationToken::new();
    let on_signal = token.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("shutting down...");
        on_signal.cancel();
    });

    // 4) Collector + /metrics
    swarm_exporter::run(config, token).await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
