//! tcpcheckd — the tcpcheck exporter daemon.
//!
//! Probes the configured TCP endpoints every `CHECK_INTERVAL_SECONDS`
//! and serves their reachability on `/metrics` for Prometheus.
//!
//! # Usage
//!
//! ```text
//! CHECK_INTERVAL_SECONDS=15 METRICS_PORT=2112 tcpcheckd --config /config/config.yml
//! ```

mod settings;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tokio::sync::watch;
use tracing::{error, info};

use tcpcheck_core::{DEFAULT_CONFIG_PATH, load_targets};
use tcpcheck_health::{CheckScheduler, TcpProber};
use tcpcheck_metrics::MetricsRegistry;

use crate::settings::Settings;

const DEFAULT_LOG_FILTER: &str = "info,tcpcheckd=debug,tcpcheck=debug";

#[derive(Parser)]
#[command(name = "tcpcheckd", about = "TCP endpoint reachability exporter")]
struct Cli {
    /// YAML file listing the targets to probe.
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Emit logs as JSON lines.
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    exit_code(run(cli).await)
}

/// Log a fatal error once and map it to a non-zero status.
fn exit_code(result: anyhow::Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = ?e, "exporter failed");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    info!("tcpcheck exporter starting");

    let settings = Settings::from_env();
    info!(
        interval_secs = settings.check_interval.as_secs(),
        metrics_port = %settings.metrics_port,
        max_concurrent_probes = ?settings.max_concurrent_probes,
        "settings loaded"
    );

    let targets = load_targets(&cli.config);

    // ── Check loop ─────────────────────────────────────────────

    let registry = MetricsRegistry::new();
    let mut scheduler = CheckScheduler::new(
        targets,
        TcpProber::default(),
        registry.clone(),
        settings.check_interval,
    );
    if let Some(limit) = settings.max_concurrent_probes {
        scheduler = scheduler.with_max_concurrency(limit);
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let scheduler_handle = tokio::spawn(async move {
        scheduler.run(shutdown_rx).await;
    });

    // ── Metrics server ─────────────────────────────────────────

    let addr = settings.metrics_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind metrics server on {addr}"))?;

    info!(%addr, "metrics server starting");
    info!(
        "metrics available at http://localhost:{}/metrics",
        addr.port()
    );

    let router = tcpcheck_api::build_router(registry);
    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            wait_for_signal().await;
            info!("shutdown signal received");
            let _ = shutdown_tx.send(true);
        })
        .await
        .context("metrics server failed")?;

    let _ = scheduler_handle.await;

    info!("tcpcheck exporter stopped");
    Ok(())
}

/// Resolve on Ctrl-C, or SIGTERM on unix.
async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
