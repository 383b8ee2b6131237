//! Trade Lifecycle Binary
//!
//! Serves the trade lifecycle engine over HTTP.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin trade-lifecycle
//! ```
//!
//! # Environment Variables
//!
//! - `TRADE_LIFECYCLE_CONFIG`: Path to the YAML config (default: config.yaml)
//! - `RUST_LOG`: Log filter, overrides `observability.logging.level`

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::signal;
use trade_lifecycle::config::{CONFIG_PATH_ENV, Config, load_config};
use trade_lifecycle::infrastructure::http::create_router;
use trade_lifecycle::telemetry::init_tracing;
use trade_lifecycle::{ConfiguredLedger, Container, TracingEventPublisher};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    let config_path = std::env::var(CONFIG_PATH_ENV).ok();
    let config = load_config(config_path.as_deref()).context("failed to load configuration")?;
    init_tracing(&config.observability.logging).context("failed to initialize tracing")?;

    tracing::info!("Starting trade lifecycle service");
    log_config(&config);

    let ledger = ConfiguredLedger::from_config(&config.ledger)
        .await
        .context("failed to open ledger")?;
    tracing::info!(backend = %ledger.backend(), "Ledger ready");

    let container = Container::new(Arc::new(ledger), Arc::new(TracingEventPublisher));

    if config.ledger.seed_demo_trade {
        container
            .seed_demo_trade()
            .await
            .context("failed to seed demo trade")?;
    }

    let app = create_router(container.app_state(env!("CARGO_PKG_VERSION")));
    let http_addr = config.server.listen_addr();
    let listener = TcpListener::bind(&http_addr)
        .await
        .with_context(|| format!("failed to bind {http_addr}"))?;

    tracing::info!(%http_addr, "HTTP server starting");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health");
    tracing::info!("  POST /api/v1/invoke");
    tracing::info!("  POST /api/v1/trades");
    tracing::info!("  GET  /api/v1/trades/{{trade_id}}");
    tracing::info!("  GET  /api/v1/trades/{{trade_id}}/status");
    tracing::info!("  POST /api/v1/trades/{{trade_id}}/loc");
    tracing::info!("  POST /api/v1/trades/{{trade_id}}/loc/approval");
    tracing::info!("  POST /api/v1/trades/{{trade_id}}/shipment");
    tracing::info!("  POST /api/v1/trades/{{trade_id}}/delivery");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    tracing::info!("Trade lifecycle service stopped");
    Ok(())
}

/// Load .env file from current or ancestor directories.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Log the loaded configuration.
fn log_config(config: &Config) {
    tracing::info!(
        http_port = config.server.http_port,
        bind_address = %config.server.bind_address,
        ledger_backend = %config.ledger.backend,
        ledger_path = %config.ledger.path,
        seed_demo_trade = config.ledger.seed_demo_trade,
        log_format = %config.observability.logging.format,
        "Configuration loaded"
    );
}

/// Wait for shutdown signal (SIGTERM or SIGINT).
///
/// If a handler cannot be installed that signal is ignored and the other
/// still triggers shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }
}
