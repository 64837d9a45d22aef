//! press-ledger HTTP service.
//!
//! Reads its configuration from `PRESS_LEDGER_CONFIG` (default
//! `./config/press-ledger.yaml`), opens the ledger and serves the JSON API.
//! Log verbosity follows `RUST_LOG`, defaulting to `info`.

use press_ledger::api::{AppState, create_router};
use press_ledger::config::ConfigLoader;
use press_ledger::store::Ledger;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Waits for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = ConfigLoader::from_env()?.into_config();
    info!(
        bind_address = %config.server.bind_address,
        backend = ?config.storage.backend,
        advance_cutoff = ?config.payroll.advance_cutoff,
        "Configuration loaded"
    );

    let ledger = Ledger::from_config(&config)?;
    let router = create_router(AppState::new(ledger));

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    info!(address = %listener.local_addr()?, "press-ledger listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("press-ledger stopped");
    Ok(())
}
