//! Flight API
//!
//! Entry point: loads configuration, installs metrics and tracing, and serves
//! the router until SIGINT/SIGTERM.

use flight_api::config::Config;
use flight_api::observability::metrics::init_metrics_recorder;
use flight_api::routes::{self, AppState};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flight_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Flight API");

    // Load configuration; missing domain/audience is fatal
    let config = Config::from_env().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!(
        domain = %config.domain,
        audience = %config.audience,
        bind_address = %config.bind_address,
        drain_seconds = config.drain_seconds,
        "Configuration loaded successfully"
    );

    let metrics_handle = init_metrics_recorder().map_err(|e| {
        error!("Failed to initialize metrics: {}", e);
        e
    })?;

    let addr: SocketAddr = config.bind_address.parse().map_err(|e| {
        error!("Invalid bind address: {}", e);
        e
    })?;
    let drain_seconds = config.drain_seconds;

    let state = Arc::new(AppState::new(config));
    let app = routes::build_routes(state, metrics_handle);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Flight API listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(drain_seconds))
        .await?;

    info!("Flight API shutdown complete");

    Ok(())
}

/// Resolves once SIGINT or SIGTERM arrives, then holds the server open for
/// `drain_seconds` so in-flight requests can finish.
async fn shutdown_signal(drain_seconds: u64) {
    let received = wait_for_signal().await;
    info!(signal = received, "Shutdown requested");

    if drain_seconds == 0 {
        return;
    }

    warn!(drain_seconds, "Draining in-flight requests before exit");
    tokio::time::sleep(Duration::from_secs(drain_seconds)).await;
}

/// Name of the first termination signal received.
async fn wait_for_signal() -> &'static str {
    let interrupt = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for SIGINT: {}", e);
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
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = interrupt => "SIGINT",
        _ = terminate => "SIGTERM",
    }
}
