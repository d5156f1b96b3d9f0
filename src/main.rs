//! PWA Cache - An offline-first, cache-first proxy
//!
//! Runs the worker lifecycle against the upstream, then serves every
//! request cache first.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pwa_cache::api::{create_router, AppState};
use pwa_cache::config::Config;

/// Main entry point for the proxy.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Open cache storage and wire the worker to the upstream
/// 4. Run install then activate
/// 5. Serve on the configured port until SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pwa_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting PWA cache proxy");

    let config = Config::from_env();
    info!(
        "Configuration loaded: cache_name={}, manifest={} path(s), upstream={}, port={}",
        config.cache_name,
        config.manifest.len(),
        config.upstream_url,
        config.server_port
    );

    let state = AppState::from_config(&config)
        .await
        .context("failed to initialise worker")?;

    // A failed lifecycle leaves the worker redundant; requests then go
    // straight to the upstream.
    match state.registration.run_lifecycle().await {
        Ok(report) => info!(
            "Worker active on cache {}, removed {} stale cache(s)",
            config.cache_name,
            report.deleted.len()
        ),
        Err(e) => error!("Worker lifecycle failed, proxying without cache: {}", e),
    }

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
