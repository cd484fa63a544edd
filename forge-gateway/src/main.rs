//! Entry point for the `forge-gateway` HTTP server.

use forge_gateway::routes::create_router;
use forge_service::{Facade, Settings};
use tracing::info;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!(error = %e, "failed to load configuration");
            std::process::exit(1);
        }
    };

    let facade = match Facade::new(&settings).await {
        Ok(facade) => facade,
        Err(e) => {
            tracing::error!(error = %e, "failed to build facade");
            std::process::exit(1);
        }
    };

    let app = create_router(facade);

    let listener = match tokio::net::TcpListener::bind(&settings.http_listen_addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(addr = %settings.http_listen_addr, error = %e, "failed to bind");
            std::process::exit(1);
        }
    };

    info!(addr = %settings.http_listen_addr, "forge-gateway listening");

    if let Err(e) = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await {
        tracing::error!(error = %e, "server error");
        std::process::exit(1);
    }
}

/// Waits for Ctrl-C or, on Unix, SIGTERM. Axum's graceful shutdown then
/// drains in-flight requests before the process exits; detached
/// replenishment tasks are fire-and-forget and do not block it.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to install Ctrl-C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::warn!(error = %e, "failed to install SIGTERM handler"),
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("shutdown signal received, draining in-flight requests");
}
