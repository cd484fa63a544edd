//! Entry point for the `forge-rpc` binary RPC server.

use forge_rpc::proto::code_interpreter_service_server::CodeInterpreterServiceServer;
use forge_rpc::CodeInterpreterServiceImpl;
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

    let addr = match settings.rpc_listen_addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!(addr = %settings.rpc_listen_addr, error = %e, "invalid listen address");
            std::process::exit(1);
        }
    };

    let service = CodeInterpreterServiceImpl::new(facade);

    info!(addr = %settings.rpc_listen_addr, "forge-rpc listening");

    if let Err(e) = tonic::transport::Server::builder()
        .add_service(CodeInterpreterServiceServer::new(service))
        .serve_with_shutdown(addr, shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "server error");
        std::process::exit(1);
    }
}

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
