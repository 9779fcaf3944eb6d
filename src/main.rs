use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use block_server::config;
use block_server::{Acceptor, HandlerRegistry, RoutingTable};

/// Block-configured HTTP server.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path to the server configuration file.
    config: std::path::PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "block_server=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    tracing::info!(config = %args.config.display(), "block-server starting");

    let (port, routes) = match load_config(&args.config) {
        Ok(loaded) => loaded,
        Err(error) => {
            tracing::error!(%error, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    for entry in routes.entries() {
        tracing::info!(uri = %entry.uri_prefix, handler = %entry.handler_name, "route configured");
    }

    let registry = Arc::new(HandlerRegistry::with_defaults());
    let acceptor = match Acceptor::bind(port, Arc::new(routes), registry).await {
        Ok(acceptor) => acceptor,
        Err(error) => {
            tracing::error!(%error, "failed to start server");
            return ExitCode::FAILURE;
        }
    };

    tokio::select! {
        _ = acceptor.run() => {}
        _ = shutdown_signal() => {
            tracing::info!("shutdown signal received, exiting");
        }
    }
    ExitCode::SUCCESS
}

fn load_config(path: &std::path::Path) -> Result<(u16, RoutingTable), config::ConfigError> {
    let text = std::fs::read_to_string(path)?;
    let tree = config::parse_config(&text)?;
    let port = config::find_listen_port(&tree)?;
    let entries = config::extract_route_entries(&tree)?;
    Ok((port, RoutingTable::build(entries)))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!(%error, "failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!(%error, "failed to install SIGTERM handler");
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
