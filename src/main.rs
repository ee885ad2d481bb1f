// headshot-forge - Professional headshot generation service backed by Gemini
// Author: kelexine (https://github.com/kelexine)

use anyhow::{bail, Result};
use clap::Parser;
use headshot_forge::cli::Args;
use headshot_forge::config::AppConfig;
use headshot_forge::gemini::{GeminiClient, ModelTransport};
use headshot_forge::server::create_router;
use headshot_forge::utils::logging;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Phase 1: Load configuration, then apply CLI overrides
    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    // Phase 2: Initialize logging
    logging::init(&config.logging)?;
    info!("Starting headshot-forge v{}", env!("CARGO_PKG_VERSION"));

    config.validate()?;

    // Phase 3: Build the upstream client
    let gemini_client = Arc::new(GeminiClient::new(&config.gemini)?);
    info!("Using model {}", gemini_client.model());

    // Phase 3.5: Handle --ping flag
    if args.ping {
        return match gemini_client.probe().await {
            Ok(report) => {
                println!(
                    "Gemini reachable: status {} in {}ms",
                    report.status,
                    report.latency.as_millis()
                );
                Ok(())
            }
            Err(e) => {
                error!("Gemini probe failed: {}", e);
                bail!("connectivity probe failed: {}", e)
            }
        };
    }

    // Phase 4: Build and start HTTP server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let app = create_router(config, gemini_client)?;

    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Phase 5: Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down gracefully");
    Ok(())
}

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
            Ok(mut sigterm) => {
                sigterm.recv().await;
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
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}
