//! Main entry point for the `VanEdu` admin API server

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing::{error, info};
use vanedu_api::build_router;
use vanedu_core::{Config, context_error, context_error::Result, init_logging};
use vanedu_store::Store;

/// Command line interface for the API server
#[derive(Parser)]
#[command(
    name = "vanedu-api-server",
    version = env!("CARGO_PKG_VERSION"),
    about = "REST API server for the VanEdu admin dashboard"
)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE", env = "VANEDU_CONFIG")]
    config: Option<PathBuf>,

    /// Host to bind to, overrides `server.host`
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on, overrides `server.port`
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (for development convenience)
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Note: .env file not loaded: {e}");
    }

    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())
        .map_err(|e| context_error!("Failed to load configuration: {}", e))?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    init_logging(&config.logging)?;

    info!("╔══════════════════════════════════════════════════════════╗");
    info!(
        "║           VanEdu Admin API Server v{}                 ║",
        env!("CARGO_PKG_VERSION")
    );
    info!("╚══════════════════════════════════════════════════════════╝");
    info!(
        "🚀 Starting server on {}:{}",
        config.server.host, config.server.port
    );

    let store = Store::from_config(&config.data);
    match store.counts().await {
        Ok(counts) => info!(
            users = counts.users,
            categories = counts.categories,
            plans = counts.plans,
            payments = counts.payments,
            "✅ Data source ready"
        ),
        Err(e) => {
            error!("Data source check failed: {}", e);
            return Err(context_error!("Data source check failed: {}", e));
        }
    }

    info!("🛠️  Building application routes...");
    let app = build_router(config.clone(), store)?;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| context_error!("Invalid server address: {}", e))?;

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| context_error!("Failed to bind to {}: {}", addr, e))?;

    info!("╔══════════════════════════════════════════════════════════╗");
    info!("║                     SERVER READY                         ║");
    info!("╟──────────────────────────────────────────────────────────╢");
    info!("║ 🌐 API:     http://{}/api", addr);
    info!("║ 💚 Health:  http://{}/health", addr);
    info!("╚══════════════════════════════════════════════════════════╝");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| context_error!("Server error: {}", e))?;

    info!("👋 Server shutdown complete");
    Ok(())
}

/// Handle graceful shutdown signals
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
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
        () = ctrl_c => {
            info!("Received Ctrl+C, shutting down gracefully...");
        },
        () = terminate => {
            info!("Received terminate signal, shutting down gracefully...");
        },
    }
}
