use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use hotspot_admin_server::{AppState, GatewayConfig, routes};
use salvo::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Admin gateway for RouterOS hotspot users
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Optional TOML configuration file; environment variables override it
    #[arg(short, long, env = "HOTSPOT_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before anything reads the environment
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    info!("Starting Hotspot Admin Gateway...");

    let config = GatewayConfig::load(args.config.as_deref())?;
    info!(
        "router {}://{} as {}, reports in {}",
        config.router.scheme,
        config.router.host,
        config.router.username,
        config.report_dir.display()
    );

    let state = AppState::from_config(&config)?;
    let addr = config.socket_addr()?;

    let acceptor = TcpListener::new(addr).bind().await;
    info!("Admin Gateway listening on http://{}", addr);

    Server::new(acceptor).serve(routes::service(state)).await;

    Ok(())
}
