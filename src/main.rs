//! Watchlist gateway.
//!
//! ```text
//!     Client ──▶ /watchlist ──▶ request parser ──▶ watchlist service ──▶ document store
//!            ◀── JSON / text ◀── response ◀──────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;

use watchlist_gateway::config::{load_config, GatewayConfig};
use watchlist_gateway::observability::logging;

#[derive(Parser)]
#[command(name = "watchlist-gateway")]
#[command(about = "HTTP gateway for watchlists stored in a remote JSON document store", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability.log_level);

    tracing::info!("watchlist-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        store = %config.store.base_url,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    watchlist_gateway::lifecycle::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
