//! gamelib server
//!
//! Serves the catalog proxy and the personal library API for one user session.
//!
//! Usage: `gamelib-server [config.toml]`

use anyhow::{Context, Result};
use gamelib_config::{DEFAULT_CONFIG_FILE, GamelibConfig};
use std::path::PathBuf;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging();

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

    let config = GamelibConfig::load_layered(Some(&config_path))
        .with_context(|| format!("Failed to load configuration from {}", config_path.display()))?;

    info!("gamelib server starting...");
    gamelib_server::run(config).await
}

fn setup_logging() {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();
}
