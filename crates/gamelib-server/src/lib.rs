//! gamelib HTTP service
//!
//! Wires one session's library store, search history and catalog client into
//! a JSON API. The library is opened once at startup and shared by handle.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::{get, patch, post},
};
use gamelib_catalog::{CatalogClient, RawgClient};
use gamelib_config::GamelibConfig;
use gamelib_storage::{FileStore, KeyValueStore};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

pub mod error;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

/// Build the API router over `state`
pub fn router<C, S>(state: Arc<AppState<C, S>>) -> Router
where
    C: CatalogClient + 'static,
    S: KeyValueStore + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/healthz", get(routes::healthz))
        .route("/api/games", get(routes::list_games::<C, S>))
        .route("/api/games/:id", get(routes::game_details::<C, S>))
        .route(
            "/api/games/:id/screenshots",
            get(routes::game_screenshots::<C, S>),
        )
        .route("/api/suggestions", get(routes::suggestions::<C, S>))
        .route("/api/library", get(routes::library::<C, S>))
        .route("/api/library-views/stats", get(routes::library_stats::<C, S>))
        .route(
            "/api/library-views/favorites",
            get(routes::favorites::<C, S>),
        )
        .route(
            "/api/library-views/status/:status",
            get(routes::games_by_status::<C, S>),
        )
        .route(
            "/api/library/:id",
            get(routes::get_record::<C, S>)
                .put(routes::add_game::<C, S>)
                .delete(routes::remove_game::<C, S>),
        )
        .route(
            "/api/library/:id/status",
            patch(routes::update_status::<C, S>),
        )
        .route(
            "/api/library/:id/progress",
            patch(routes::update_progress::<C, S>),
        )
        .route(
            "/api/library/:id/favorite",
            post(routes::toggle_favorite::<C, S>),
        )
        .route("/api/library/:id/rating", patch(routes::rate_game::<C, S>))
        .route(
            "/api/recent-searches",
            get(routes::recent_searches::<C, S>).post(routes::record_search::<C, S>),
        )
        .layer(cors)
        .with_state(state)
}

/// Open session state from `config` and serve until shutdown
pub async fn run(config: GamelibConfig) -> Result<()> {
    info!("Opening data directory {}", config.storage.data_dir.display());
    let backend = FileStore::open(&config.storage.data_dir)
        .with_context(|| format!("Failed to open {}", config.storage.data_dir.display()))?;

    let catalog = RawgClient::from_config(&config.catalog).context("Failed to create catalog client")?;

    let address = config.server.bind.clone();
    let state = AppState::new(config, catalog, backend).context("Invalid configuration")?;
    info!(
        "Library loaded with {} games",
        state.library.lock().await.len()
    );

    let app = router(state);

    info!("Binding to {}", address);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!("Server running on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
