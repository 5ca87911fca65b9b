//! Request handlers
//!
//! Catalog routes proxy the third-party API. Library routes map one-to-one
//! onto library store operations; updates to untracked games answer with
//! `applied: false` rather than an error.

use crate::{AppState, error::ApiError};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use gamelib_catalog::{
    CatalogClient, CatalogPage, CatalogQuery, GameDetails, GameSummary, ListingMode, Pagination,
    Screenshot, TrendingPeriod, is_suggestible,
};
use gamelib_library::{GameStatus, LibraryStats, UserGameRecord};
use gamelib_storage::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, warn};

type AppStateRef<C, S> = State<Arc<AppState<C, S>>>;

pub async fn healthz() -> &'static str {
    "ok"
}

/// Listing filters from the query string
#[derive(Debug, Default, Deserialize)]
pub struct GamesParams {
    pub mode: Option<String>,
    pub q: Option<String>,
    pub period: Option<TrendingPeriod>,
    pub genre: Option<u64>,
    pub platform: Option<u64>,
    pub page: Option<u32>,
}

impl GamesParams {
    /// Searches when `q` is given without a mode, otherwise trending
    pub fn listing_mode(&self) -> Result<ListingMode, ApiError> {
        let default_mode = if self.q.is_some() { "search" } else { "trending" };
        let mode = self.mode.as_deref().unwrap_or(default_mode);

        let listing = match mode {
            "search" => {
                let query = self
                    .q
                    .as_deref()
                    .map(str::trim)
                    .filter(|q| !q.is_empty())
                    .ok_or_else(|| ApiError::BadRequest("search requires q".into()))?;
                ListingMode::Search {
                    query: query.to_string(),
                }
            }
            "trending" => ListingMode::Trending {
                period: self.period.unwrap_or_default(),
            },
            "genre" => ListingMode::Genre {
                genre_id: self
                    .genre
                    .ok_or_else(|| ApiError::BadRequest("genre listing requires genre".into()))?,
            },
            "platform" => ListingMode::Platform {
                platform_id: self.platform.ok_or_else(|| {
                    ApiError::BadRequest("platform listing requires platform".into())
                })?,
            },
            "recent" => ListingMode::Recent,
            "top-rated" => ListingMode::TopRated,
            "popular" => ListingMode::Popular,
            "most-played" => ListingMode::MostPlayed,
            "upcoming" => ListingMode::Upcoming,
            other => {
                return Err(ApiError::BadRequest(format!("unknown listing mode {:?}", other)));
            }
        };

        Ok(listing)
    }
}

#[derive(Debug, Serialize)]
pub struct GamesResponse {
    pub page: CatalogPage,
    pub pagination: Pagination,
}

pub async fn list_games<C, S>(
    State(state): AppStateRef<C, S>,
    Query(params): Query<GamesParams>,
) -> Result<Json<GamesResponse>, ApiError>
where
    C: CatalogClient + 'static,
    S: KeyValueStore + 'static,
{
    let query = CatalogQuery::new(params.listing_mode()?)
        .with_page(params.page.unwrap_or(1))
        .with_page_size(state.config.catalog.page_size);

    let page = state.catalog.list(&query).await?;
    let pagination = page.pagination();

    Ok(Json(GamesResponse { page, pagination }))
}

pub async fn game_details<C, S>(
    State(state): AppStateRef<C, S>,
    Path(id): Path<String>,
) -> Result<Json<GameDetails>, ApiError>
where
    C: CatalogClient + 'static,
    S: KeyValueStore + 'static,
{
    // Any failure to fetch a single game is reported as a missing game
    match state.catalog.details(&id).await {
        Ok(details) => Ok(Json(details)),
        Err(e) if e.is_not_found() => {
            debug!("Catalog has no game {}", id);
            Err(ApiError::NotFound(format!("game {}", id)))
        }
        Err(e) => {
            warn!("Details for {} unavailable: {}", id, e);
            Err(ApiError::NotFound(format!("game {}", id)))
        }
    }
}

pub async fn game_screenshots<C, S>(
    State(state): AppStateRef<C, S>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Screenshot>>, ApiError>
where
    C: CatalogClient + 'static,
    S: KeyValueStore + 'static,
{
    Ok(Json(state.catalog.screenshots(&id).await?))
}

#[derive(Debug, Deserialize)]
pub struct SuggestionParams {
    #[serde(default)]
    pub q: String,
}

pub async fn suggestions<C, S>(
    State(state): AppStateRef<C, S>,
    Query(params): Query<SuggestionParams>,
) -> Json<Vec<GameSummary>>
where
    C: CatalogClient + 'static,
    S: KeyValueStore + 'static,
{
    let search = &state.config.search;
    if !is_suggestible(&params.q, search.min_query_len) {
        return Json(Vec::new());
    }

    let limit = search.suggestion_limit;
    match state.catalog.suggestions(&params.q, limit).await {
        Ok(games) => Json(games),
        Err(e) => {
            error!("Error fetching suggestions: {}", e);
            Json(Vec::new())
        }
    }
}

fn sorted(mut records: Vec<UserGameRecord>) -> Vec<UserGameRecord> {
    records.sort_by(|a, b| a.game_id.cmp(&b.game_id));
    records
}

pub async fn library<C, S>(State(state): AppStateRef<C, S>) -> Json<Vec<UserGameRecord>>
where
    C: CatalogClient + 'static,
    S: KeyValueStore + 'static,
{
    let library = state.library.lock().await;
    Json(sorted(library.library().values().cloned().collect()))
}

pub async fn library_stats<C, S>(State(state): AppStateRef<C, S>) -> Json<LibraryStats>
where
    C: CatalogClient + 'static,
    S: KeyValueStore + 'static,
{
    Json(state.library.lock().await.stats())
}

pub async fn favorites<C, S>(State(state): AppStateRef<C, S>) -> Json<Vec<UserGameRecord>>
where
    C: CatalogClient + 'static,
    S: KeyValueStore + 'static,
{
    Json(sorted(state.library.lock().await.get_favorites()))
}

pub async fn games_by_status<C, S>(
    State(state): AppStateRef<C, S>,
    Path(status): Path<GameStatus>,
) -> Json<Vec<UserGameRecord>>
where
    C: CatalogClient + 'static,
    S: KeyValueStore + 'static,
{
    Json(sorted(state.library.lock().await.get_games_by_status(status)))
}

pub async fn get_record<C, S>(
    State(state): AppStateRef<C, S>,
    Path(id): Path<String>,
) -> Result<Json<UserGameRecord>, ApiError>
where
    C: CatalogClient + 'static,
    S: KeyValueStore + 'static,
{
    state
        .library
        .lock()
        .await
        .get_game_data(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("game {} is not in the library", id)))
}

/// Result of a library mutation
#[derive(Debug, Serialize, Deserialize)]
pub struct MutationResponse {
    pub applied: bool,
    pub record: Option<UserGameRecord>,
}

#[derive(Debug, Deserialize)]
pub struct StatusBody {
    pub status: GameStatus,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressBody {
    pub progress: u8,
    pub hours_played: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct RatingBody {
    pub rating: u8,
}

pub async fn add_game<C, S>(
    State(state): AppStateRef<C, S>,
    Path(id): Path<String>,
    Json(body): Json<StatusBody>,
) -> Json<MutationResponse>
where
    C: CatalogClient + 'static,
    S: KeyValueStore + 'static,
{
    let mut library = state.library.lock().await;
    library.add_game(&id, body.status);

    Json(MutationResponse {
        applied: true,
        record: library.get_game_data(&id).cloned(),
    })
}

pub async fn remove_game<C, S>(
    State(state): AppStateRef<C, S>,
    Path(id): Path<String>,
) -> Json<MutationResponse>
where
    C: CatalogClient + 'static,
    S: KeyValueStore + 'static,
{
    let applied = state.library.lock().await.remove_game(&id);
    Json(MutationResponse {
        applied,
        record: None,
    })
}

pub async fn update_status<C, S>(
    State(state): AppStateRef<C, S>,
    Path(id): Path<String>,
    Json(body): Json<StatusBody>,
) -> Json<MutationResponse>
where
    C: CatalogClient + 'static,
    S: KeyValueStore + 'static,
{
    let mut library = state.library.lock().await;
    let applied = library.update_game_status(&id, body.status);

    Json(MutationResponse {
        applied,
        record: library.get_game_data(&id).cloned(),
    })
}

pub async fn update_progress<C, S>(
    State(state): AppStateRef<C, S>,
    Path(id): Path<String>,
    Json(body): Json<ProgressBody>,
) -> Json<MutationResponse>
where
    C: CatalogClient + 'static,
    S: KeyValueStore + 'static,
{
    let mut library = state.library.lock().await;
    let applied = library.update_progress(&id, body.progress, body.hours_played);

    Json(MutationResponse {
        applied,
        record: library.get_game_data(&id).cloned(),
    })
}

pub async fn toggle_favorite<C, S>(
    State(state): AppStateRef<C, S>,
    Path(id): Path<String>,
) -> Json<MutationResponse>
where
    C: CatalogClient + 'static,
    S: KeyValueStore + 'static,
{
    let mut library = state.library.lock().await;
    library.toggle_favorite(&id);

    Json(MutationResponse {
        applied: true,
        record: library.get_game_data(&id).cloned(),
    })
}

pub async fn rate_game<C, S>(
    State(state): AppStateRef<C, S>,
    Path(id): Path<String>,
    Json(body): Json<RatingBody>,
) -> Json<MutationResponse>
where
    C: CatalogClient + 'static,
    S: KeyValueStore + 'static,
{
    let mut library = state.library.lock().await;
    let applied = library.rate_game(&id, body.rating);

    Json(MutationResponse {
        applied,
        record: library.get_game_data(&id).cloned(),
    })
}

#[derive(Debug, Deserialize)]
pub struct SearchBody {
    pub query: String,
}

pub async fn recent_searches<C, S>(State(state): AppStateRef<C, S>) -> Json<Vec<String>>
where
    C: CatalogClient + 'static,
    S: KeyValueStore + 'static,
{
    Json(state.recent.lock().await.entries().to_vec())
}

pub async fn record_search<C, S>(
    State(state): AppStateRef<C, S>,
    Json(body): Json<SearchBody>,
) -> Result<(StatusCode, Json<Vec<String>>), ApiError>
where
    C: CatalogClient + 'static,
    S: KeyValueStore + 'static,
{
    let mut recent = state.recent.lock().await;
    if !recent.record(&body.query) {
        return Err(ApiError::BadRequest("query is blank".into()));
    }

    Ok((StatusCode::CREATED, Json(recent.entries().to_vec())))
}
