//! Game catalog client for gamelib
//!
//! Fetches paginated game listings, details and search suggestions from a
//! RAWG-compatible HTTP API and normalizes them into catalog summaries.

mod model;
mod query;
mod rawg;

pub use model::{CatalogPage, GameDetails, GameSummary, PLACEHOLDER_COVER, Pagination, Screenshot};
pub use query::{CatalogQuery, DEFAULT_PAGE_SIZE, ListingMode, TrendingPeriod};
pub use rawg::RawgClient;

use std::future::Future;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog returned {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Invalid catalog base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Invalid catalog response: {0}")]
    InvalidResponse(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl CatalogError {
    /// Whether the catalog reported the resource as missing
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::Status { status: 404, .. })
    }
}

/// Source of catalog data
pub trait CatalogClient: Send + Sync {
    /// Fetch one page of a listing
    fn list(
        &self,
        query: &CatalogQuery,
    ) -> impl Future<Output = Result<CatalogPage, CatalogError>> + Send;

    /// Fetch full details for one game
    fn details(&self, id: &str) -> impl Future<Output = Result<GameDetails, CatalogError>> + Send;

    /// Fetch screenshots for one game
    fn screenshots(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Vec<Screenshot>, CatalogError>> + Send;

    /// Fetch at most `limit` games matching a partial query
    fn suggestions(
        &self,
        query: &str,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<GameSummary>, CatalogError>> + Send;
}

/// Whether `query` is long enough to look up suggestions for
pub fn is_suggestible(query: &str, min_len: usize) -> bool {
    query.trim().chars().count() >= min_len
}
