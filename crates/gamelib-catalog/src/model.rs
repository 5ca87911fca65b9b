//! Normalized catalog records

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Cover used when the catalog has no image for a game
pub const PLACEHOLDER_COVER: &str = "/placeholder.svg?height=400&width=300";

/// A game as shown in listings and suggestions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSummary {
    pub id: String,
    pub title: String,
    pub cover: String,
    /// Aggregate user rating
    pub rating: f64,
    /// Number of ratings behind `rating`
    pub reviews: u64,
    pub genres: Vec<String>,
    pub released: Option<NaiveDate>,
    pub platforms: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub developers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub publishers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub esrb_rating: Option<String>,
}

impl GameSummary {
    /// Minimal summary with placeholder cover and no metadata
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            cover: PLACEHOLDER_COVER.to_string(),
            rating: 0.0,
            reviews: 0,
            genres: Vec::new(),
            released: None,
            platforms: Vec::new(),
            developers: Vec::new(),
            publishers: Vec::new(),
            esrb_rating: None,
        }
    }
}

/// Full record for a game detail view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameDetails {
    #[serde(flatten)]
    pub summary: GameSummary,
    pub description: Option<String>,
    pub website: Option<String>,
    pub metacritic: Option<u32>,
    /// Average playtime in hours
    pub playtime: Option<u32>,
}

/// Game screenshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Screenshot {
    pub id: u64,
    pub image: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

/// One page of a catalog listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogPage {
    /// Total matches across all pages
    pub count: u64,
    pub page: u32,
    pub page_size: u32,
    pub results: Vec<GameSummary>,
}

impl CatalogPage {
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page, self.count, self.page_size)
    }
}

/// Page navigation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub has_previous: bool,
    pub has_next: bool,
}

impl Pagination {
    pub fn new(current_page: u32, count: u64, page_size: u32) -> Self {
        let total_pages = if page_size == 0 {
            1
        } else {
            count.div_ceil(u64::from(page_size)).clamp(1, u64::from(u32::MAX)) as u32
        };
        let current_page = current_page.max(1);

        Self {
            current_page,
            total_pages,
            has_previous: current_page > 1,
            has_next: current_page < total_pages,
        }
    }
}
