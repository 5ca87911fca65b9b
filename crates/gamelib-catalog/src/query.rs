//! Listing requests and their query parameters

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Window for trending listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TrendingPeriod {
    Day,
    #[default]
    Week,
    Month,
}

impl TrendingPeriod {
    /// First day of the window ending `today`
    fn start(&self, today: NaiveDate) -> NaiveDate {
        match self {
            TrendingPeriod::Day => today.checked_sub_days(Days::new(1)),
            TrendingPeriod::Week => today.checked_sub_days(Days::new(7)),
            TrendingPeriod::Month => today.checked_sub_months(Months::new(1)),
        }
        .unwrap_or(today)
    }
}

/// What kind of listing to fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingMode {
    /// Free-text search
    Search { query: String },
    /// Most added within a recent window
    Trending { period: TrendingPeriod },
    Genre { genre_id: u64 },
    /// Best rated on one platform
    Platform { platform_id: u64 },
    /// Released in the last month, newest first
    Recent,
    /// Metacritic 80 and above
    TopRated,
    /// By rating, then by number of ratings
    Popular,
    /// Most added over the last year
    MostPlayed,
    /// Releasing in the next six months
    Upcoming,
}

/// A paginated listing request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    pub mode: ListingMode,
    pub page: u32,
    pub page_size: u32,
}

impl CatalogQuery {
    pub fn new(mode: ListingMode) -> Self {
        Self {
            mode,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn search(query: impl Into<String>) -> Self {
        Self::new(ListingMode::Search {
            query: query.into(),
        })
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Query parameters for this request, with date windows ending `today`
    pub fn params(&self, today: NaiveDate) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();

        match &self.mode {
            ListingMode::Search { query } => {
                params.push(("search", query.clone()));
            }
            ListingMode::Trending { period } => {
                params.push(("dates", date_range(period.start(today), today)));
                params.push(("ordering", "-added".to_string()));
            }
            ListingMode::Genre { genre_id } => {
                params.push(("genres", genre_id.to_string()));
            }
            ListingMode::Platform { platform_id } => {
                params.push(("platforms", platform_id.to_string()));
                params.push(("ordering", "-rating".to_string()));
            }
            ListingMode::Recent => {
                params.push((
                    "dates",
                    date_range(TrendingPeriod::Month.start(today), today),
                ));
                params.push(("ordering", "-released".to_string()));
            }
            ListingMode::TopRated => {
                params.push(("ordering", "-metacritic".to_string()));
                params.push(("metacritic", "80,100".to_string()));
            }
            ListingMode::Popular => {
                params.push(("ordering", "-rating,-ratings_count".to_string()));
            }
            ListingMode::MostPlayed => {
                let last_year = today.checked_sub_months(Months::new(12)).unwrap_or(today);
                params.push(("ordering", "-added".to_string()));
                params.push(("dates", date_range(last_year, today)));
            }
            ListingMode::Upcoming => {
                let horizon = today.checked_add_months(Months::new(6)).unwrap_or(today);
                params.push(("dates", date_range(today, horizon)));
                params.push(("ordering", "released".to_string()));
            }
        }

        params.push(("page", self.page.to_string()));
        params.push(("page_size", self.page_size.to_string()));
        params
    }
}

fn date_range(from: NaiveDate, to: NaiveDate) -> String {
    format!("{},{}", from.format("%Y-%m-%d"), to.format("%Y-%m-%d"))
}
