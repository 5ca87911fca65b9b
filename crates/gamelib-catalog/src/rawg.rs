//! RAWG-compatible HTTP client

use crate::{
    CatalogClient, CatalogError, CatalogPage, CatalogQuery, GameDetails, GameSummary,
    PLACEHOLDER_COVER, Screenshot,
};
use chrono::{NaiveDate, Utc};
use gamelib_config::CatalogConfig;
use serde::Deserialize;
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Paginated response envelope
#[derive(Debug, Deserialize)]
pub(crate) struct RawgResponse<T> {
    pub count: u64,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Named {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PlatformEntry {
    pub platform: Named,
}

/// Game as returned by listing and detail endpoints
#[derive(Debug, Deserialize)]
pub(crate) struct RawgGame {
    pub id: u64,
    pub name: String,
    pub background_image: Option<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub ratings_count: u64,
    pub genres: Option<Vec<Named>>,
    pub released: Option<String>,
    pub platforms: Option<Vec<PlatformEntry>>,
    pub developers: Option<Vec<Named>>,
    pub publishers: Option<Vec<Named>>,
    pub esrb_rating: Option<Named>,
    pub metacritic: Option<u32>,
    pub playtime: Option<u32>,
    pub description_raw: Option<String>,
    pub website: Option<String>,
}

fn names(items: Option<Vec<Named>>) -> Vec<String> {
    items
        .unwrap_or_default()
        .into_iter()
        .map(|item| item.name)
        .collect()
}

impl RawgGame {
    fn into_details(self) -> GameDetails {
        let description = self.description_raw.clone().filter(|d| !d.is_empty());
        let website = self.website.clone().filter(|w| !w.is_empty());
        let metacritic = self.metacritic;
        let playtime = self.playtime;

        GameDetails {
            summary: self.into(),
            description,
            website,
            metacritic,
            playtime,
        }
    }
}

impl From<RawgGame> for GameSummary {
    fn from(game: RawgGame) -> Self {
        let released = game
            .released
            .as_deref()
            .and_then(|date| NaiveDate::parse_from_str(date, "%Y-%m-%d").ok());

        GameSummary {
            id: game.id.to_string(),
            title: game.name,
            cover: game
                .background_image
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| PLACEHOLDER_COVER.to_string()),
            rating: game.rating,
            reviews: game.ratings_count,
            genres: names(game.genres),
            released,
            platforms: game
                .platforms
                .unwrap_or_default()
                .into_iter()
                .map(|entry| entry.platform.name)
                .collect(),
            developers: names(game.developers),
            publishers: names(game.publishers),
            esrb_rating: game.esrb_rating.map(|esrb| esrb.name),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawgScreenshot {
    id: u64,
    image: String,
    width: Option<u32>,
    height: Option<u32>,
}

/// Catalog client for the RAWG games API
#[derive(Debug)]
pub struct RawgClient {
    base_url: Url,
    api_key: String,
    client: reqwest::Client,
}

impl RawgClient {
    /// Create a new client
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, CatalogError> {
        let base_url = base_url.into();
        let parsed = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| CatalogError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;
        if parsed.cannot_be_a_base() {
            return Err(CatalogError::InvalidBaseUrl(base_url));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(format!("gamelib/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            base_url: parsed,
            api_key: api_key.into(),
            client,
        })
    }

    pub fn from_config(config: &CatalogConfig) -> Result<Self, CatalogError> {
        if config.api_key.is_empty() {
            tracing::warn!("No catalog API key configured, requests may be rejected");
        }

        Self::new(
            config.base_url.clone(),
            config.api_key.clone(),
            config.timeout(),
        )
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Endpoint URL below the base; each segment is percent-encoded whole,
    /// so ids cannot escape into other endpoints
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        params: &[(&str, String)],
    ) -> Result<T, CatalogError> {
        tracing::debug!("Fetching {} {:?}", url, params);

        let response = self
            .client
            .get(url.clone())
            .query(&[("key", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CatalogError::Status {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| CatalogError::InvalidResponse(e.to_string()))
    }

    /// Fetch a listing with date windows ending `today`
    pub async fn list_on(
        &self,
        query: &CatalogQuery,
        today: NaiveDate,
    ) -> Result<CatalogPage, CatalogError> {
        let url = self.url(&["games"]);
        let response: RawgResponse<RawgGame> = self.get_json(url, &query.params(today)).await?;

        Ok(CatalogPage {
            count: response.count,
            page: query.page,
            page_size: query.page_size,
            results: response.results.into_iter().map(GameSummary::from).collect(),
        })
    }
}

impl CatalogClient for RawgClient {
    async fn list(&self, query: &CatalogQuery) -> Result<CatalogPage, CatalogError> {
        self.list_on(query, Utc::now().date_naive()).await
    }

    async fn details(&self, id: &str) -> Result<GameDetails, CatalogError> {
        let url = self.url(&["games", id]);
        let game: RawgGame = self.get_json(url, &[]).await?;
        Ok(game.into_details())
    }

    async fn screenshots(&self, id: &str) -> Result<Vec<Screenshot>, CatalogError> {
        let url = self.url(&["games", id, "screenshots"]);
        let response: RawgResponse<RawgScreenshot> = self.get_json(url, &[]).await?;

        Ok(response
            .results
            .into_iter()
            .map(|shot| Screenshot {
                id: shot.id,
                image: shot.image,
                width: shot.width,
                height: shot.height,
            })
            .collect())
    }

    async fn suggestions(&self, query: &str, limit: usize) -> Result<Vec<GameSummary>, CatalogError> {
        // Minimum query length is the caller's policy; only blanks are skipped
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let url = self.url(&["games"]);
        let params = [
            ("search", query.to_string()),
            ("page_size", limit.to_string()),
        ];

        match self.get_json::<RawgResponse<RawgGame>>(url, &params).await {
            Ok(response) => Ok(response
                .results
                .into_iter()
                .take(limit)
                .map(GameSummary::from)
                .collect()),
            Err(CatalogError::Status { status, .. }) => {
                tracing::debug!("Suggestion lookup for {:?} returned {}", query, status);
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"{
        "count": 2,
        "next": "https://api.rawg.io/api/games?page=2",
        "previous": null,
        "results": [
            {
                "id": 3498,
                "name": "Grand Theft Auto V",
                "background_image": "https://media.rawg.io/gta5.jpg",
                "rating": 4.47,
                "ratings_count": 6800,
                "released": "2013-09-17",
                "genres": [{"id": 4, "name": "Action"}, {"id": 3, "name": "Adventure"}],
                "platforms": [
                    {"platform": {"id": 4, "name": "PC"}},
                    {"platform": {"id": 187, "name": "PlayStation 5"}}
                ],
                "esrb_rating": {"id": 4, "name": "Mature"}
            },
            {
                "id": 1,
                "name": "Untitled",
                "background_image": null,
                "released": null,
                "genres": [],
                "platforms": null
            }
        ]
    }"#;

    #[test]
    fn test_listing_conversion() {
        let response: RawgResponse<RawgGame> = serde_json::from_str(LISTING).unwrap();
        assert_eq!(response.count, 2);

        let games: Vec<GameSummary> = response.results.into_iter().map(GameSummary::from).collect();

        let gta = &games[0];
        assert_eq!(gta.id, "3498");
        assert_eq!(gta.title, "Grand Theft Auto V");
        assert_eq!(gta.reviews, 6800);
        assert_eq!(gta.released, NaiveDate::from_ymd_opt(2013, 9, 17));
        assert_eq!(gta.genres, vec!["Action".to_string(), "Adventure".to_string()]);
        assert_eq!(gta.platforms, vec!["PC".to_string(), "PlayStation 5".to_string()]);
        assert_eq!(gta.esrb_rating.as_deref(), Some("Mature"));

        let untitled = &games[1];
        assert_eq!(untitled.cover, PLACEHOLDER_COVER);
        assert_eq!(untitled.rating, 0.0);
        assert_eq!(untitled.released, None);
        assert!(untitled.platforms.is_empty());
        assert!(untitled.genres.is_empty());
    }

    #[test]
    fn test_details_conversion() {
        let json = r#"{
            "id": 3328,
            "name": "The Witcher 3: Wild Hunt",
            "background_image": "https://media.rawg.io/w3.jpg",
            "rating": 4.66,
            "ratings_count": 6500,
            "released": "2015-05-18",
            "genres": [{"id": 5, "name": "RPG"}],
            "platforms": [],
            "developers": [{"id": 9023, "name": "CD PROJEKT RED"}],
            "publishers": [{"id": 7411, "name": "CD PROJEKT RED"}],
            "metacritic": 92,
            "playtime": 46,
            "description_raw": "The third game in a series.",
            "website": ""
        }"#;

        let game: RawgGame = serde_json::from_str(json).unwrap();
        let details = game.into_details();

        assert_eq!(details.summary.id, "3328");
        assert_eq!(details.summary.developers, vec!["CD PROJEKT RED".to_string()]);
        assert_eq!(details.metacritic, Some(92));
        assert_eq!(details.playtime, Some(46));
        assert_eq!(details.description.as_deref(), Some("The third game in a series."));
        assert_eq!(details.website, None);
    }

    #[test]
    fn test_client_trims_base_url() {
        let client = RawgClient::new("http://localhost:9999/api/", "k", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:9999/api");
        assert_eq!(
            client.url(&["games"]).as_str(),
            "http://localhost:9999/api/games"
        );
    }

    #[test]
    fn test_url_encodes_id_segments() {
        let client = RawgClient::new("http://localhost:9999/api", "k", Duration::from_secs(1)).unwrap();
        assert_eq!(
            client.url(&["games", "../creators"]).as_str(),
            "http://localhost:9999/api/games/..%2Fcreators"
        );
        assert_eq!(
            client.url(&["games", "12", "screenshots"]).as_str(),
            "http://localhost:9999/api/games/12/screenshots"
        );
    }

    #[test]
    fn test_rejects_unusable_base_url() {
        let err = RawgClient::new("not a url", "k", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidBaseUrl(_)));
    }

    #[test]
    fn test_envelope_without_results() {
        let response: RawgResponse<RawgScreenshot> = serde_json::from_str(r#"{"count": 0}"#).unwrap();
        assert_eq!(response.count, 0);
        assert!(response.results.is_empty());

        let response: RawgResponse<RawgGame> =
            serde_json::from_str(r#"{"count": 3, "next": null}"#).unwrap();
        assert!(response.results.is_empty());
    }

    #[tokio::test]
    async fn test_blank_suggestion_query_skips_network() {
        // Nothing listens on this port; a request would fail
        let client = RawgClient::new("http://127.0.0.1:9", "k", Duration::from_millis(200)).unwrap();
        let results = client.suggestions("   ", 5).await.unwrap();
        assert!(results.is_empty());
    }
}
