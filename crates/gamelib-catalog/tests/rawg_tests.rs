//! Integration tests for the RAWG client against a local stub API

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDate;
use gamelib_catalog::{CatalogClient, CatalogQuery, ListingMode, RawgClient, TrendingPeriod};
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

type Requests = Arc<Mutex<Vec<HashMap<String, String>>>>;

/// Local catalog API that records the query string of every request
struct StubCatalog {
    base_url: String,
    requests: Requests,
}

impl StubCatalog {
    async fn start() -> Self {
        let requests = Requests::default();

        let app = Router::new()
            .route("/api/games", get(list_games))
            .route("/api/games/:id", get(game_details))
            .route("/api/games/:id/screenshots", get(game_screenshots))
            .with_state(requests.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}/api", addr),
            requests,
        }
    }

    fn client(&self, api_key: &str) -> RawgClient {
        RawgClient::new(&self.base_url, api_key, Duration::from_secs(5)).unwrap()
    }

    fn last_request(&self) -> HashMap<String, String> {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }

    fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

fn game(id: u64, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "background_image": format!("https://media.example/{}.jpg", id),
        "rating": 4.2,
        "ratings_count": 100,
        "released": "2022-02-25",
        "genres": [{"id": 5, "name": "RPG"}],
        "platforms": [{"platform": {"id": 4, "name": "PC"}}]
    })
}

async fn list_games(
    State(requests): State<Requests>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    requests.lock().unwrap().push(params.clone());

    if params.get("key").map(String::as_str) != Some("secret") {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "bad key"})));
    }

    let results: Vec<serde_json::Value> = match params.get("search").map(String::as_str) {
        Some("elden") => vec![game(326243, "Elden Ring"), game(1, "Elden Ring: Nightreign")],
        Some(_) => Vec::new(),
        None => (0..3).map(|i| game(i, &format!("Game {}", i))).collect(),
    };

    (StatusCode::OK, Json(json!({"count": 45, "next": null, "previous": null, "results": results})))
}

async fn game_details(
    State(requests): State<Requests>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    requests.lock().unwrap().push(HashMap::from([("id".to_string(), id.clone())]));

    if id == "0" {
        return (StatusCode::NOT_FOUND, Json(json!({"detail": "Not found."})));
    }

    let mut body = game(id.parse().unwrap_or(7), "Detailed");
    body["description_raw"] = json!("A long description.");
    body["developers"] = json!([{"id": 1, "name": "FromSoftware"}]);
    body["metacritic"] = json!(94);
    (StatusCode::OK, Json(body))
}

async fn game_screenshots(Path(_id): Path<String>) -> impl IntoResponse {
    Json(json!({
        "count": 2,
        "results": [
            {"id": 1, "image": "https://media.example/s1.jpg", "width": 1920, "height": 1080},
            {"id": 2, "image": "https://media.example/s2.jpg"}
        ]
    }))
}

#[tokio::test]
async fn test_list_sends_key_and_paging() {
    let stub = StubCatalog::start().await;
    let client = stub.client("secret");

    let query = CatalogQuery::new(ListingMode::Popular).with_page(2);
    let page = client.list(&query).await.unwrap();

    assert_eq!(page.count, 45);
    assert_eq!(page.results.len(), 3);
    assert_eq!(page.page, 2);
    assert_eq!(page.pagination().total_pages, 3);
    assert!(page.pagination().has_next);

    let request = stub.last_request();
    assert_eq!(request.get("key").map(String::as_str), Some("secret"));
    assert_eq!(request.get("page").map(String::as_str), Some("2"));
    assert_eq!(request.get("page_size").map(String::as_str), Some("20"));
    assert_eq!(
        request.get("ordering").map(String::as_str),
        Some("-rating,-ratings_count")
    );
}

#[tokio::test]
async fn test_list_uses_injected_date() {
    let stub = StubCatalog::start().await;
    let client = stub.client("secret");

    let query = CatalogQuery::new(ListingMode::Trending {
        period: TrendingPeriod::Week,
    });
    let today = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
    client.list_on(&query, today).await.unwrap();

    let request = stub.last_request();
    assert_eq!(
        request.get("dates").map(String::as_str),
        Some("2025-01-03,2025-01-10")
    );
}

#[tokio::test]
async fn test_list_reports_status_errors() {
    let stub = StubCatalog::start().await;
    let client = stub.client("wrong");

    let err = client
        .list(&CatalogQuery::search("elden"))
        .await
        .unwrap_err();
    assert!(format!("{}", err).contains("401"));
}

#[tokio::test]
async fn test_details_and_not_found() {
    let stub = StubCatalog::start().await;
    let client = stub.client("secret");

    let details = client.details("326243").await.unwrap();
    assert_eq!(details.summary.id, "326243");
    assert_eq!(details.summary.developers, vec!["FromSoftware".to_string()]);
    assert_eq!(details.metacritic, Some(94));

    let err = client.details("0").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_ids_stay_within_game_endpoints() {
    let stub = StubCatalog::start().await;
    let client = stub.client("secret");

    client.details("../creators").await.unwrap();
    let request = stub.last_request();
    assert_eq!(request.get("id").map(String::as_str), Some("../creators"));
}

#[tokio::test]
async fn test_screenshots() {
    let stub = StubCatalog::start().await;
    let shots = stub.client("secret").screenshots("326243").await.unwrap();

    assert_eq!(shots.len(), 2);
    assert_eq!(shots[0].width, Some(1920));
    assert_eq!(shots[1].height, None);
}

#[tokio::test]
async fn test_suggestions() {
    let stub = StubCatalog::start().await;
    let client = stub.client("secret");

    let games = client.suggestions(" elden ", 1).await.unwrap();
    assert_eq!(games.len(), 1);
    assert_eq!(games[0].title, "Elden Ring");

    let request = stub.last_request();
    assert_eq!(request.get("search").map(String::as_str), Some("elden"));
    assert_eq!(request.get("page_size").map(String::as_str), Some("1"));

    // Blank: no request at all
    let before = stub.request_count();
    assert!(client.suggestions("  ", 5).await.unwrap().is_empty());
    assert_eq!(stub.request_count(), before);

    // Length policy belongs to the caller; single characters are looked up
    client.suggestions("e", 5).await.unwrap();
    assert_eq!(stub.request_count(), before + 1);
}

#[tokio::test]
async fn test_suggestion_failures_are_empty() {
    let stub = StubCatalog::start().await;
    let client = stub.client("wrong");

    let games = client.suggestions("elden", 5).await.unwrap();
    assert!(games.is_empty());
}
