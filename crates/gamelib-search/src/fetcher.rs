//! Debounced suggestion fetching
//!
//! Every keystroke gets a sequence number. A keystroke's timer only fires if
//! no newer keystroke arrived during the quiet period, and a response is only
//! displayed if its keystroke is still the newest one when it lands. Slow
//! responses to old queries are dropped instead of overwriting newer results.

use crate::RecentSearches;
use gamelib_catalog::{CatalogClient, GameSummary, is_suggestible};
use gamelib_config::SearchConfig;
use gamelib_storage::KeyValueStore;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, error, trace};

/// What the suggestion dropdown should show
#[derive(Debug, Clone, PartialEq)]
pub enum SuggestionView {
    /// Nothing to show
    Idle,
    /// A lookup for `query` is in flight
    Loading { query: String },
    /// Lookup results for `query`, possibly empty
    Suggestions {
        query: String,
        games: Vec<GameSummary>,
    },
    /// Query too short; show search history instead
    Recent { searches: Vec<String> },
}

/// Tuning for the fetcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetcherSettings {
    pub debounce: Duration,
    pub min_query_len: usize,
    pub limit: usize,
}

impl Default for FetcherSettings {
    fn default() -> Self {
        Self::from(&SearchConfig::default())
    }
}

impl From<&SearchConfig> for FetcherSettings {
    fn from(config: &SearchConfig) -> Self {
        Self {
            debounce: config.debounce(),
            min_query_len: config.min_query_len,
            limit: config.suggestion_limit,
        }
    }
}

struct Shared<C, S: KeyValueStore> {
    client: C,
    recent: Mutex<RecentSearches<S>>,
    settings: FetcherSettings,
    latest: AtomicU64,
    view: watch::Sender<SuggestionView>,
}

impl<C: CatalogClient, S: KeyValueStore> Shared<C, S> {
    fn is_current(&self, seq: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == seq
    }

    fn recent_searches(&self) -> Vec<String> {
        self.recent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries()
            .to_vec()
    }

    /// Publish `view` only if `seq` is still the newest input
    fn apply(&self, seq: u64, view: SuggestionView) -> bool {
        self.view.send_if_modified(|current| {
            if !self.is_current(seq) {
                return false;
            }
            *current = view;
            true
        })
    }

    async fn run(&self, seq: u64, query: String) {
        tokio::time::sleep(self.settings.debounce).await;

        if !self.is_current(seq) {
            trace!("Input {} superseded during debounce", seq);
            return;
        }

        let query = query.trim();
        if !is_suggestible(query, self.settings.min_query_len) {
            let searches = self.recent_searches();
            self.apply(seq, SuggestionView::Recent { searches });
            return;
        }

        self.apply(
            seq,
            SuggestionView::Loading {
                query: query.to_string(),
            },
        );

        let games = match self.client.suggestions(query, self.settings.limit).await {
            Ok(games) => games,
            Err(e) => {
                error!("Error fetching suggestions for {:?}: {}", query, e);
                Vec::new()
            }
        };

        let view = SuggestionView::Suggestions {
            query: query.to_string(),
            games,
        };
        if !self.apply(seq, view) {
            debug!("Discarded stale suggestions for {:?}", query);
        }
    }
}

/// Search box driver: feed it keystrokes, watch the view
pub struct SuggestionFetcher<C, S: KeyValueStore> {
    shared: Arc<Shared<C, S>>,
}

impl<C, S> SuggestionFetcher<C, S>
where
    C: CatalogClient + 'static,
    S: KeyValueStore + 'static,
{
    pub fn new(client: C, recent: RecentSearches<S>, settings: FetcherSettings) -> Self {
        let (view, _) = watch::channel(SuggestionView::Idle);

        Self {
            shared: Arc::new(Shared {
                client,
                recent: Mutex::new(recent),
                settings,
                latest: AtomicU64::new(0),
                view,
            }),
        }
    }

    /// Receiver for display state changes
    pub fn subscribe(&self) -> watch::Receiver<SuggestionView> {
        self.shared.view.subscribe()
    }

    /// Current display state
    pub fn view(&self) -> SuggestionView {
        self.shared.view.borrow().clone()
    }

    /// Sequence number of the newest input
    pub fn latest_sequence(&self) -> u64 {
        self.shared.latest.load(Ordering::SeqCst)
    }

    /// Handle the search box changing to `query`; must be called within a
    /// tokio runtime. Returns the sequence number assigned to this input.
    pub fn input(&self, query: &str) -> u64 {
        let seq = self.shared.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let shared = Arc::clone(&self.shared);
        let query = query.to_string();

        tokio::spawn(async move {
            shared.run(seq, query).await;
        });

        seq
    }

    /// Handle a submitted search: remember it and close the dropdown.
    /// Returns the trimmed query to navigate to, or `None` when blank.
    pub fn submit(&self, query: &str) -> Option<String> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }

        // Invalidate anything still pending for earlier keystrokes
        let seq = self.shared.latest.fetch_add(1, Ordering::SeqCst) + 1;

        self.shared
            .recent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .record(query);
        self.shared.apply(seq, SuggestionView::Idle);

        Some(query.to_string())
    }

    /// Snapshot of the search history
    pub fn recent_searches(&self) -> Vec<String> {
        self.shared.recent_searches()
    }
}
