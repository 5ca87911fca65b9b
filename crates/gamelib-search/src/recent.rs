//! Recent search history

use gamelib_storage::KeyValueStore;
use tracing::{debug, error, warn};

/// Storage key the history lives under
pub const RECENT_SEARCHES_KEY: &str = "recentSearches";

/// Default number of remembered searches
pub const MAX_RECENT_SEARCHES: usize = 5;

/// Most-recent-first, de-duplicated list of submitted searches
pub struct RecentSearches<S: KeyValueStore> {
    backend: S,
    key: String,
    limit: usize,
    entries: Vec<String>,
}

impl<S: KeyValueStore> RecentSearches<S> {
    pub fn open(backend: S) -> Self {
        Self::open_with(backend, RECENT_SEARCHES_KEY, MAX_RECENT_SEARCHES)
    }

    /// Open under `key`, keeping at most `limit` entries
    pub fn open_with(backend: S, key: impl Into<String>, limit: usize) -> Self {
        let key = key.into();
        let limit = limit.max(1);

        let mut entries = match backend.get(&key) {
            Ok(Some(raw)) => serde_json::from_str::<Vec<String>>(&raw).unwrap_or_else(|e| {
                warn!("Failed to load recent searches, starting empty: {}", e);
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Failed to read recent searches: {}", e);
                Vec::new()
            }
        };
        entries.truncate(limit);

        Self {
            backend,
            key,
            limit,
            entries,
        }
    }

    /// Remember a submitted search; blank queries are ignored
    pub fn record(&mut self, query: &str) -> bool {
        let query = query.trim();
        if query.is_empty() {
            return false;
        }

        self.entries.retain(|entry| entry != query);
        self.entries.insert(0, query.to_string());
        self.entries.truncate(self.limit);
        debug!("Recorded search {:?}", query);

        self.persist();
        true
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.persist();
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn persist(&self) {
        let result = serde_json::to_string(&self.entries)
            .map_err(|e| e.to_string())
            .and_then(|json| {
                self.backend
                    .set(&self.key, &json)
                    .map_err(|e| e.to_string())
            });

        if let Err(e) = result {
            error!("Failed to save recent searches: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gamelib_storage::MemoryStore;

    #[test]
    fn test_most_recent_first_and_deduplicated() {
        let mut recent = RecentSearches::open(MemoryStore::new());
        recent.record("zelda");
        recent.record("mario");
        recent.record("zelda");

        assert_eq!(recent.entries(), ["zelda", "mario"]);
    }

    #[test]
    fn test_capped_at_limit() {
        let mut recent = RecentSearches::open(MemoryStore::new());
        for query in ["a1", "a2", "a3", "a4", "a5", "a6", "a7"] {
            recent.record(query);
        }

        assert_eq!(recent.entries(), ["a7", "a6", "a5", "a4", "a3"]);
    }

    #[test]
    fn test_blank_queries_ignored() {
        let mut recent = RecentSearches::open(MemoryStore::new());
        assert!(!recent.record("   "));
        assert!(recent.record("  halo "));
        assert_eq!(recent.entries(), ["halo"]);
    }

    #[test]
    fn test_persisted_and_reloaded() {
        let backend = MemoryStore::new();
        {
            let mut recent = RecentSearches::open(backend.clone());
            recent.record("portal");
            recent.record("celeste");
        }

        assert_eq!(
            backend.get(RECENT_SEARCHES_KEY).unwrap().as_deref(),
            Some(r#"["celeste","portal"]"#)
        );

        let reloaded = RecentSearches::open(backend);
        assert_eq!(reloaded.entries(), ["celeste", "portal"]);
    }

    #[test]
    fn test_corrupt_history_starts_empty() {
        let backend = MemoryStore::new();
        backend.set(RECENT_SEARCHES_KEY, "{oops").unwrap();

        let recent = RecentSearches::open(backend);
        assert!(recent.is_empty());
    }

    #[test]
    fn test_clear() {
        let backend = MemoryStore::new();
        let mut recent = RecentSearches::open_with(backend.clone(), "history", 3);
        recent.record("doom");
        recent.clear();

        assert!(recent.is_empty());
        assert_eq!(backend.get("history").unwrap().as_deref(), Some("[]"));
    }
}
