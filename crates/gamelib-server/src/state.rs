use gamelib_config::{ConfigError, GamelibConfig};
use gamelib_library::LibraryStore;
use gamelib_search::RecentSearches;
use gamelib_storage::KeyValueStore;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Session context shared by every handler
pub struct AppState<C, S: KeyValueStore> {
    pub config: GamelibConfig,
    pub catalog: C,
    pub library: Mutex<LibraryStore<S>>,
    pub recent: Mutex<RecentSearches<S>>,
}

impl<C, S: KeyValueStore + Clone> AppState<C, S> {
    /// Open the library and search history on `backend`, refusing settings
    /// the storage layer could never persist
    pub fn new(config: GamelibConfig, catalog: C, backend: S) -> Result<Arc<Self>, ConfigError> {
        config.validate()?;

        let library = LibraryStore::open_with_key(backend.clone(), &config.storage.library_key);
        let recent = RecentSearches::open_with(
            backend,
            &config.storage.recent_searches_key,
            config.search.recent_limit,
        );

        Ok(Arc::new(Self {
            config,
            catalog,
            library: Mutex::new(library),
            recent: Mutex::new(recent),
        }))
    }
}
