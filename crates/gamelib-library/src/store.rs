//! Library store backed by client-side key-value storage

use crate::{GameStatus, LibraryError, LibraryStats, LibraryView, UserGameRecord};
use chrono::Utc;
use gamelib_storage::KeyValueStore;
use std::collections::HashMap;
use tracing::{debug, error, info, warn};

/// Storage key the library blob lives under
pub const LIBRARY_KEY: &str = "gamelib-library";

/// Game id to record
pub type Library = HashMap<String, UserGameRecord>;

/// Session-scoped owner of the user's library
///
/// The library is read from storage once, when the store is opened, and the
/// whole map is written back after every mutation that changes it. Mutations
/// that need an existing record report `false` instead of failing when the
/// game is unknown, so callers never have to handle errors.
pub struct LibraryStore<S: KeyValueStore> {
    backend: S,
    key: String,
    library: Library,
}

impl<S: KeyValueStore> LibraryStore<S> {
    /// Open the store under the default key
    pub fn open(backend: S) -> Self {
        Self::open_with_key(backend, LIBRARY_KEY)
    }

    /// Open the store under `key`, falling back to an empty library when the
    /// stored blob is missing or unreadable
    pub fn open_with_key(backend: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let library = Self::load(&backend, &key);

        Self {
            backend,
            key,
            library,
        }
    }

    fn load(backend: &S, key: &str) -> Library {
        let raw = match backend.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No stored library under {}, starting empty", key);
                return Library::new();
            }
            Err(e) => {
                warn!("Failed to read library: {}", e);
                return Library::new();
            }
        };

        match serde_json::from_str::<Library>(&raw) {
            Ok(library) => {
                info!("Loaded library with {} games", library.len());
                library
            }
            Err(e) => {
                warn!("Failed to load library, starting empty: {}", e);
                Library::new()
            }
        }
    }

    /// Write the full library to storage
    pub fn save(&self) -> Result<(), LibraryError> {
        let json = serde_json::to_string(&self.library)?;
        self.backend.set(&self.key, &json)?;
        Ok(())
    }

    fn persist(&self) {
        if let Err(e) = self.save() {
            error!("Failed to save library: {}", e);
        }
    }

    /// Apply `update` to an existing record and persist, or report a no-op
    fn modify(&mut self, game_id: &str, op: &str, update: impl FnOnce(&mut UserGameRecord)) -> bool {
        let Some(record) = self.library.get_mut(game_id) else {
            debug!("Ignored {}: no such record {}", op, game_id);
            return false;
        };

        update(record);
        self.persist();
        true
    }

    /// Add a game with `status`, replacing any existing record
    pub fn add_game(&mut self, game_id: &str, status: GameStatus) {
        let record = UserGameRecord::new(game_id, status, Utc::now());

        if self.library.insert(game_id.to_string(), record).is_some() {
            debug!("Replaced record for {} with status {}", game_id, status);
        } else {
            debug!("Added {} as {}", game_id, status);
        }

        self.persist();
    }

    /// Remove a game; returns whether a record existed
    pub fn remove_game(&mut self, game_id: &str) -> bool {
        if self.library.remove(game_id).is_none() {
            debug!("Ignored remove: no such record {}", game_id);
            return false;
        }

        self.persist();
        true
    }

    /// Change the status of a tracked game
    pub fn update_game_status(&mut self, game_id: &str, status: GameStatus) -> bool {
        self.modify(game_id, "status update", |record| {
            record.transition(status, Utc::now());
        })
    }

    /// Set progress, and hours played when given, on a tracked game
    pub fn update_progress(&mut self, game_id: &str, progress: u8, hours_played: Option<f64>) -> bool {
        self.modify(game_id, "progress update", |record| {
            record.record_progress(progress, hours_played);
        })
    }

    /// Flip the favorite flag, creating a wishlist entry for unknown games.
    /// Returns the new flag.
    pub fn toggle_favorite(&mut self, game_id: &str) -> bool {
        let favorite = match self.library.get_mut(game_id) {
            Some(record) => {
                record.is_favorite = !record.is_favorite;
                record.is_favorite
            }
            None => {
                debug!("Favoriting untracked {}, adding to wishlist", game_id);
                self.library.insert(
                    game_id.to_string(),
                    UserGameRecord::favorited(game_id, Utc::now()),
                );
                true
            }
        };

        self.persist();
        favorite
    }

    /// Set the user's rating on a tracked game
    pub fn rate_game(&mut self, game_id: &str, rating: u8) -> bool {
        self.modify(game_id, "rating", |record| {
            record.user_rating = Some(rating);
        })
    }

    pub fn get_game_data(&self, game_id: &str) -> Option<&UserGameRecord> {
        self.library.get(game_id)
    }

    /// Snapshot of records in `status`, in no particular order
    pub fn get_games_by_status(&self, status: GameStatus) -> Vec<UserGameRecord> {
        self.view(LibraryView::Status(status))
    }

    /// Snapshot of favorited records, in no particular order
    pub fn get_favorites(&self) -> Vec<UserGameRecord> {
        self.view(LibraryView::Favorites)
    }

    /// Snapshot of the records matching `view`
    pub fn view(&self, view: LibraryView) -> Vec<UserGameRecord> {
        self.library
            .values()
            .filter(|record| match view {
                LibraryView::All => true,
                LibraryView::Favorites => record.is_favorite,
                LibraryView::Status(status) => record.status == status,
            })
            .cloned()
            .collect()
    }

    pub fn stats(&self) -> LibraryStats {
        LibraryStats::from_records(self.library.values())
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn len(&self) -> usize {
        self.library.len()
    }

    pub fn is_empty(&self) -> bool {
        self.library.is_empty()
    }

    /// Storage key in use
    pub fn key(&self) -> &str {
        &self.key
    }
}
