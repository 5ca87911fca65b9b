//! Personal game library for gamelib
//!
//! Tracks per-game status, favorites, ratings and progress for one user and
//! persists the whole library as a single blob in client-side storage.

mod record;
mod stats;
mod store;

pub use record::{GameStatus, UserGameRecord};
pub use stats::LibraryStats;
pub use store::{LIBRARY_KEY, Library, LibraryStore};

use gamelib_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("Unknown game status: {0}")]
    InvalidStatus(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Filtered views over the library
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraryView {
    /// Every tracked game
    All,
    /// Favorites only
    Favorites,
    /// Games in one status
    Status(GameStatus),
}
