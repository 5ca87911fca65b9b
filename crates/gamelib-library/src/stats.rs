//! Library summary statistics

use crate::{GameStatus, UserGameRecord};
use serde::Serialize;

/// Counts and totals derived from the current library
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryStats {
    pub total: usize,
    pub playing: usize,
    pub completed: usize,
    pub dropped: usize,
    pub wishlist: usize,
    pub favorites: usize,
    pub rated: usize,
    /// Hours across games currently being played
    pub hours_playing: f64,
    /// Mean progress of games currently being played, rounded
    pub average_progress: u8,
}

impl LibraryStats {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a UserGameRecord>) -> Self {
        let mut stats = Self::default();
        let mut progress_sum = 0u64;

        for record in records {
            stats.total += 1;

            match record.status {
                GameStatus::Playing => {
                    stats.playing += 1;
                    stats.hours_playing += record.hours_played.unwrap_or(0.0);
                    progress_sum += u64::from(record.progress.unwrap_or(0));
                }
                GameStatus::Completed => stats.completed += 1,
                GameStatus::Dropped => stats.dropped += 1,
                GameStatus::Wishlist => stats.wishlist += 1,
            }

            if record.is_favorite {
                stats.favorites += 1;
            }
            if record.user_rating.is_some() {
                stats.rated += 1;
            }
        }

        if stats.playing > 0 {
            let mean = progress_sum as f64 / stats.playing as f64;
            stats.average_progress = mean.round() as u8;
        }

        stats
    }

    /// Count for a single status
    pub fn count(&self, status: GameStatus) -> usize {
        match status {
            GameStatus::Playing => self.playing,
            GameStatus::Completed => self.completed,
            GameStatus::Dropped => self.dropped,
            GameStatus::Wishlist => self.wishlist,
        }
    }
}
