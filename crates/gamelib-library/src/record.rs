//! Per-game tracking records

use crate::LibraryError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Highest meaningful progress value (percent)
pub const MAX_PROGRESS: u8 = 100;

/// Where a game sits in the user's backlog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Playing,
    Completed,
    Dropped,
    Wishlist,
}

impl GameStatus {
    pub const ALL: [GameStatus; 4] = [
        GameStatus::Playing,
        GameStatus::Completed,
        GameStatus::Dropped,
        GameStatus::Wishlist,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Playing => "playing",
            GameStatus::Completed => "completed",
            GameStatus::Dropped => "dropped",
            GameStatus::Wishlist => "wishlist",
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameStatus {
    type Err = LibraryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GameStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| LibraryError::InvalidStatus(s.to_string()))
    }
}

/// One user's tracking data for one game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserGameRecord {
    pub game_id: String,

    pub status: GameStatus,

    #[serde(default)]
    pub is_favorite: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_rating: Option<u8>,

    /// Completion percentage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours_played: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,

    /// Stamped once, on the first move into `completed`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl UserGameRecord {
    /// Fresh record for a game explicitly added with `status`
    pub fn new(game_id: impl Into<String>, status: GameStatus, now: DateTime<Utc>) -> Self {
        let playing = status == GameStatus::Playing;

        Self {
            game_id: game_id.into(),
            status,
            is_favorite: false,
            user_rating: None,
            progress: playing.then_some(0),
            hours_played: playing.then_some(0.0),
            started_at: Some(now),
            completed_at: None,
            notes: None,
        }
    }

    /// Record created implicitly by favoriting a game that was never added
    pub fn favorited(game_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            game_id: game_id.into(),
            status: GameStatus::Wishlist,
            is_favorite: true,
            user_rating: None,
            progress: None,
            hours_played: None,
            started_at: Some(now),
            completed_at: None,
            notes: None,
        }
    }

    /// Move to `status`, stamping first-time completion or start
    pub fn transition(&mut self, status: GameStatus, now: DateTime<Utc>) {
        self.status = status;

        match status {
            GameStatus::Completed if self.completed_at.is_none() => {
                self.completed_at = Some(now);
                self.progress = Some(MAX_PROGRESS);
            }
            GameStatus::Playing if self.started_at.is_none() => {
                self.started_at = Some(now);
            }
            _ => {}
        }
    }

    /// Set progress, and hours played when given
    pub fn record_progress(&mut self, progress: u8, hours_played: Option<f64>) {
        if progress > MAX_PROGRESS {
            tracing::debug!(
                "Clamping progress {} to {} for {}",
                progress,
                MAX_PROGRESS,
                self.game_id
            );
        }
        self.progress = Some(progress.min(MAX_PROGRESS));

        if let Some(hours) = hours_played {
            self.hours_played = Some(hours.max(0.0));
        }
    }
}
