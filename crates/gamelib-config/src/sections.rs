//! Configuration sections

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Local key-value storage settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one file per storage key
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Key the personal library is stored under
    #[serde(default = "default_library_key")]
    pub library_key: String,

    /// Key the recent-search list is stored under
    #[serde(default = "default_recent_searches_key")]
    pub recent_searches_key: String,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(crate::DEFAULT_DATA_DIR)
}

fn default_library_key() -> String {
    "gamelib-library".to_string()
}

fn default_recent_searches_key() -> String {
    "recentSearches".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            library_key: default_library_key(),
            recent_searches_key: default_recent_searches_key(),
        }
    }
}

/// Third-party catalog API settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// API base URL, without trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key sent with every request
    #[serde(default)]
    pub api_key: String,

    /// Results per listing page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.rawg.io/api".to_string()
}

fn default_page_size() -> u32 {
    20
}

fn default_timeout_secs() -> u64 {
    30
}

impl CatalogConfig {
    /// Request timeout as a duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            page_size: default_page_size(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Search-as-you-type settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Quiet period after the last keystroke before fetching
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Queries shorter than this show recent searches instead
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,

    /// Maximum suggestions per lookup
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: usize,

    /// Maximum remembered searches
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_min_query_len() -> usize {
    2
}

fn default_suggestion_limit() -> usize {
    5
}

fn default_recent_limit() -> usize {
    5
}

impl SearchConfig {
    /// Debounce window as a duration
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_query_len: default_min_query_len(),
            suggestion_limit: default_suggestion_limit(),
            recent_limit: default_recent_limit(),
        }
    }
}

/// HTTP server settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address to listen on
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}
