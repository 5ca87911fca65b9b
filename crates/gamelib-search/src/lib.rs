//! Search-as-you-type for gamelib
//!
//! Debounced catalog suggestions that never display a stale response, and a
//! short persisted list of the user's recent searches.

mod fetcher;
mod recent;

pub use fetcher::{FetcherSettings, SuggestionFetcher, SuggestionView};
pub use recent::{MAX_RECENT_SEARCHES, RECENT_SEARCHES_KEY, RecentSearches};
