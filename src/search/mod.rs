//! Search-as-you-type suggestions.

pub mod suggest;

pub use suggest::{search_url, watch_url, SuggestionEngine, SuggestionState};
