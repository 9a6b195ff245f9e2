//! Catalog search: tiered title ranking over the local dataset, remote
//! enrichment, and keystroke debouncing.

pub mod debounce;
pub mod engine;
pub mod matching;
pub mod ranking;

pub use debounce::{SearchDebouncer, SearchSnapshot};
pub use engine::SearchEngine;
pub use ranking::{MatchTier, MIN_QUERY_CHARS};
