pub mod dataset;
pub mod normalizer;
pub mod providers;
pub mod recommendations;
pub mod search;
pub mod stats;
pub mod watchlist;

pub use recommendations::RecommendationClient;
pub use search::{SearchDebouncer, SearchEngine};
pub use watchlist::WatchList;
