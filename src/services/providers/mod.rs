use crate::{error::AppResult, models::Movie};

/// Remote movie catalog abstraction
///
/// The search engine only needs title lookups; the dashboard lists come from
/// the same provider so one credential covers both.
pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Trait for remote movie catalogs
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Search movies by title
    ///
    /// Returns candidates in the provider's relevance order. The caller picks
    /// the best match.
    async fn search_movies(&self, title: &str) -> AppResult<Vec<Movie>>;

    /// Movies trending today
    async fn trending(&self) -> AppResult<Vec<Movie>>;

    /// Highest rated movies, one page at a time
    async fn top_rated(&self, page: u32) -> AppResult<Vec<Movie>>;

    /// Most popular movies, one page at a time
    async fn popular(&self, page: u32) -> AppResult<Vec<Movie>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
