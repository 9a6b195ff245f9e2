use std::sync::Arc;

use reqwest::Client as HttpClient;

use crate::config::Config;
use crate::db::KeyValueStore;
use crate::services::dataset::{from_location, CatalogLoader, RatingAggregator};
use crate::services::providers::{CatalogProvider, TmdbProvider};
use crate::services::{RecommendationClient, SearchDebouncer, SearchEngine, WatchList};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub search: Arc<SearchEngine>,
    /// Search-as-you-type state of the single dashboard user
    pub live_search: Arc<SearchDebouncer>,
    /// `None` when no TMDB key is configured
    pub provider: Option<Arc<dyn CatalogProvider>>,
    pub ratings: Arc<RatingAggregator>,
    pub watch_list: Arc<WatchList>,
    pub recommender: Arc<RecommendationClient>,
    pub search_limit: usize,
}

impl AppState {
    /// Wires every service from configuration
    ///
    /// Nothing is fetched here; datasets load on first use.
    pub fn from_config(
        config: &Config,
        store: Arc<dyn KeyValueStore>,
        http_client: HttpClient,
    ) -> Self {
        let catalog = Arc::new(CatalogLoader::new(from_location(
            &config.catalog_source,
            http_client.clone(),
        )));
        let ratings = Arc::new(RatingAggregator::new(
            from_location(&config.ratings_source, http_client.clone()),
            from_location(&config.links_source, http_client.clone()),
        ));

        let provider: Option<Arc<dyn CatalogProvider>> =
            TmdbProvider::from_config(config, http_client.clone())
                .map(|p| Arc::new(p) as Arc<dyn CatalogProvider>);

        let search = Arc::new(SearchEngine::new(catalog, provider.clone()));
        let live_search = Arc::new(SearchDebouncer::new(
            Arc::clone(&search),
            config.search_debounce(),
            config.search_limit,
        ));

        Self {
            search,
            live_search,
            provider,
            ratings,
            watch_list: Arc::new(WatchList::new(store, config.store_namespace.clone())),
            recommender: Arc::new(RecommendationClient::new(
                http_client,
                &config.recommender_url,
            )),
            search_limit: config.search_limit,
        }
    }
}
