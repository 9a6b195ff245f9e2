use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

use super::engine::SearchEngine;
use super::ranking::is_searchable;
use crate::models::SearchResult;

/// Latest published search outcome
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchSnapshot {
    pub query: String,
    pub results: Vec<SearchResult>,
}

struct DebounceState {
    latest: String,
    timer: Option<JoinHandle<()>>,
}

/// Delays searches until typing pauses and drops results that arrive late
///
/// Each `schedule` call replaces a timer that has not fired yet. Once a timer
/// fires the search runs to completion, but its results are only published
/// if nothing newer has been scheduled in the meantime.
pub struct SearchDebouncer {
    engine: Arc<SearchEngine>,
    delay: Duration,
    limit: usize,
    state: Arc<Mutex<DebounceState>>,
    snapshots: Arc<watch::Sender<SearchSnapshot>>,
}

impl SearchDebouncer {
    pub fn new(engine: Arc<SearchEngine>, delay: Duration, limit: usize) -> Self {
        let (snapshots, _) = watch::channel(SearchSnapshot::default());

        Self {
            engine,
            delay,
            limit,
            state: Arc::new(Mutex::new(DebounceState {
                latest: String::new(),
                timer: None,
            })),
            snapshots: Arc::new(snapshots),
        }
    }

    /// Receiver for published snapshots
    pub fn subscribe(&self) -> watch::Receiver<SearchSnapshot> {
        self.snapshots.subscribe()
    }

    /// The most recently published snapshot
    pub fn current(&self) -> SearchSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Records new query text
    ///
    /// An empty query clears the results right away. A one-character query
    /// only supersedes older searches.
    pub async fn schedule(&self, query: &str) {
        let query = query.trim().to_string();
        let mut state = self.state.lock().await;

        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
        state.latest = query.clone();

        if query.is_empty() {
            self.snapshots.send_replace(SearchSnapshot::default());
            return;
        }
        if !is_searchable(&query) {
            return;
        }

        let engine = Arc::clone(&self.engine);
        let shared = Arc::clone(&self.state);
        let snapshots = Arc::clone(&self.snapshots);
        let delay = self.delay;
        let limit = self.limit;

        state.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Detached so a later abort of the timer cannot cancel it
            tokio::spawn(run_search(engine, shared, snapshots, query, limit));
        }));
    }
}

async fn run_search(
    engine: Arc<SearchEngine>,
    state: Arc<Mutex<DebounceState>>,
    snapshots: Arc<watch::Sender<SearchSnapshot>>,
    query: String,
    limit: usize,
) {
    let results = engine.search(&query, limit).await;

    let state = state.lock().await;
    if state.latest != query {
        tracing::debug!(
            query = %query,
            latest = %state.latest,
            "Discarding stale search results"
        );
        return;
    }

    snapshots.send_replace(SearchSnapshot { query, results });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppResult;
    use crate::models::Movie;
    use crate::services::dataset::testing::StaticSource;
    use crate::services::dataset::CatalogLoader;
    use crate::services::providers::CatalogProvider;

    const MOVIES: &str = "movieId,title,genres\n\
        1,Heat (1995),Action|Crime|Thriller\n\
        2,Inception (2010),Action|Sci-Fi\n";

    const DELAY: Duration = Duration::from_millis(40);

    /// Records lookups; "Heat" answers slowly
    #[derive(Default)]
    struct RecordingProvider {
        calls: std::sync::Mutex<Vec<String>>,
    }

    impl RecordingProvider {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl CatalogProvider for RecordingProvider {
        async fn search_movies(&self, title: &str) -> AppResult<Vec<Movie>> {
            self.calls.lock().unwrap().push(title.to_string());
            if title == "Heat" {
                tokio::time::sleep(Duration::from_millis(150)).await;
            }
            Ok(vec![])
        }

        async fn trending(&self) -> AppResult<Vec<Movie>> {
            Ok(vec![])
        }

        async fn top_rated(&self, _page: u32) -> AppResult<Vec<Movie>> {
            Ok(vec![])
        }

        async fn popular(&self, _page: u32) -> AppResult<Vec<Movie>> {
            Ok(vec![])
        }

        fn name(&self) -> &'static str {
            "recording"
        }
    }

    fn debouncer(provider: Arc<RecordingProvider>) -> SearchDebouncer {
        let catalog = Arc::new(CatalogLoader::new(Arc::new(StaticSource::new(MOVIES))));
        let engine = Arc::new(SearchEngine::new(catalog, Some(provider)));
        SearchDebouncer::new(engine, DELAY, 10)
    }

    #[tokio::test]
    async fn test_rapid_typing_runs_only_last_query() {
        let provider = Arc::new(RecordingProvider::default());
        let debouncer = debouncer(provider.clone());

        debouncer.schedule("in").await;
        debouncer.schedule("inc").await;
        debouncer.schedule("incep").await;
        tokio::time::sleep(DELAY * 4).await;

        assert_eq!(provider.calls(), vec!["Inception"]);
        let snapshot = debouncer.current();
        assert_eq!(snapshot.query, "incep");
        assert_eq!(snapshot.results.len(), 1);
    }

    #[tokio::test]
    async fn test_stale_results_are_discarded() {
        let provider = Arc::new(RecordingProvider::default());
        let debouncer = debouncer(provider.clone());
        let mut updates = debouncer.subscribe();

        debouncer.schedule("heat").await;
        // Let the "heat" timer fire; its lookup is now in flight
        tokio::time::sleep(DELAY * 2).await;
        debouncer.schedule("inception").await;

        updates.changed().await.unwrap();
        assert_eq!(updates.borrow_and_update().query, "inception");

        // The slow "heat" search finishes later and must not overwrite
        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(provider.calls(), vec!["Heat", "Inception"]);
        assert_eq!(debouncer.current().query, "inception");
        assert!(!updates.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_empty_query_clears_immediately() {
        let provider = Arc::new(RecordingProvider::default());
        let debouncer = debouncer(provider.clone());

        debouncer.schedule("inception").await;
        tokio::time::sleep(DELAY * 3).await;
        assert_eq!(debouncer.current().results.len(), 1);

        debouncer.schedule("   ").await;
        assert_eq!(debouncer.current(), SearchSnapshot::default());
    }

    #[tokio::test]
    async fn test_single_character_supersedes_without_searching() {
        let provider = Arc::new(RecordingProvider::default());
        let debouncer = debouncer(provider.clone());

        debouncer.schedule("inception").await;
        debouncer.schedule("i").await;
        tokio::time::sleep(DELAY * 3).await;

        assert!(provider.calls().is_empty());
        assert_eq!(debouncer.current(), SearchSnapshot::default());
    }
}
