use std::sync::Arc;

use tracing::instrument;

use super::matching::{best_match, strip_year};
use super::ranking::{is_searchable, rank};
use crate::models::{Movie, SearchResult};
use crate::services::dataset::CatalogLoader;
use crate::services::providers::CatalogProvider;

/// Ranks the local catalog for a query and decorates hits with remote metadata
pub struct SearchEngine {
    catalog: Arc<CatalogLoader>,
    provider: Option<Arc<dyn CatalogProvider>>,
}

impl SearchEngine {
    /// `provider` is `None` when no remote credential is configured
    pub fn new(catalog: Arc<CatalogLoader>, provider: Option<Arc<dyn CatalogProvider>>) -> Self {
        Self { catalog, provider }
    }

    /// Whether results will be enriched from the remote catalog
    pub fn is_online(&self) -> bool {
        self.provider.is_some()
    }

    /// Searches the catalog, returning at most `limit` results
    ///
    /// Exact title matches come first, then partial, then fuzzy word matches.
    /// Remote lookups only add metadata: a failed lookup leaves its result as
    /// the plain catalog entry.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str, limit: usize) -> Vec<SearchResult> {
        if !is_searchable(query) {
            return Vec::new();
        }

        let records = self.catalog.load().await;
        let candidates: Vec<SearchResult> = rank(&records, query, limit)
            .into_iter()
            .map(Movie::from)
            .collect();

        let results = match &self.provider {
            Some(provider) if !candidates.is_empty() => enrich(provider, candidates).await,
            _ => candidates,
        };

        tracing::info!(
            query = %query,
            results = results.len(),
            online = self.is_online(),
            "Catalog search completed"
        );

        results
    }
}

/// Looks up every candidate concurrently and merges matches back by position
async fn enrich(
    provider: &Arc<dyn CatalogProvider>,
    mut candidates: Vec<SearchResult>,
) -> Vec<SearchResult> {
    let mut tasks = Vec::with_capacity(candidates.len());

    for candidate in &candidates {
        let provider = Arc::clone(provider);
        let title = candidate.title.clone();
        tasks.push(tokio::spawn(async move {
            lookup(provider.as_ref(), &title).await
        }));
    }

    let mut enriched = 0;
    for (candidate, task) in candidates.iter_mut().zip(tasks) {
        match task.await {
            Ok(Some(external)) => {
                candidate.enrich_from(&external);
                enriched += 1;
            }
            Ok(None) => {}
            Err(e) => {
                tracing::error!(error = %e, title = %candidate.title, "Enrichment task join error");
            }
        }
    }

    if enriched < candidates.len() {
        tracing::warn!(
            enriched,
            total = candidates.len(),
            "Partial enrichment, some results keep catalog data only"
        );
    }

    candidates
}

async fn lookup(provider: &dyn CatalogProvider, title: &str) -> Option<Movie> {
    match provider.search_movies(strip_year(title)).await {
        Ok(results) => {
            let found = best_match(title, &results).cloned();
            if found.is_none() {
                tracing::debug!(title = %title, provider = provider.name(), "No remote match");
            }
            found
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                title = %title,
                provider = provider.name(),
                "Remote lookup failed"
            );
            None
        }
    }
}
