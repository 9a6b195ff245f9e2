use std::sync::Arc;

use tracing::instrument;

use super::csv::{data_lines, parse_catalog_line};
use super::source::DataSource;
use crate::db::LazyCache;
use crate::error::AppResult;
use crate::models::CatalogRecord;

/// Loads and caches the local movie catalog
pub struct CatalogLoader {
    source: Arc<dyn DataSource>,
    records: LazyCache<Vec<CatalogRecord>>,
}

impl CatalogLoader {
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        Self {
            source,
            records: LazyCache::new(),
        }
    }

    /// Returns every catalog record in file order
    ///
    /// Parsed once and then served from cache. A source that cannot be read
    /// yields an empty catalog and is retried on the next call.
    #[instrument(skip(self), fields(source = %self.source.describe()))]
    pub async fn load(&self) -> Arc<Vec<CatalogRecord>> {
        match self.records.get_or_try_init(|| self.fetch_and_parse()).await {
            Ok(records) => records,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load movie catalog");
                Arc::new(Vec::new())
            }
        }
    }

    /// Drops the cached catalog
    pub async fn invalidate(&self) {
        self.records.invalidate().await;
    }

    async fn fetch_and_parse(&self) -> AppResult<Vec<CatalogRecord>> {
        let text = self.source.fetch_text().await?;
        let records = parse_catalog(&text);

        tracing::info!(movies = records.len(), "Loaded movie catalog");

        Ok(records)
    }
}

/// Parses a whole `movies.csv` body
pub fn parse_catalog(text: &str) -> Vec<CatalogRecord> {
    data_lines(text)
        .filter_map(|line| parse_catalog_line(line).into_option())
        .collect()
}
