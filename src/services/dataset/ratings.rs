use std::collections::HashMap;
use std::sync::Arc;

use futures::{Stream, StreamExt};
use tracing::instrument;

use super::csv::{data_lines, parse_link_line, parse_rating_line, LineBuffer};
use super::source::DataSource;
use crate::db::LazyCache;
use crate::error::AppResult;
use crate::services::normalizer::normalize;

/// Lines between progress logs while streaming ratings
const PROGRESS_INTERVAL: usize = 100_000;

/// TMDB id ↔ catalog item id, built from `links.csv`
#[derive(Debug, Default, Clone)]
pub struct IdentifierMapping {
    external_to_item: HashMap<u64, u64>,
    item_to_external: HashMap<u64, u64>,
}

impl IdentifierMapping {
    /// Records a link. A repeated external id replaces the earlier item id.
    ///
    /// Returns the item id that was replaced, if any.
    pub fn insert(&mut self, external_id: u64, item_id: u64) -> Option<u64> {
        if let Some(old_external) = self.item_to_external.insert(item_id, external_id) {
            if old_external != external_id {
                self.external_to_item.remove(&old_external);
            }
        }

        let previous = self.external_to_item.insert(external_id, item_id);
        if let Some(old_item) = previous.filter(|old| *old != item_id) {
            self.item_to_external.remove(&old_item);
        }
        previous
    }

    pub fn item_for(&self, external_id: u64) -> Option<u64> {
        self.external_to_item.get(&external_id).copied()
    }

    pub fn external_for(&self, item_id: u64) -> Option<u64> {
        self.item_to_external.get(&item_id).copied()
    }

    pub fn len(&self) -> usize {
        self.external_to_item.len()
    }

    pub fn is_empty(&self) -> bool {
        self.external_to_item.is_empty()
    }
}

/// Mean rating of one catalog item
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregatedRating {
    pub item_id: u64,
    pub mean: f64,
    pub count: usize,
}

/// Accepted rating samples per item plus their means
#[derive(Debug, Default)]
pub struct RatingTable {
    samples: HashMap<u64, Vec<f64>>,
    means: HashMap<u64, f64>,
    pub processed_lines: usize,
    pub accepted: usize,
}

impl RatingTable {
    fn record(&mut self, item_id: u64, value: f64) {
        self.samples.entry(item_id).or_default().push(value);
        self.accepted += 1;
    }

    fn compute_means(&mut self) {
        self.means = self
            .samples
            .iter()
            .map(|(item_id, values)| (*item_id, values.iter().sum::<f64>() / values.len() as f64))
            .collect();
    }

    pub fn mean(&self, item_id: u64) -> Option<f64> {
        self.means.get(&item_id).copied()
    }

    pub fn aggregate(&self, item_id: u64) -> Option<AggregatedRating> {
        let mean = self.mean(item_id)?;
        let count = self.samples.get(&item_id).map_or(0, Vec::len);
        Some(AggregatedRating {
            item_id,
            mean,
            count,
        })
    }

    pub fn item_count(&self) -> usize {
        self.means.len()
    }
}

/// Builds a rating table from a chunked `ratings.csv` stream
///
/// Rejected lines are counted and skipped. A chunk error aborts the whole
/// aggregation.
pub async fn aggregate_stream<S>(mut chunks: S) -> AppResult<RatingTable>
where
    S: Stream<Item = AppResult<Vec<u8>>> + Unpin,
{
    let mut buffer = LineBuffer::new();
    let mut table = RatingTable::default();

    while let Some(chunk) = chunks.next().await {
        for line in buffer.push(&chunk?) {
            ingest_line(&mut table, &line);
        }
    }

    if let Some(line) = buffer.finish() {
        ingest_line(&mut table, &line);
    }

    table.compute_means();
    Ok(table)
}

fn ingest_line(table: &mut RatingTable, line: &str) {
    table.processed_lines += 1;

    if let Some(sample) = parse_rating_line(line).into_option() {
        table.record(sample.item_id, sample.value);
    }

    if table.processed_lines % PROGRESS_INTERVAL == 0 {
        tracing::debug!(
            processed = table.processed_lines,
            movies = table.samples.len(),
            "Ratings progress"
        );
    }
}

/// Builds the identifier mapping from a whole `links.csv` body
pub fn parse_links(text: &str) -> IdentifierMapping {
    let mut mapping = IdentifierMapping::default();

    for row in data_lines(text).filter_map(|line| parse_link_line(line).into_option()) {
        if let Some(previous) = mapping.insert(row.external_id, row.item_id) {
            if previous != row.item_id {
                tracing::warn!(
                    external_id = row.external_id,
                    previous_item_id = previous,
                    item_id = row.item_id,
                    "Duplicate TMDB id in links file, keeping the later row"
                );
            }
        }
    }

    mapping
}

/// Streams `ratings.csv` and serves per-movie mean ratings
pub struct RatingAggregator {
    ratings_source: Arc<dyn DataSource>,
    links_source: Arc<dyn DataSource>,
    table: LazyCache<RatingTable>,
    mapping: LazyCache<IdentifierMapping>,
}

impl RatingAggregator {
    pub fn new(ratings_source: Arc<dyn DataSource>, links_source: Arc<dyn DataSource>) -> Self {
        Self {
            ratings_source,
            links_source,
            table: LazyCache::new(),
            mapping: LazyCache::new(),
        }
    }

    /// Mean dataset rating for a TMDB id
    pub async fn mean_rating_for(&self, external_id: u64) -> Option<f64> {
        let item_id = self.mapping().await?.item_for(external_id)?;
        self.mean_rating_for_item(item_id).await
    }

    /// Mean and sample count for a TMDB id
    pub async fn aggregate_for(&self, external_id: u64) -> Option<AggregatedRating> {
        let item_id = self.mapping().await?.item_for(external_id)?;
        self.aggregate_for_item(item_id).await
    }

    /// Mean dataset rating for a catalog item id
    pub async fn mean_rating_for_item(&self, item_id: u64) -> Option<f64> {
        self.table().await?.mean(item_id)
    }

    /// Mean and sample count for a catalog item id
    pub async fn aggregate_for_item(&self, item_id: u64) -> Option<AggregatedRating> {
        self.table().await?.aggregate(item_id)
    }

    /// Ratings for a batch of TMDB ids
    ///
    /// Uses the dataset mean where one exists, otherwise the normalized TMDB
    /// vote from `fallback` when it is above zero. Ids with neither are omitted.
    pub async fn ratings_for_external_ids(
        &self,
        external_ids: &[u64],
        fallback: &HashMap<u64, f64>,
    ) -> HashMap<u64, f64> {
        let mapping = self.mapping().await;
        let table = self.table().await;

        let mut ratings = HashMap::new();
        for &external_id in external_ids {
            let dataset_mean = mapping
                .as_ref()
                .and_then(|m| m.item_for(external_id))
                .and_then(|item_id| table.as_ref().and_then(|t| t.mean(item_id)));

            let rating = dataset_mean.or_else(|| {
                fallback
                    .get(&external_id)
                    .copied()
                    .filter(|vote| *vote > 0.0)
                    .map(normalize)
            });

            if let Some(rating) = rating {
                ratings.insert(external_id, rating);
            }
        }

        tracing::debug!(
            requested = external_ids.len(),
            found = ratings.len(),
            "Batch rating lookup completed"
        );

        ratings
    }

    /// Drops both the rating table and the identifier mapping
    pub async fn invalidate(&self) {
        self.table.invalidate().await;
        self.mapping.invalidate().await;
    }

    async fn mapping(&self) -> Option<Arc<IdentifierMapping>> {
        let result = self
            .mapping
            .get_or_try_init(|| self.load_mapping())
            .await;

        match result {
            Ok(mapping) => Some(mapping),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    source = %self.links_source.describe(),
                    "Failed to load TMDB id mapping"
                );
                None
            }
        }
    }

    async fn table(&self) -> Option<Arc<RatingTable>> {
        let result = self.table.get_or_try_init(|| self.load_table()).await;

        match result {
            Ok(table) => Some(table),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    source = %self.ratings_source.describe(),
                    "Failed to load ratings"
                );
                None
            }
        }
    }

    async fn load_mapping(&self) -> AppResult<IdentifierMapping> {
        let text = self.links_source.fetch_text().await?;
        let mapping = parse_links(&text);

        tracing::info!(entries = mapping.len(), "Loaded TMDB id mapping");

        Ok(mapping)
    }

    #[instrument(skip(self), fields(source = %self.ratings_source.describe()))]
    async fn load_table(&self) -> AppResult<RatingTable> {
        let stream = self.ratings_source.open_stream().await?;
        let table = aggregate_stream(stream).await?;

        tracing::info!(
            movies = table.item_count(),
            valid_ratings = table.accepted,
            processed_lines = table.processed_lines,
            "Loaded ratings"
        );

        Ok(table)
    }
}
