//! In-memory data source shared by the dataset and search tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use futures::stream::{self, StreamExt};

use super::source::{ChunkStream, DataSource};
use crate::error::{AppError, AppResult};

/// Serves a fixed body, optionally in fixed-size chunks, and counts fetches
pub struct StaticSource {
    body: Option<String>,
    chunk_size: usize,
    pub fetches: AtomicUsize,
}

impl StaticSource {
    pub fn new(body: &str) -> Self {
        Self {
            body: Some(body.to_string()),
            chunk_size: usize::MAX,
            fetches: AtomicUsize::new(0),
        }
    }

    /// Streams the body `chunk_size` bytes at a time
    pub fn chunked(body: &str, chunk_size: usize) -> Self {
        Self {
            chunk_size,
            ..Self::new(body)
        }
    }

    pub fn failing() -> Self {
        Self {
            body: None,
            chunk_size: usize::MAX,
            fetches: AtomicUsize::new(0),
        }
    }

    fn body(&self) -> AppResult<String> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.body
            .clone()
            .ok_or_else(|| AppError::ExternalApi("source unreachable".to_string()))
    }
}

#[async_trait::async_trait]
impl DataSource for StaticSource {
    async fn fetch_text(&self) -> AppResult<String> {
        self.body()
    }

    async fn open_stream(&self) -> AppResult<ChunkStream> {
        let bytes = self.body()?.into_bytes();
        let chunks: Vec<AppResult<Vec<u8>>> = bytes
            .chunks(self.chunk_size.max(1))
            .map(|chunk| Ok(chunk.to_vec()))
            .collect();

        Ok(stream::iter(chunks).boxed())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
