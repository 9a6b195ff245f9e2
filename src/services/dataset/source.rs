//! Where the CSV datasets come from.
//!
//! `movies.csv`, `ratings.csv` and `links.csv` are read from disk or over HTTP
//! behind one trait, so the loaders do not care which.

use std::path::PathBuf;
use std::sync::Arc;

use futures::stream::{self, BoxStream, StreamExt};
use reqwest::Client as HttpClient;
use tokio::io::AsyncReadExt;

use crate::error::{AppError, AppResult};

/// Bytes per chunk when streaming from disk
const FILE_CHUNK_SIZE: usize = 64 * 1024;

/// A stream of raw byte chunks
pub type ChunkStream = BoxStream<'static, AppResult<Vec<u8>>>;

#[async_trait::async_trait]
pub trait DataSource: Send + Sync {
    /// Reads the whole resource as text
    async fn fetch_text(&self) -> AppResult<String>;

    /// Opens the resource as a stream of byte chunks
    async fn open_stream(&self) -> AppResult<ChunkStream>;

    /// Location for logging
    fn describe(&self) -> String;
}

/// Picks a file or HTTP source from a configured location
pub fn from_location(location: &str, http_client: HttpClient) -> Arc<dyn DataSource> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Arc::new(HttpSource::new(http_client, location.to_string()))
    } else {
        Arc::new(FileSource::new(location))
    }
}

/// Dataset stored on the local filesystem
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl DataSource for FileSource {
    async fn fetch_text(&self) -> AppResult<String> {
        let bytes = tokio::fs::read(&self.path).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    async fn open_stream(&self) -> AppResult<ChunkStream> {
        let file = tokio::fs::File::open(&self.path).await?;

        Ok(stream::try_unfold(file, read_chunk).boxed())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

async fn read_chunk(mut file: tokio::fs::File) -> AppResult<Option<(Vec<u8>, tokio::fs::File)>> {
    let mut buf = vec![0u8; FILE_CHUNK_SIZE];
    let read = file.read(&mut buf).await?;
    if read == 0 {
        return Ok(None);
    }
    buf.truncate(read);
    Ok(Some((buf, file)))
}

/// Dataset served over HTTP
#[derive(Debug, Clone)]
pub struct HttpSource {
    http_client: HttpClient,
    url: String,
}

impl HttpSource {
    pub fn new(http_client: HttpClient, url: String) -> Self {
        Self { http_client, url }
    }

    async fn get(&self) -> AppResult<reqwest::Response> {
        let response = self.http_client.get(&self.url).send().await?;

        if !response.status().is_success() {
            return Err(AppError::ExternalApi(format!(
                "{} returned status {}",
                self.url,
                response.status()
            )));
        }

        Ok(response)
    }
}

#[async_trait::async_trait]
impl DataSource for HttpSource {
    async fn fetch_text(&self) -> AppResult<String> {
        Ok(self.get().await?.text().await?)
    }

    async fn open_stream(&self) -> AppResult<ChunkStream> {
        let chunks = self
            .get()
            .await?
            .bytes_stream()
            .map(|chunk| chunk.map(|bytes| bytes.to_vec()).map_err(AppError::from));

        Ok(chunks.boxed())
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}
