use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use tokio::sync::Mutex;

use crate::db::{KeyValueStore, StoreKey};
use crate::error::{AppError, AppResult};
use crate::models::Movie;

/// The user's saved movies and account creation date
pub struct WatchList {
    store: Arc<dyn KeyValueStore>,
    namespace: Option<String>,
    /// Serializes read-modify-write cycles on the list
    write_lock: Mutex<()>,
}

impl WatchList {
    pub fn new(store: Arc<dyn KeyValueStore>, namespace: Option<String>) -> Self {
        Self {
            store,
            namespace,
            write_lock: Mutex::new(()),
        }
    }

    fn key(&self, key: StoreKey) -> String {
        key.qualified(self.namespace.as_deref())
    }

    /// Saved movies in insertion order
    ///
    /// A missing or unreadable list is treated as empty.
    pub async fn entries(&self) -> AppResult<Vec<Movie>> {
        match self.stored_entries().await {
            Err(AppError::Internal(e)) => {
                tracing::warn!(error = %e, "Stored watch-list is unreadable, treating as empty");
                Ok(Vec::new())
            }
            result => result,
        }
    }

    /// Decodes the stored list, failing on anything unreadable
    ///
    /// Writers go through this so a list they cannot parse is never replaced.
    async fn stored_entries(&self) -> AppResult<Vec<Movie>> {
        let Some(raw) = self.store.get(&self.key(StoreKey::WatchList)).await? else {
            return Ok(Vec::new());
        };

        serde_json::from_str(&raw)
            .map_err(|e| AppError::Internal(format!("Stored watch-list is not readable: {}", e)))
    }

    async fn save(&self, entries: &[Movie]) -> AppResult<()> {
        let json = serde_json::to_string(entries)
            .map_err(|e| AppError::Internal(format!("Watch-list serialization error: {}", e)))?;
        self.store.set(&self.key(StoreKey::WatchList), &json).await
    }

    /// Adds a movie unless one with the same id is already saved
    ///
    /// Returns whether the list changed.
    pub async fn add(&self, movie: Movie) -> AppResult<bool> {
        let _guard = self.write_lock.lock().await;

        let mut entries = self.stored_entries().await?;
        if entries.iter().any(|m| m.movie_id == movie.movie_id) {
            return Ok(false);
        }

        tracing::info!(movie_id = movie.movie_id, title = %movie.title, "Adding movie to watch-list");
        entries.push(movie);
        self.save(&entries).await?;
        Ok(true)
    }

    /// Removes a movie by id; returns whether it was present
    pub async fn remove(&self, movie_id: u64) -> AppResult<bool> {
        let _guard = self.write_lock.lock().await;

        let mut entries = self.stored_entries().await?;
        let before = entries.len();
        entries.retain(|m| m.movie_id != movie_id);
        if entries.len() == before {
            return Ok(false);
        }

        self.save(&entries).await?;
        Ok(true)
    }

    pub async fn contains(&self, movie_id: u64) -> AppResult<bool> {
        Ok(self.entries().await?.iter().any(|m| m.movie_id == movie_id))
    }

    /// Account creation date, recorded as now on first access
    pub async fn account_created_at(&self) -> AppResult<DateTime<Utc>> {
        let key = self.key(StoreKey::AccountDate);

        if let Some(stored) = self.store.get(&key).await? {
            if let Some(date) = parse_date(&stored) {
                return Ok(date);
            }
            tracing::warn!(value = %stored, "Stored account date is unreadable");
            return Ok(Utc::now());
        }

        let now = Utc::now();
        self.set_account_created_at(now).await?;

        // Another writer may have won the race; report whatever is stored
        let stored = self.store.get(&key).await?;
        Ok(stored.as_deref().and_then(parse_date).unwrap_or(now))
    }

    /// Records the account creation date unless one is already stored
    pub async fn set_account_created_at(&self, date: DateTime<Utc>) -> AppResult<bool> {
        let value = date.to_rfc3339_opts(SecondsFormat::Millis, true);
        self.store
            .set_if_absent(&self.key(StoreKey::AccountDate), &value)
            .await
    }
}

fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|date| date.with_timezone(&Utc))
}
