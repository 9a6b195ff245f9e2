use std::future::Future;
use std::sync::Arc;

use tokio::sync::Mutex;

/// Compute-once value with explicit invalidation
///
/// The lock is held for the whole populate step, so callers racing on an empty
/// cache wait for the first one instead of each running `init`. A failed
/// populate leaves the cache empty and the next caller retries.
pub struct LazyCache<T> {
    slot: Mutex<Option<Arc<T>>>,
}

impl<T> Default for LazyCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LazyCache<T> {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Returns the cached value, running `init` first if the cache is empty
    pub async fn get_or_try_init<E, F, Fut>(&self, init: F) -> Result<Arc<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut slot = self.slot.lock().await;
        if let Some(value) = slot.as_ref() {
            return Ok(Arc::clone(value));
        }

        let value = Arc::new(init().await?);
        *slot = Some(Arc::clone(&value));
        Ok(value)
    }

    /// Cached value without populating
    pub async fn peek(&self) -> Option<Arc<T>> {
        self.slot.lock().await.clone()
    }

    /// Drops the cached value so the next access repopulates
    pub async fn invalidate(&self) {
        self.slot.lock().await.take();
    }
}
