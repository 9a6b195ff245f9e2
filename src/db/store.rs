use std::fmt::Display;

use crate::error::AppResult;

/// Keys of the persisted client state
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StoreKey {
    /// JSON array of watch-list movies
    WatchList,
    /// RFC 3339 account creation timestamp
    AccountDate,
}

impl Display for StoreKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreKey::WatchList => write!(f, "userMovieList"),
            StoreKey::AccountDate => write!(f, "userAccountDate"),
        }
    }
}

impl StoreKey {
    /// Full key, prefixed with `namespace:` when one is set
    pub fn qualified(&self, namespace: Option<&str>) -> String {
        match namespace.filter(|ns| !ns.is_empty()) {
            Some(ns) => format!("{}:{}", ns, self),
            None => self.to_string(),
        }
    }
}

/// String key/value persistence, the server-side stand-in for browser local storage
#[async_trait::async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> AppResult<()>;

    /// Writes only when the key is absent; returns whether it wrote
    async fn set_if_absent(&self, key: &str, value: &str) -> AppResult<bool>;
}
