use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use redis::Client;

use crate::db::store::KeyValueStore;
use crate::error::AppResult;

/// Creates a Redis client for the watch-list store
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Redis-backed key/value store
///
/// Writes go straight to Redis: the watch-list is read back immediately after
/// an add, so there is no background write queue.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    /// Connects and keeps a self-reconnecting multiplexed connection
    pub async fn connect(client: Client) -> AppResult<Self> {
        let conn = ConnectionManager::new(client).await?;
        tracing::info!("Connected to Redis store");
        Ok(Self { conn })
    }
}

#[async_trait::async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.set(key, value).await?;
        Ok(())
    }

    async fn set_if_absent(&self, key: &str, value: &str) -> AppResult<bool> {
        let mut conn = self.conn.clone();
        let written: bool = conn.set_nx(key, value).await?;
        Ok(written)
    }
}
