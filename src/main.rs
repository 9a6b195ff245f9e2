use std::sync::Arc;

use lumiere_api::{
    config::Config,
    db::{create_redis_client, KeyValueStore, MemoryStore, RedisStore},
    routes::{create_router, AppState},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("lumiere_api=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let store: Arc<dyn KeyValueStore> = match config.redis_url.as_deref() {
        Some(url) => {
            let client = create_redis_client(url)?;
            Arc::new(RedisStore::connect(client).await?)
        }
        None => {
            tracing::warn!("REDIS_URL not set, watch-list is kept in memory only");
            Arc::new(MemoryStore::new())
        }
    };

    let http_client = reqwest::Client::builder()
        .user_agent(concat!("lumiere-api/", env!("CARGO_PKG_VERSION")))
        .build()?;

    let state = AppState::from_config(&config, store, http_client);
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(
        address = %addr,
        catalog = %config.catalog_source,
        online = config.tmdb_credential().is_some(),
        "Server listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
