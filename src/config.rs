use serde::Deserialize;

/// Placeholder shipped in `.env.example`; treated the same as a missing key
pub const TMDB_KEY_PLACEHOLDER: &str = "YOUR_API_KEY_HERE";

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB API key. Search runs offline-only when absent.
    #[serde(default)]
    pub tmdb_api_key: Option<String>,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Base URL prepended to TMDB poster paths
    #[serde(default = "default_tmdb_image_url")]
    pub tmdb_image_url: String,

    /// Language requested from TMDB
    #[serde(default = "default_tmdb_language")]
    pub tmdb_language: String,

    /// Catalog CSV (local path or http(s) URL)
    #[serde(default = "default_catalog_source")]
    pub catalog_source: String,

    /// Ratings CSV (local path or http(s) URL)
    #[serde(default = "default_ratings_source")]
    pub ratings_source: String,

    /// TMDB id mapping CSV (local path or http(s) URL)
    #[serde(default = "default_links_source")]
    pub links_source: String,

    /// Redis connection URL for the watch-list. In-memory store when unset.
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Optional prefix for watch-list keys
    #[serde(default)]
    pub store_namespace: Option<String>,

    /// Recommendation backend base URL
    #[serde(default = "default_recommender_url")]
    pub recommender_url: String,

    /// Default number of search results
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,

    /// Delay before a scheduled search fires, in milliseconds
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_tmdb_language() -> String {
    "es-ES".to_string()
}

fn default_catalog_source() -> String {
    "data/movies.csv".to_string()
}

fn default_ratings_source() -> String {
    "data/ratings.csv".to_string()
}

fn default_links_source() -> String {
    "data/links.csv".to_string()
}

fn default_recommender_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_search_limit() -> usize {
    20
}

fn default_search_debounce_ms() -> u64 {
    300
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tmdb_api_key: None,
            tmdb_api_url: default_tmdb_api_url(),
            tmdb_image_url: default_tmdb_image_url(),
            tmdb_language: default_tmdb_language(),
            catalog_source: default_catalog_source(),
            ratings_source: default_ratings_source(),
            links_source: default_links_source(),
            redis_url: None,
            store_namespace: None,
            recommender_url: default_recommender_url(),
            search_limit: default_search_limit(),
            search_debounce_ms: default_search_debounce_ms(),
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn search_debounce(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.search_debounce_ms)
    }

    /// Returns the TMDB key only when it is set to something other than the placeholder
    pub fn tmdb_credential(&self) -> Option<&str> {
        self.tmdb_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| is_configured(key))
    }
}

/// Whether an API key is usable
pub fn is_configured(api_key: &str) -> bool {
    !api_key.trim().is_empty() && api_key != TMDB_KEY_PLACEHOLDER
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_key_is_not_configured() {
        assert!(!is_configured(TMDB_KEY_PLACEHOLDER));
        assert!(!is_configured("   "));
        assert!(is_configured("abc123"));
    }

    #[test]
    fn test_tmdb_credential_filters_placeholder() {
        let mut config = Config::default();
        assert_eq!(config.tmdb_credential(), None);

        config.tmdb_api_key = Some(TMDB_KEY_PLACEHOLDER.to_string());
        assert_eq!(config.tmdb_credential(), None);

        config.tmdb_api_key = Some(" real-key ".to_string());
        assert_eq!(config.tmdb_credential(), Some("real-key"));
    }

    #[test]
    fn test_defaults_deserialize_from_empty_env() {
        let config: Config = envy::from_iter(Vec::<(String, String)>::new()).unwrap();
        assert_eq!(config.search_limit, 20);
        assert_eq!(config.search_debounce_ms, 300);
        assert_eq!(config.tmdb_language, "es-ES");
        assert!(config.redis_url.is_none());
    }
}
