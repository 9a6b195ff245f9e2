/// TMDB (The Movie Database) v3 provider
///
/// Used for poster/synopsis enrichment of local search hits and for the
/// dashboard lists.
///
/// API Flow:
/// 1. Title lookup: /search/movie?query=... → candidate list
/// 2. Dashboard: /trending/movie/day, /movie/top_rated, /movie/popular
///
/// All endpoints return the same paged envelope, decoded into `TmdbPage`.
use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{Movie, TmdbMovie, TmdbPage},
    services::providers::CatalogProvider,
};
use reqwest::Client as HttpClient;

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    image_url: String,
    language: String,
}

impl TmdbProvider {
    pub fn new(
        http_client: HttpClient,
        api_key: String,
        api_url: String,
        image_url: String,
        language: String,
    ) -> Self {
        Self {
            http_client,
            api_key,
            api_url,
            image_url,
            language,
        }
    }

    /// Builds a provider when a usable API key is configured
    ///
    /// `None` means offline mode: search falls back to local ranking only.
    pub fn from_config(config: &Config, http_client: HttpClient) -> Option<Self> {
        let Some(api_key) = config.tmdb_credential() else {
            tracing::warn!("TMDB API key not configured, searching the local catalog only");
            return None;
        };

        Some(Self::new(
            http_client,
            api_key.to_string(),
            config.tmdb_api_url.trim_end_matches('/').to_string(),
            config.tmdb_image_url.clone(),
            config.tmdb_language.clone(),
        ))
    }

    /// GETs a paged list endpoint and converts its results
    async fn fetch_page(&self, path: &str, params: &[(&str, &str)]) -> AppResult<Vec<Movie>> {
        let url = format!("{}{}", self.api_url, path);

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("language", self.language.as_str()),
            ])
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        let response_text = response.text().await?;
        let page: TmdbPage<TmdbMovie> = serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                path = %path,
                "Failed to deserialize TMDB response"
            );
            AppError::ExternalApi(format!("Failed to parse TMDB response: {}", e))
        })?;

        Ok(page
            .results
            .into_iter()
            .map(|movie| movie.into_movie(&self.image_url))
            .collect())
    }
}

#[async_trait::async_trait]
impl CatalogProvider for TmdbProvider {
    async fn search_movies(&self, title: &str) -> AppResult<Vec<Movie>> {
        if title.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search title cannot be empty".to_string(),
            ));
        }

        let movies = self
            .fetch_page("/search/movie", &[("query", title), ("page", "1")])
            .await?;

        tracing::debug!(
            title = %title,
            results = movies.len(),
            provider = "tmdb",
            "Title lookup completed"
        );

        Ok(movies)
    }

    async fn trending(&self) -> AppResult<Vec<Movie>> {
        self.fetch_page("/trending/movie/day", &[]).await
    }

    async fn top_rated(&self, page: u32) -> AppResult<Vec<Movie>> {
        let page = page.max(1).to_string();
        self.fetch_page("/movie/top_rated", &[("page", page.as_str())])
            .await
    }

    async fn popular(&self, page: u32) -> AppResult<Vec<Movie>> {
        let page = page.max(1).to_string();
        self.fetch_page("/movie/popular", &[("page", page.as_str())])
            .await
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    const SEARCH_BODY: &str = r#"{
        "page": 1,
        "results": [
            {
                "id": 27205,
                "title": "Origen",
                "overview": "Dom Cobb es un ladrón...",
                "poster_path": "/inception.jpg",
                "release_date": "2010-07-15",
                "vote_average": 8.0,
                "genre_ids": [28, 878]
            }
        ],
        "total_results": 1
    }"#;

    fn provider(server: &mockito::Server) -> TmdbProvider {
        TmdbProvider::new(
            HttpClient::new(),
            "test_key".to_string(),
            server.url(),
            "https://image.tmdb.org/t/p/w500".to_string(),
            "es-ES".to_string(),
        )
    }

    #[tokio::test]
    async fn test_search_movies_sends_query_and_converts() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/search/movie")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("api_key".into(), "test_key".into()),
                Matcher::UrlEncoded("language".into(), "es-ES".into()),
                Matcher::UrlEncoded("query".into(), "Inception".into()),
                Matcher::UrlEncoded("page".into(), "1".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(SEARCH_BODY)
            .create_async()
            .await;

        let movies = provider(&server).search_movies("Inception").await.unwrap();

        mock.assert_async().await;
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].movie_id, 27205);
        assert_eq!(movies[0].genres, vec!["Action", "Science Fiction"]);
        assert_eq!(
            movies[0].poster.as_deref(),
            Some("https://image.tmdb.org/t/p/w500/inception.jpg")
        );
        assert_eq!(movies[0].normalized_rating, Some(4.0));
    }

    #[tokio::test]
    async fn test_non_success_status_is_external_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/search/movie")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(r#"{"status_code":7,"status_message":"Invalid API key"}"#)
            .create_async()
            .await;

        let result = provider(&server).search_movies("Heat").await;
        assert!(matches!(result, Err(AppError::ExternalApi(_))));
    }

    #[tokio::test]
    async fn test_schema_mismatch_is_external_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/movie/popular")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"movies": []}"#)
            .create_async()
            .await;

        let result = provider(&server).popular(1).await;
        assert!(matches!(result, Err(AppError::ExternalApi(_))));
    }

    #[tokio::test]
    async fn test_top_rated_clamps_page() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/movie/top_rated")
            .match_query(Matcher::UrlEncoded("page".into(), "1".into()))
            .with_status(200)
            .with_body(r#"{"page": 1, "results": []}"#)
            .create_async()
            .await;

        let movies = provider(&server).top_rated(0).await.unwrap();
        mock.assert_async().await;
        assert!(movies.is_empty());
    }

    #[tokio::test]
    async fn test_empty_title_rejected_without_request() {
        let server = mockito::Server::new_async().await;
        let result = provider(&server).search_movies("   ").await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_from_config_requires_credential() {
        let mut config = Config::default();
        assert!(TmdbProvider::from_config(&config, HttpClient::new()).is_none());

        config.tmdb_api_key = Some("YOUR_API_KEY_HERE".to_string());
        assert!(TmdbProvider::from_config(&config, HttpClient::new()).is_none());

        config.tmdb_api_key = Some("abc".to_string());
        assert!(TmdbProvider::from_config(&config, HttpClient::new()).is_some());
    }
}
