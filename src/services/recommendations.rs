use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    models::Movie,
};

#[derive(Debug, Serialize)]
struct RecommendRequest {
    top_n: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScoredMovie {
    movie_id: u64,
    title: String,
    #[serde(default)]
    genres: Vec<String>,
    #[serde(default)]
    rating: f64,
    #[serde(default)]
    score: f64,
}

#[derive(Debug, Deserialize)]
struct RecommendResponse {
    recommendations: Vec<ScoredMovie>,
}

#[derive(Debug, Deserialize)]
struct PopularResponse {
    movies: Vec<ScoredMovie>,
}

impl ScoredMovie {
    /// Backend ratings are already on the 0-5 scale
    fn into_movie(self, with_score: bool) -> Movie {
        let mut movie = Movie::new(self.movie_id, self.title, self.genres);
        movie.rating = Some(self.rating);
        movie.normalized_rating = Some(self.rating);
        if with_score {
            movie.overview = Some(format!("Score: {:.4}", self.score));
        }
        movie
    }
}

/// Client for the collaborative-filtering recommendation backend
///
/// Requests are authenticated with the caller's bearer token. Failures never
/// surface to the caller; they are logged and yield an empty list.
#[derive(Clone)]
pub struct RecommendationClient {
    http_client: HttpClient,
    base_url: String,
}

impl RecommendationClient {
    pub fn new(http_client: HttpClient, base_url: &str) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Personalized recommendations for the token's user
    pub async fn personalized(&self, token: &str, top_n: usize) -> Vec<Movie> {
        match self.fetch_personalized(token, top_n).await {
            Ok(movies) => movies,
            Err(e) => {
                tracing::error!(error = %e, top_n, "Failed to fetch recommendations");
                Vec::new()
            }
        }
    }

    /// Most popular movies according to the backend
    pub async fn popular(&self, token: &str, top_n: usize) -> Vec<Movie> {
        match self.fetch_popular(token, top_n).await {
            Ok(movies) => movies,
            Err(e) => {
                tracing::error!(error = %e, top_n, "Failed to fetch popular movies");
                Vec::new()
            }
        }
    }

    async fn fetch_personalized(&self, token: &str, top_n: usize) -> AppResult<Vec<Movie>> {
        let response = self
            .http_client
            .post(format!("{}/api/recomend", self.base_url))
            .bearer_auth(token)
            .json(&RecommendRequest { top_n })
            .send()
            .await?;

        let body: RecommendResponse = decode(response).await?;
        tracing::debug!(results = body.recommendations.len(), "Recommendations received");

        Ok(body
            .recommendations
            .into_iter()
            .map(|m| m.into_movie(true))
            .collect())
    }

    async fn fetch_popular(&self, token: &str, top_n: usize) -> AppResult<Vec<Movie>> {
        let response = self
            .http_client
            .get(format!("{}/api/recomend/popular", self.base_url))
            .bearer_auth(token)
            .query(&[("top_n", top_n)])
            .send()
            .await?;

        let body: PopularResponse = decode(response).await?;
        Ok(body.movies.into_iter().map(|m| m.into_movie(false)).collect())
    }
}

async fn decode<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> AppResult<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(AppError::ExternalApi(format!(
            "Recommendation backend returned status {}",
            status
        )));
    }

    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|e| {
        AppError::ExternalApi(format!("Failed to parse recommendation response: {}", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client(server: &mockito::Server) -> RecommendationClient {
        RecommendationClient::new(HttpClient::new(), &format!("{}/", server.url()))
    }

    #[tokio::test]
    async fn test_personalized_posts_top_n_with_bearer() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/recomend")
            .match_header("authorization", "Bearer abc123")
            .match_body(Matcher::Json(serde_json::json!({ "top_n": 5 })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"recommendations":[
                    {"movieId":318,"title":"The Shawshank Redemption (1994)","genres":["Crime","Drama"],"rating":4.5,"score":0.123456}
                ]}"#,
            )
            .create_async()
            .await;

        let movies = client(&server).personalized("abc123", 5).await;

        mock.assert_async().await;
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].movie_id, 318);
        assert_eq!(movies[0].genres, vec!["Crime", "Drama"]);
        assert_eq!(movies[0].normalized_rating, Some(4.5));
        assert_eq!(movies[0].overview.as_deref(), Some("Score: 0.1235"));
    }

    #[tokio::test]
    async fn test_popular_sends_top_n_query() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/recomend/popular")
            .match_query(Matcher::UrlEncoded("top_n".into(), "3".into()))
            .match_header("authorization", "Bearer tok")
            .with_status(200)
            .with_body(r#"{"movies":[{"movieId":1,"title":"Toy Story (1995)","genres":["Animation"],"rating":3.9}]}"#)
            .create_async()
            .await;

        let movies = client(&server).popular("tok", 3).await;

        mock.assert_async().await;
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].title, "Toy Story (1995)");
        assert_eq!(movies[0].overview, None);
    }

    #[tokio::test]
    async fn test_unauthorized_yields_empty_list() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/api/recomend")
            .with_status(401)
            .create_async()
            .await;

        assert!(client(&server).personalized("expired", 10).await.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_body_yields_empty_list() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/api/recomend/popular")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"unexpected":true}"#)
            .create_async()
            .await;

        assert!(client(&server).popular("tok", 10).await.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_backend_yields_empty_list() {
        let client = RecommendationClient::new(HttpClient::new(), "http://127.0.0.1:1");
        assert!(client.popular("tok", 10).await.is_empty());
    }
}
