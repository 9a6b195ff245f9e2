use axum::{
    extract::{Query, State},
    http::{header::AUTHORIZATION, HeaderMap},
    Json,
};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::Movie,
};

use super::AppState;

const DEFAULT_TOP_N: usize = 10;
const MAX_TOP_N: usize = 100;

#[derive(Debug, Deserialize)]
pub struct RecommendQuery {
    top_n: Option<usize>,
}

impl RecommendQuery {
    fn top_n(&self) -> usize {
        self.top_n.unwrap_or(DEFAULT_TOP_N).clamp(1, MAX_TOP_N)
    }
}

/// Bearer token forwarded to the recommendation backend
fn bearer_token(headers: &HeaderMap) -> AppResult<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_string()))
}

pub async fn personalized(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<RecommendQuery>,
) -> AppResult<Json<Vec<Movie>>> {
    let token = bearer_token(&headers)?;
    Ok(Json(state.recommender.personalized(token, params.top_n()).await))
}

pub async fn popular(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<RecommendQuery>,
) -> AppResult<Json<Vec<Movie>>> {
    let token = bearer_token(&headers)?;
    Ok(Json(state.recommender.popular(token, params.top_n()).await))
}
