use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

use super::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingResponse {
    pub external_id: u64,
    pub rating: f64,
    /// Number of ratings averaged
    pub count: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchMovie {
    pub id: u64,
    /// TMDB vote on the 0-10 scale, used when the dataset has no ratings
    #[serde(default)]
    pub vote_average: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct BatchRatingsRequest {
    pub movies: Vec<BatchMovie>,
}

#[derive(Debug, Serialize)]
pub struct BatchRatingsResponse {
    /// Keyed by TMDB id
    pub ratings: HashMap<u64, f64>,
}

/// Mean dataset rating for a TMDB id
pub async fn mean_rating(
    State(state): State<AppState>,
    Path(external_id): Path<u64>,
) -> AppResult<Json<RatingResponse>> {
    let aggregate = state
        .ratings
        .aggregate_for(external_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("No ratings for movie {}", external_id)))?;

    Ok(Json(RatingResponse {
        external_id,
        rating: aggregate.mean,
        count: aggregate.count,
    }))
}

pub async fn batch(
    State(state): State<AppState>,
    Json(request): Json<BatchRatingsRequest>,
) -> Json<BatchRatingsResponse> {
    let ids: Vec<u64> = request.movies.iter().map(|m| m.id).collect();
    let fallback: HashMap<u64, f64> = request
        .movies
        .iter()
        .filter_map(|m| m.vote_average.map(|vote| (m.id, vote)))
        .collect();

    let ratings = state.ratings.ratings_for_external_ids(&ids, &fallback).await;
    Json(BatchRatingsResponse { ratings })
}
