use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::{AppError, AppResult},
    models::Movie,
};

use super::AppState;

pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Movie>>> {
    Ok(Json(state.watch_list.entries().await?))
}

/// Adds a movie; 201 when it was new, 200 when already saved
pub async fn add(
    State(state): State<AppState>,
    Json(movie): Json<Movie>,
) -> AppResult<(StatusCode, Json<Vec<Movie>>)> {
    if movie.title.trim().is_empty() {
        return Err(AppError::InvalidInput("Movie title cannot be empty".to_string()));
    }

    let added = state.watch_list.add(movie).await?;
    let status = if added {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(state.watch_list.entries().await?)))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(movie_id): Path<u64>,
) -> AppResult<StatusCode> {
    if state.watch_list.remove(movie_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!(
            "Movie {} is not in the watch-list",
            movie_id
        )))
    }
}
