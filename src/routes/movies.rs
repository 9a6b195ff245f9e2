use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::{
    error::AppResult,
    models::{Movie, SearchResult},
    services::search::SearchSnapshot,
};

use super::AppState;

/// Upper bound on `limit`
pub const MAX_SEARCH_LIMIT: usize = 100;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    q: String,
    limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct LiveQuery {
    #[serde(default)]
    query: String,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "first_page")]
    page: u32,
}

fn first_page() -> u32 {
    1
}

/// Handler for catalog search
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Json<Vec<SearchResult>> {
    let limit = params
        .limit
        .unwrap_or(state.search_limit)
        .min(MAX_SEARCH_LIMIT);

    Json(state.search.search(&params.q, limit).await)
}

/// Records the text currently typed in the search box
///
/// The search runs once typing pauses; poll `live_results` for the outcome.
pub async fn live_query(
    State(state): State<AppState>,
    Json(body): Json<LiveQuery>,
) -> StatusCode {
    state.live_search.schedule(&body.query).await;
    StatusCode::ACCEPTED
}

/// Results of the most recent settled live query
pub async fn live_results(State(state): State<AppState>) -> Json<SearchSnapshot> {
    Json(state.live_search.current())
}

pub async fn trending(State(state): State<AppState>) -> Json<Vec<Movie>> {
    let Some(provider) = state.provider.as_ref() else {
        return Json(Vec::new());
    };
    Json(degrade("trending", provider.trending().await))
}

pub async fn top_rated(
    State(state): State<AppState>,
    Query(params): Query<PageQuery>,
) -> Json<Vec<Movie>> {
    let Some(provider) = state.provider.as_ref() else {
        return Json(Vec::new());
    };
    Json(degrade("top_rated", provider.top_rated(params.page).await))
}

pub async fn popular(
    State(state): State<AppState>,
    Query(params): Query<PageQuery>,
) -> Json<Vec<Movie>> {
    let Some(provider) = state.provider.as_ref() else {
        return Json(Vec::new());
    };
    Json(degrade("popular", provider.popular(params.page).await))
}

/// Dashboard lists show nothing rather than an error page
fn degrade(list: &str, result: AppResult<Vec<Movie>>) -> Vec<Movie> {
    result.unwrap_or_else(|e| {
        tracing::error!(error = %e, list = %list, "Failed to fetch movie list");
        Vec::new()
    })
}
