use axum::{
    http::StatusCode,
    middleware,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{make_span_with_request_id, request_id_middleware};

pub mod movies;
pub mod profile;
pub mod ratings;
pub mod recommendations;
pub mod state;
pub mod watchlist;

pub use state::AppState;

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        // Catalog
        .route("/movies/search", get(movies::search))
        .route(
            "/movies/search/live",
            get(movies::live_results).put(movies::live_query),
        )
        .route("/movies/trending", get(movies::trending))
        .route("/movies/top-rated", get(movies::top_rated))
        .route("/movies/popular", get(movies::popular))
        // Dataset ratings
        .route("/ratings/batch", post(ratings::batch))
        .route("/ratings/:external_id", get(ratings::mean_rating))
        // Watch-list
        .route("/watchlist", get(watchlist::list).post(watchlist::add))
        .route("/watchlist/:movie_id", delete(watchlist::remove))
        .route("/profile", get(profile::summary))
        // Recommendation backend
        .route("/recommendations", get(recommendations::personalized))
        .route("/recommendations/popular", get(recommendations::popular))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
