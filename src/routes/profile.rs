use axum::{extract::State, Json};

use crate::{error::AppResult, models::ProfileSummary, services::stats};

use super::AppState;

/// Account date plus genre charts over the watch-list
pub async fn summary(State(state): State<AppState>) -> AppResult<Json<ProfileSummary>> {
    let created_at = state.watch_list.account_created_at().await?;
    let entries = state.watch_list.entries().await?;

    Ok(Json(stats::profile_summary(created_at, &entries)))
}
