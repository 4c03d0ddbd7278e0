//! Creator discovery endpoints.

use axum::{
    extract::{Query, State},
    Json,
};

use super::LimitQuery;
use crate::errors::AppError;
use crate::models::{CreatorListResponse, LeaderboardResponse, TopByCategoryResponse};
use crate::service::CreatorService;
use crate::AppState;

const DEFAULT_LEADERBOARD_LIMIT: usize = 10;
const DEFAULT_SHUFFLE_LIMIT: usize = 6;

/// GET /discovery/creators/weekly-leaderboard?limit=N
pub async fn get_weekly_leaderboard(
    State(state): State<AppState>,
    Query(params): Query<LimitQuery>,
) -> Result<Json<LeaderboardResponse>, AppError> {
    let limit = params.limit_or(DEFAULT_LEADERBOARD_LIMIT);
    let response = CreatorService::new(state.store.as_ref())
        .weekly_leaderboard(limit)
        .await?;
    Ok(Json(response))
}

/// GET /discovery/creators/top-by-category
pub async fn get_top_creators_by_category(
    State(state): State<AppState>,
) -> Result<Json<TopByCategoryResponse>, AppError> {
    let response = CreatorService::new(state.store.as_ref())
        .top_creators_by_category()
        .await?;
    Ok(Json(response))
}

/// GET /discovery/creators/shuffle?limit=N
pub async fn get_random_creators(
    State(state): State<AppState>,
    Query(params): Query<LimitQuery>,
) -> Result<Json<CreatorListResponse>, AppError> {
    let limit = params.limit_or(DEFAULT_SHUFFLE_LIMIT);
    let response = CreatorService::new(state.store.as_ref())
        .random_creators(limit)
        .await?;
    Ok(Json(response))
}
