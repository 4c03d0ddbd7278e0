//! Resource discovery endpoints.

use axum::{
    extract::{Query, State},
    Json,
};

use super::LimitQuery;
use crate::errors::AppError;
use crate::models::{CollectionResponse, CollectionType, ResourceListResponse};
use crate::service::CollectionService;
use crate::AppState;

const DEFAULT_MOST_DOWNLOADED_LIMIT: usize = 10;

async fn collection(
    state: &AppState,
    kind: CollectionType,
) -> Result<Json<CollectionResponse>, AppError> {
    let response = CollectionService::new(state.store.as_ref())
        .resolve(kind)
        .await?;
    Ok(Json(response))
}

/// GET /discovery/resources/selection-of-week
pub async fn get_selection_of_week(
    State(state): State<AppState>,
) -> Result<Json<CollectionResponse>, AppError> {
    collection(&state, CollectionType::SelectionOfWeek).await
}

/// GET /discovery/resources/hidden-gems
pub async fn get_hidden_gems(
    State(state): State<AppState>,
) -> Result<Json<CollectionResponse>, AppError> {
    collection(&state, CollectionType::HiddenGems).await
}

/// GET /discovery/resources/starter-pack
pub async fn get_starter_pack(
    State(state): State<AppState>,
) -> Result<Json<CollectionResponse>, AppError> {
    collection(&state, CollectionType::StarterPack).await
}

/// GET /discovery/resources/theme-of-month
pub async fn get_theme_of_month(
    State(state): State<AppState>,
) -> Result<Json<CollectionResponse>, AppError> {
    collection(&state, CollectionType::ThemeOfMonth).await
}

/// GET /discovery/resources/most-downloaded?limit=N
pub async fn get_most_downloaded(
    State(state): State<AppState>,
    Query(params): Query<LimitQuery>,
) -> Result<Json<ResourceListResponse>, AppError> {
    let limit = params.limit_or(DEFAULT_MOST_DOWNLOADED_LIMIT);
    let response = CollectionService::new(state.store.as_ref())
        .most_downloaded(limit)
        .await?;
    Ok(Json(response))
}
