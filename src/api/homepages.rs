use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use super::error::ApiError;
use crate::db::{Homepage, HomepageResponse};
use crate::AppState;

/// GET /api/homepages/:slug
pub async fn get_homepage(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<HomepageResponse>, ApiError> {
    let homepage = Homepage::find_by_slug(&state.db, &slug.to_lowercase())
        .await?
        .ok_or_else(|| ApiError::not_found("Homepage not found"))?;

    Ok(Json(HomepageResponse::from(homepage)))
}
