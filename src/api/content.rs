use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use super::error::ApiError;
use crate::content::{self, normalize_language, ContentRecord};
use crate::db::PageType;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ContentQuery {
    pub lang: Option<String>,
}

/// GET /api/content/:page_type
pub async fn get_content(
    State(state): State<Arc<AppState>>,
    Path(page_type): Path<String>,
    Query(query): Query<ContentQuery>,
) -> Result<Json<ContentRecord>, ApiError> {
    let page_type = PageType::from_slug(&page_type.to_lowercase())
        .ok_or_else(|| ApiError::not_found(format!("Unknown page type: {}", page_type)))?;

    let language = normalize_language(query.lang.as_deref(), &state.config.ui.default_language);
    let record = content::resolve(&state.db, page_type, &language).await;

    Ok(Json(record))
}
