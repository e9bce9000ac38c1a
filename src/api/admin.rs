//! Admin-only management of the content the public pages read.
//!
//! Every route here sits behind `auth::admin_middleware`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::info;

use super::error::{ApiError, ValidationErrorBuilder};
use super::validation::{
    validate_card_description, validate_card_title, validate_content_body,
    validate_content_title, validate_icon_name, validate_language, validate_sort_order,
};
use crate::db::{
    ApproachCard, ApproachCardDetail, CreateApproachCardRequest, CreateLegalContentRequest,
    LegalContent, PageType, SessionInfo, UpdateApproachCardRequest, UpdateLegalContentRequest,
};
use crate::AppState;

/// List all approach cards, inactive ones included
pub async fn list_cards(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ApproachCardDetail>>, ApiError> {
    let cards = ApproachCard::list_all(&state.db).await?;
    Ok(Json(cards.into_iter().map(ApproachCardDetail::from).collect()))
}

/// Create an approach card
pub async fn create_card(
    State(state): State<Arc<AppState>>,
    session: SessionInfo,
    Json(req): Json<CreateApproachCardRequest>,
) -> Result<(StatusCode, Json<ApproachCardDetail>), ApiError> {
    let mut errors = ValidationErrorBuilder::new();
    errors.check("title", validate_card_title(&req.title));
    errors.check("description", validate_card_description(&req.description));
    errors.check("icon_name", validate_icon_name(&req.icon_name));
    errors.check("sort_order", validate_sort_order(req.sort_order));
    errors.finish()?;

    let req = CreateApproachCardRequest {
        title: req.title.trim().to_string(),
        description: req.description.trim().to_string(),
        ..req
    };
    let card = ApproachCard::create(&state.db, &req).await?;
    info!(card_id = %card.id, admin = %session.email, "Approach card created");

    Ok((StatusCode::CREATED, Json(ApproachCardDetail::from(card))))
}

/// Update an approach card
pub async fn update_card(
    State(state): State<Arc<AppState>>,
    session: SessionInfo,
    Path(id): Path<String>,
    Json(req): Json<UpdateApproachCardRequest>,
) -> Result<Json<ApproachCardDetail>, ApiError> {
    let mut errors = ValidationErrorBuilder::new();
    if let Some(ref title) = req.title {
        errors.check("title", validate_card_title(title));
    }
    if let Some(ref description) = req.description {
        errors.check("description", validate_card_description(description));
    }
    if let Some(ref icon_name) = req.icon_name {
        errors.check("icon_name", validate_icon_name(icon_name));
    }
    if let Some(sort_order) = req.sort_order {
        errors.check("sort_order", validate_sort_order(sort_order));
    }
    errors.finish()?;

    let card = ApproachCard::update(&state.db, &id, &req)
        .await?
        .ok_or_else(|| ApiError::not_found("Approach card not found"))?;
    info!(card_id = %card.id, admin = %session.email, "Approach card updated");

    Ok(Json(ApproachCardDetail::from(card)))
}

/// Delete an approach card
pub async fn delete_card(
    State(state): State<Arc<AppState>>,
    session: SessionInfo,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if !ApproachCard::delete(&state.db, &id).await? {
        return Err(ApiError::not_found("Approach card not found"));
    }
    info!(card_id = %id, admin = %session.email, "Approach card deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// List every stored legal content record
pub async fn list_legal_content(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<LegalContent>>, ApiError> {
    Ok(Json(LegalContent::list_all(&state.db).await?))
}

/// Store a new content record. It becomes the current record for its page
/// type and language.
pub async fn create_legal_content(
    State(state): State<Arc<AppState>>,
    session: SessionInfo,
    Json(req): Json<CreateLegalContentRequest>,
) -> Result<(StatusCode, Json<LegalContent>), ApiError> {
    let mut errors = ValidationErrorBuilder::new();
    let page_type = req.page_type.parse::<PageType>();
    if let Err(ref message) = page_type {
        errors.add("page_type", message.clone());
    }
    let language = req.language.trim().to_lowercase();
    errors.check("language", validate_language(&language));
    errors.check("title", validate_content_title(&req.title));
    errors.check("body", validate_content_body(&req.body));
    errors.finish()?;

    let page_type = page_type.map_err(ApiError::bad_request)?;
    let record = LegalContent::create(
        &state.db,
        page_type,
        &language,
        req.title.trim(),
        req.body.trim(),
    )
    .await?;
    info!(
        content_id = %record.id,
        page_type = %page_type,
        language = %language,
        admin = %session.email,
        "Legal content created"
    );

    Ok((StatusCode::CREATED, Json(record)))
}

/// Update a content record
pub async fn update_legal_content(
    State(state): State<Arc<AppState>>,
    session: SessionInfo,
    Path(id): Path<String>,
    Json(req): Json<UpdateLegalContentRequest>,
) -> Result<Json<LegalContent>, ApiError> {
    let mut errors = ValidationErrorBuilder::new();
    if let Some(ref title) = req.title {
        errors.check("title", validate_content_title(title));
    }
    if let Some(ref body) = req.body {
        errors.check("body", validate_content_body(body));
    }
    errors.finish()?;

    let record = LegalContent::update(&state.db, &id, &req)
        .await?
        .ok_or_else(|| ApiError::not_found("Content record not found"))?;
    info!(content_id = %record.id, admin = %session.email, "Legal content updated");

    Ok(Json(record))
}
