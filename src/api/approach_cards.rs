use axum::{extract::State, Json};
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::warn;

use crate::db::{ApproachCard, ApproachCardResponse};
use crate::AppState;

/// Active approach cards in display order. A storage failure yields an empty
/// list so the marketing page still renders.
pub async fn load_active_cards(db: &SqlitePool) -> Vec<ApproachCardResponse> {
    match ApproachCard::list_active(db).await {
        Ok(cards) => cards.into_iter().map(ApproachCardResponse::from).collect(),
        Err(e) => {
            warn!(error = %e, "Failed to load approach cards, returning empty list");
            Vec::new()
        }
    }
}

/// GET /api/approach-cards
pub async fn list_approach_cards(
    State(state): State<Arc<AppState>>,
) -> Json<Vec<ApproachCardResponse>> {
    Json(load_active_cards(&state.db).await)
}
