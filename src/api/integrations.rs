//! Third-party integration status.

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::config::{
    GoogleBusinessConfig, ENV_GOOGLE_CLIENT_ID, ENV_GOOGLE_CLIENT_SECRET, ENV_GOOGLE_REDIRECT_URI,
};
use crate::AppState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationStatus {
    pub is_configured: bool,
    pub message: String,
}

fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

/// Whether the Google Business integration has everything it needs. Missing
/// settings are named by their environment variable; values never appear.
pub fn google_business_status(config: &GoogleBusinessConfig) -> IntegrationStatus {
    let missing: Vec<&str> = [
        (ENV_GOOGLE_CLIENT_ID, &config.client_id),
        (ENV_GOOGLE_CLIENT_SECRET, &config.client_secret),
        (ENV_GOOGLE_REDIRECT_URI, &config.redirect_uri),
    ]
    .into_iter()
    .filter(|(_, value)| !present(value))
    .map(|(name, _)| name)
    .collect();

    if missing.is_empty() {
        IntegrationStatus {
            is_configured: true,
            message: "Google Business integration is configured".to_string(),
        }
    } else {
        IntegrationStatus {
            is_configured: false,
            message: format!(
                "Google Business integration is not configured. Missing: {}",
                missing.join(", ")
            ),
        }
    }
}

/// GET /api/auth/google-business/config
pub async fn google_business_config(State(state): State<Arc<AppState>>) -> Json<IntegrationStatus> {
    Json(google_business_status(&state.config.integrations.google_business))
}
