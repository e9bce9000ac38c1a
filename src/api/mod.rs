mod admin;
pub mod approach_cards;
pub mod auth;
mod content;
pub mod error;
mod homepages;
pub mod integrations;
pub mod validation;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::AppState;

pub use error::ApiError;

pub fn create_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    // Auth routes (public)
    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/session", get(auth::current_session))
        .route(
            "/google-business/config",
            get(integrations::google_business_config),
        );

    // Admin routes
    let admin_routes = Router::new()
        .route(
            "/approach-cards",
            get(admin::list_cards).post(admin::create_card),
        )
        .route(
            "/approach-cards/:id",
            put(admin::update_card).delete(admin::delete_card),
        )
        .route(
            "/legal-content",
            get(admin::list_legal_content).post(admin::create_legal_content),
        )
        .route("/legal-content/:id", put(admin::update_legal_content))
        .layer(middleware::from_fn_with_state(
            state,
            auth::admin_middleware,
        ));

    let api_routes = Router::new()
        .route("/approach-cards", get(approach_cards::list_approach_cards))
        .route("/content/:page_type", get(content::get_content))
        .route("/homepages/:slug", get(homepages::get_homepage))
        .nest("/auth", auth_routes)
        .nest("/admin", admin_routes);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes)
}

async fn health_check() -> &'static str {
    "OK"
}
