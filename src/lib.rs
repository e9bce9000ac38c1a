pub mod access;
pub mod api;
pub mod cli;
pub mod config;
pub mod content;
pub mod db;
pub mod startup;
pub mod ui;
pub mod wizard;

pub use db::DbPool;

use axum::Router;
use config::Config;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::wizard::WizardStore;

pub struct AppState {
    pub config: Config,
    pub db: DbPool,
    /// In-progress homepage wizard drafts keyed by session id
    pub wizards: WizardStore,
}

impl AppState {
    pub fn new(config: Config, db: DbPool) -> Self {
        Self {
            config,
            db,
            wizards: WizardStore::new(),
        }
    }
}

/// The complete HTTP application: JSON API, server-rendered pages and static
/// assets.
pub fn router(state: Arc<AppState>) -> Router {
    let static_dir = ServeDir::new(&state.config.server.static_dir);

    Router::new()
        .merge(api::create_router(state.clone()))
        .merge(ui::create_router(state.clone()))
        .nest_service("/static", static_dir)
        .fallback(ui::fallback)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
