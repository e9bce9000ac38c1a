//! Dashboard shell: sidebar, header and the gate in front of every
//! dashboard route.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, Uri},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use std::sync::Arc;
use tracing::debug;

use super::theme::ThemeContext;
use crate::access::{decide, AccessDecision, DashboardProfile};
use crate::api::auth::session_from_headers;
use crate::db::{Role, SessionInfo};
use crate::AppState;

/// A sidebar link with its resolved URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub label: &'static str,
    pub href: String,
    pub active: bool,
}

/// Everything the shell template needs
#[derive(Debug, Clone)]
pub struct ShellContext {
    pub sidebar: &'static str,
    pub base_url: &'static str,
    pub accent_color: &'static str,
    pub nav: Vec<NavLink>,
    pub user_name: String,
    pub role_label: &'static str,
    pub current_path: String,
    pub theme: ThemeContext,
}

pub fn role_label(role: Role) -> &'static str {
    match role {
        Role::SalonOwner => "Salon",
        Role::Stylist => "Stylist:in",
        Role::Admin => "Administration",
    }
}

impl ShellContext {
    pub fn compose(
        profile: &'static DashboardProfile,
        session: &SessionInfo,
        current_path: &str,
        theme: ThemeContext,
    ) -> Self {
        let nav = profile
            .nav
            .iter()
            .map(|item| {
                let href = format!("{}{}", profile.base_url, item.path);
                let active = if item.path.is_empty() {
                    current_path == href
                } else {
                    current_path == href || current_path.starts_with(&format!("{}/", href))
                };
                NavLink {
                    label: item.label,
                    href,
                    active,
                }
            })
            .collect();

        Self {
            sidebar: profile.sidebar.as_str(),
            base_url: profile.base_url,
            accent_color: profile.accent_color,
            nav,
            user_name: session.name.clone(),
            role_label: role_label(profile.role),
            current_path: current_path.to_string(),
            theme,
        }
    }
}

/// Request extension set by [`role_gate`] for allowed dashboard requests
#[derive(Debug, Clone)]
pub struct DashboardContext {
    pub session: SessionInfo,
    pub profile: &'static DashboardProfile,
    pub theme: ThemeContext,
}

impl DashboardContext {
    pub fn shell(&self, current_path: &str) -> ShellContext {
        ShellContext::compose(self.profile, &self.session, current_path, self.theme)
    }
}

/// Outcome of running the role router for a request
pub enum GateOutcome {
    Allowed(DashboardContext),
    Redirect(String),
    NotDashboard,
}

pub async fn evaluate(state: &AppState, uri: &Uri, headers: &HeaderMap) -> GateOutcome {
    let requested = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());

    let session = session_from_headers(&state.db, headers).await;

    match (decide(session.as_ref().map(|s| s.role), requested), session) {
        (Some(AccessDecision::Allow(profile)), Some(session)) => {
            let jar = CookieJar::from_headers(headers);
            GateOutcome::Allowed(DashboardContext {
                session,
                profile,
                theme: ThemeContext::from_cookies(&jar, state.config.ui.dashboard_theme),
            })
        }
        (Some(AccessDecision::Redirect(target)), session) => {
            debug!(
                path = %requested,
                role = ?session.map(|s| s.role),
                target = %target,
                "Dashboard access redirected"
            );
            GateOutcome::Redirect(target)
        }
        _ => GateOutcome::NotDashboard,
    }
}

/// Middleware on dashboard routes: redirects callers without a session or
/// with another role, and hands allowed requests their `DashboardContext`.
pub async fn role_gate(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    match evaluate(&state, request.uri(), request.headers()).await {
        GateOutcome::Allowed(ctx) => {
            request.extensions_mut().insert(ctx.session.clone());
            request.extensions_mut().insert(ctx);
            next.run(request).await
        }
        GateOutcome::Redirect(target) => Redirect::to(&target).into_response(),
        GateOutcome::NotDashboard => next.run(request).await,
    }
}
