// Server-rendered pages: marketing site, legal pages, sign-in and the role
// dashboards. Uses Askama templates.

mod dashboard;
pub mod shell;
mod templates;
pub mod theme;
pub mod wizard;

use askama::Template;
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode, Uri},
    middleware,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::access::{local_redirect_target, post_sign_in_target, profile_for};
use crate::api::approach_cards::load_active_cards;
use crate::api::auth::{
    authenticate, create_session, extract_token, removal_cookie, resolve_session, revoke_session,
    session_cookie, OptionalSession,
};
use crate::content::{self, normalize_language};
use crate::db::PageType;
use crate::AppState;

use templates::{DashboardLink, HomeTemplate, LegalTemplate, SignInTemplate};

pub use dashboard::fallback;
pub use theme::{Theme, ThemeContext};

// Helper to render templates and handle errors
fn render_template<T: Template>(template: T) -> Response {
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!(error = %e, "Template render failed");
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Template error: {}", e)).into_response()
        }
    }
}

pub fn create_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let gate = middleware::from_fn_with_state(state, shell::role_gate);

    let salon_routes = Router::new()
        .route("/salon", get(dashboard::home))
        .route("/salon/marketing/homepage", get(dashboard::homepage_overview))
        .route(
            "/salon/marketing/homepage/create",
            get(wizard::show).post(wizard::submit),
        )
        .route_layer(gate.clone());

    let stylist_routes = Router::new()
        .route("/stylist", get(dashboard::home))
        .route("/stylist/marketing/homepage", get(dashboard::homepage_overview))
        .route(
            "/stylist/marketing/homepage/create",
            get(wizard::show).post(wizard::submit),
        )
        .route_layer(gate.clone());

    let admin_routes = Router::new()
        .route("/admin", get(dashboard::home))
        .route("/admin/content", get(dashboard::admin_content))
        .route(
            "/admin/marketing/newsletter/:id/edit",
            get(dashboard::newsletter_edit),
        )
        .route_layer(gate);

    Router::new()
        // Public routes
        .route("/", get(home_page))
        .route("/agb", get(legal_page))
        .route("/datenschutz", get(legal_page))
        .route("/impressum", get(legal_page))
        .route("/beta", get(legal_page))
        .route("/sign-in", get(sign_in_page).post(sign_in_submit))
        .route("/sign-out", get(sign_out).post(sign_out))
        .route("/preferences/theme", post(set_theme))
        // Registered outside the gate: redirects for everyone
        .route(
            "/admin/marketing/newsletter/:id",
            get(dashboard::newsletter_redirect),
        )
        .merge(salon_routes)
        .merge(stylist_routes)
        .merge(admin_routes)
}

fn public_theme(state: &AppState) -> ThemeContext {
    ThemeContext::enforced(state.config.ui.public_theme)
}

// Marketing home page
async fn home_page(
    State(state): State<Arc<AppState>>,
    OptionalSession(session): OptionalSession,
) -> Response {
    let cards = load_active_cards(&state.db).await;
    let dashboard = session.map(|s| DashboardLink {
        href: profile_for(s.role).base_url.to_string(),
        name: s.name,
    });

    render_template(HomeTemplate {
        theme: public_theme(&state),
        title: "SalonKit".to_string(),
        cards,
        dashboard,
    })
}

#[derive(Debug, Deserialize)]
struct LangQuery {
    lang: Option<String>,
}

// AGB, Datenschutz, Impressum and beta pages
async fn legal_page(
    State(state): State<Arc<AppState>>,
    uri: Uri,
    Query(query): Query<LangQuery>,
) -> Response {
    let Some(page_type) = PageType::from_slug(uri.path().trim_start_matches('/')) else {
        return (StatusCode::NOT_FOUND, "Seite nicht gefunden").into_response();
    };

    let language = normalize_language(query.lang.as_deref(), &state.config.ui.default_language);
    let record = content::resolve(&state.db, page_type, &language).await;
    let paragraphs = record.paragraphs();

    render_template(LegalTemplate {
        theme: public_theme(&state),
        title: record.title.clone(),
        record,
        paragraphs,
    })
}

#[derive(Debug, Deserialize)]
struct SignInQuery {
    redirect_to: Option<String>,
}

async fn sign_in_page(
    State(state): State<Arc<AppState>>,
    OptionalSession(session): OptionalSession,
    Query(query): Query<SignInQuery>,
) -> Response {
    if let Some(session) = session {
        let target = post_sign_in_target(session.role, query.redirect_to.as_deref());
        return Redirect::to(&target).into_response();
    }

    render_template(SignInTemplate {
        theme: public_theme(&state),
        title: "Anmelden".to_string(),
        error: None,
        email: String::new(),
        redirect_to: query.redirect_to.unwrap_or_default(),
    })
}

#[derive(Debug, Deserialize)]
struct SignInForm {
    email: String,
    password: String,
    #[serde(default)]
    redirect_to: String,
}

async fn sign_in_submit(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<SignInForm>,
) -> Response {
    let failed = |status: StatusCode, message: &str| {
        let template = SignInTemplate {
            theme: public_theme(&state),
            title: "Anmelden".to_string(),
            error: Some(message.to_string()),
            email: form.email.clone(),
            redirect_to: form.redirect_to.clone(),
        };
        let html = template.render().unwrap_or_else(|e| format!("Error: {}", e));
        (status, Html(html)).into_response()
    };

    let user = match authenticate(&state.db, &form.email, &form.password).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return failed(StatusCode::UNAUTHORIZED, "E-Mail oder Passwort ist falsch.");
        }
        Err(e) => {
            error!(error = %e, "Sign-in lookup failed");
            return failed(
                StatusCode::SERVICE_UNAVAILABLE,
                "Die Anmeldung ist gerade nicht möglich. Bitte versuche es später erneut.",
            );
        }
    };

    let Some(role) = user.role_enum() else {
        warn!(user_id = %user.id, role = %user.role, "Sign-in for user without dashboard role");
        return failed(StatusCode::FORBIDDEN, "Für dieses Konto gibt es kein Dashboard.");
    };

    let token = match create_session(&state.db, &user.id, state.config.auth.session_ttl_days).await {
        Ok(token) => token,
        Err(e) => {
            error!(error = %e, "Failed to create session");
            return failed(
                StatusCode::SERVICE_UNAVAILABLE,
                "Die Anmeldung ist gerade nicht möglich. Bitte versuche es später erneut.",
            );
        }
    };
    info!(user_id = %user.id, role = %role, "User signed in");

    let redirect_to = Some(form.redirect_to.as_str()).filter(|r| !r.is_empty());
    let target = post_sign_in_target(role, redirect_to);
    let jar = jar.add(session_cookie(token, state.config.auth.secure_cookies));

    (jar, Redirect::to(&target)).into_response()
}

// Sign out: revoke the session, drop its wizard draft, clear the cookie
async fn sign_out(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    jar: CookieJar,
) -> Response {
    if let Some(token) = extract_token(&headers) {
        match resolve_session(&state.db, &token).await {
            Ok(Some(session)) => {
                state.wizards.discard(&session.session_id);
                info!(user_id = %session.user_id, "User signed out");
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Session lookup failed during sign-out"),
        }
        if let Err(e) = revoke_session(&state.db, &token).await {
            warn!(error = %e, "Failed to revoke session");
        }
    }

    (jar.add(removal_cookie()), Redirect::to("/")).into_response()
}

#[derive(Debug, Deserialize)]
struct ThemeForm {
    theme: String,
    #[serde(default)]
    redirect_to: String,
}

// Persist the dashboard theme preference
async fn set_theme(jar: CookieJar, Form(form): Form<ThemeForm>) -> Response {
    let target = local_redirect_target(&form.redirect_to).unwrap_or("/");

    match Theme::parse(&form.theme) {
        Some(theme) => (jar.add(theme::preference_cookie(theme)), Redirect::to(target)).into_response(),
        None => (StatusCode::BAD_REQUEST, "Unbekanntes Farbschema").into_response(),
    }
}
