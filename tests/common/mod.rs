//! Shared fixtures for the HTTP-level tests.
#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;
use tower::ServiceExt;

use salonkit::api::auth::{create_session, hash_password, SESSION_COOKIE};
use salonkit::config::Config;
use salonkit::db::{NewUser, Role, Tenant, User};
use salonkit::{AppState, DbPool};

pub const PASSWORD: &str = "Kamm&Schere-2026";

pub struct TestApp {
    pub state: Arc<AppState>,
    pub router: Router,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(Config::default()).await
    }

    pub async fn with_config(config: Config) -> Self {
        let db = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory database");
        salonkit::db::run_migrations(&db).await.expect("migrations");

        let state = Arc::new(AppState::new(config, db));
        let router = salonkit::router(state.clone());
        Self { state, router }
    }

    pub fn db(&self) -> &DbPool {
        &self.state.db
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.expect("infallible")
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::COOKIE, session_cookie(token));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn post_form(&self, uri: &str, token: Option<&str>, form: &str) -> Response<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(token) = token {
            builder = builder.header(header::COOKIE, session_cookie(token));
        }
        self.send(builder.body(Body::from(form.to_string())).unwrap())
            .await
    }

    pub async fn tenant(&self, name: &str, slug: &str) -> Tenant {
        Tenant::create(self.db(), name, slug).await.expect("tenant")
    }

    pub async fn user(&self, email: &str, role: Role, tenant_id: Option<&str>) -> User {
        User::create(
            self.db(),
            &NewUser {
                email: email.to_string(),
                password_hash: hash_password(PASSWORD).expect("hash"),
                name: email.split('@').next().unwrap_or(email).to_string(),
                role,
                tenant_id: tenant_id.map(str::to_string),
            },
        )
        .await
        .expect("user")
    }

    /// A signed-in user of `role` and their session token
    pub async fn signed_in(&self, role: Role) -> (User, String) {
        let tenant_id = match role {
            Role::Admin => None,
            _ => Some(self.tenant("Salon Haarmonie", "haarmonie").await.id),
        };
        let email = format!("{}@salon.example", role.as_str().to_lowercase());
        let user = self.user(&email, role, tenant_id.as_deref()).await;
        let token = create_session(self.db(), &user.id, 7).await.expect("session");
        (user, token)
    }
}

pub fn session_cookie(token: &str) -> String {
    format!("{}={}", SESSION_COOKIE, token)
}

pub fn location(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

pub fn set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(str::to_string)
        .collect()
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_string(response).await).expect("json body")
}

/// `value` as Askama writes it into an HTML attribute
pub fn escaped(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
        .replace('/', "&#x2f;")
}
