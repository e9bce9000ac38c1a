use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    async_trait,
    body::Body,
    extract::{FromRequestParts, State},
    http::{header, request::Parts, HeaderMap, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use rand::Rng;
use sha2::{Digest, Sha256};
use sqlx::{FromRow, SqlitePool};
use std::convert::Infallible;
use std::sync::Arc;
use tracing::{info, warn};

use super::error::ApiError;
use super::validation::validate_email;
use crate::db::{LoginRequest, LoginResponse, NewUser, Role, SessionInfo, User, UserResponse};
use crate::AppState;

/// Cookie carrying the opaque session token for browser requests
pub const SESSION_COOKIE: &str = "salonkit_session";

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Generate a random token
fn generate_token() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();
    hex::encode(bytes)
}

/// Hash a token for storage
fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Validate password strength
/// Returns None if valid, or Some(error_message) if invalid
pub fn validate_password_strength(password: &str) -> Option<String> {
    if password.len() < 12 {
        return Some("Password must be at least 12 characters".to_string());
    }

    let has_uppercase = password.chars().any(|c| c.is_uppercase());
    let has_lowercase = password.chars().any(|c| c.is_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| !c.is_alphanumeric());

    if !has_uppercase {
        return Some("Password must contain at least one uppercase letter".to_string());
    }
    if !has_lowercase {
        return Some("Password must contain at least one lowercase letter".to_string());
    }
    if !has_digit {
        return Some("Password must contain at least one digit".to_string());
    }
    if !has_special {
        return Some("Password must contain at least one special character".to_string());
    }

    // Check for common weak passwords
    let common_passwords = [
        "password123!", "Password123!", "Admin123!@#", "Welcome123!",
        "Qwerty123!@#", "Changeme123!", "Letmein123!@", "Friseur123!",
    ];
    let lower = password.to_lowercase();
    for common in common_passwords {
        if lower.contains(&common.to_lowercase()) {
            return Some("Password is too common. Please choose a stronger password.".to_string());
        }
    }

    None
}

/// Look up a user by email and check the password
pub async fn authenticate(
    db: &SqlitePool,
    email: &str,
    password: &str,
) -> Result<Option<User>, sqlx::Error> {
    let Some(user) = User::find_by_email(db, email).await? else {
        return Ok(None);
    };

    if verify_password(password, &user.password_hash) {
        Ok(Some(user))
    } else {
        Ok(None)
    }
}

/// Upper bound for a session lifetime, whatever the config says
pub const MAX_SESSION_TTL_DAYS: i64 = 365;

fn session_expiry(
    now: chrono::DateTime<chrono::Utc>,
    ttl_days: i64,
) -> chrono::DateTime<chrono::Utc> {
    now + chrono::Duration::days(ttl_days.clamp(1, MAX_SESSION_TTL_DAYS))
}

/// Create a session for `user_id` and return the plaintext token. Only the
/// token's hash is stored.
pub async fn create_session(
    db: &SqlitePool,
    user_id: &str,
    ttl_days: i64,
) -> Result<String, sqlx::Error> {
    let token = generate_token();
    let token_hash = hash_token(&token);

    let now = chrono::Utc::now();
    let expires_at = session_expiry(now, ttl_days).to_rfc3339();

    let session_id = uuid::Uuid::new_v4().to_string();
    sqlx::query(
        "INSERT INTO sessions (id, user_id, token_hash, expires_at, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&session_id)
    .bind(user_id)
    .bind(&token_hash)
    .bind(&expires_at)
    .bind(now.to_rfc3339())
    .execute(db)
    .await?;

    Ok(token)
}

#[derive(FromRow)]
struct SessionRow {
    session_id: String,
    user_id: String,
    email: String,
    name: String,
    role: String,
    tenant_id: Option<String>,
}

/// Resolve a token to its live session. Expired sessions and sessions
/// whose user carries an unknown role resolve to `None`.
pub async fn resolve_session(
    db: &SqlitePool,
    token: &str,
) -> Result<Option<SessionInfo>, sqlx::Error> {
    let token_hash = hash_token(token);
    let now = chrono::Utc::now().to_rfc3339();

    let row: Option<SessionRow> = sqlx::query_as(
        r#"
        SELECT s.id AS session_id, u.id AS user_id, u.email, u.name, u.role, u.tenant_id
        FROM sessions s
        JOIN users u ON u.id = s.user_id
        WHERE s.token_hash = ? AND s.expires_at > ?
        "#,
    )
    .bind(&token_hash)
    .bind(&now)
    .fetch_optional(db)
    .await?;

    Ok(row.and_then(|row| {
        let role = match row.role.parse::<Role>() {
            Ok(role) => role,
            Err(_) => {
                warn!(user_id = %row.user_id, role = %row.role, "Session user has an unknown role");
                return None;
            }
        };
        Some(SessionInfo {
            session_id: row.session_id,
            user_id: row.user_id,
            email: row.email,
            name: row.name,
            role,
            tenant_id: row.tenant_id,
        })
    }))
}

/// Delete the session behind `token`
pub async fn revoke_session(db: &SqlitePool, token: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM sessions WHERE token_hash = ?")
        .bind(hash_token(token))
        .execute(db)
        .await?;
    Ok(())
}

/// Delete expired sessions, returning how many were removed
pub async fn purge_expired_sessions(db: &SqlitePool) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
        .bind(chrono::Utc::now().to_rfc3339())
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}

/// Create the bootstrap admin account when credentials are configured and no
/// admin exists yet.
pub async fn ensure_admin_user(
    db: &SqlitePool,
    email: Option<&str>,
    password: Option<&str>,
) -> anyhow::Result<()> {
    let (Some(email), Some(password)) = (email, password) else {
        return Ok(());
    };

    if User::count_with_role(db, Role::Admin).await? > 0 {
        return Ok(());
    }

    if let Err(e) = validate_email(email) {
        anyhow::bail!("Bootstrap admin email is invalid: {}", e);
    }
    if let Some(error) = validate_password_strength(password) {
        anyhow::bail!("Bootstrap admin password is too weak: {}", error);
    }

    let password_hash = hash_password(password)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;

    User::create(
        db,
        &NewUser {
            email: email.to_string(),
            password_hash,
            name: "Administrator".to_string(),
            role: Role::Admin,
            tenant_id: None,
        },
    )
    .await?;

    info!(email = %email, "Created bootstrap admin user");
    Ok(())
}

/// Build the session cookie for `token`. Expiry is enforced server side.
pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .build()
}

/// A cookie that clears the session cookie
pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, "")).path("/").build()
}

/// Extract the token from request headers: bearer first, then the session
/// cookie.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(auth_header) = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    {
        if let Some(token) = auth_header.strip_prefix("Bearer ") {
            let token = token.trim();
            if !token.is_empty() {
                return Some(token.to_string());
            }
        }
    }

    CookieJar::from_headers(headers)
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

/// Resolve the caller's session from headers. Storage errors are logged and
/// treated as "no session".
pub async fn session_from_headers(db: &SqlitePool, headers: &HeaderMap) -> Option<SessionInfo> {
    let token = extract_token(headers)?;
    match resolve_session(db, &token).await {
        Ok(session) => session,
        Err(e) => {
            warn!(error = %e, "Session lookup failed");
            None
        }
    }
}

/// The caller's session when there is one
pub struct OptionalSession(pub Option<SessionInfo>);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for OptionalSession {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        if let Some(session) = parts.extensions.get::<SessionInfo>() {
            return Ok(OptionalSession(Some(session.clone())));
        }
        Ok(OptionalSession(session_from_headers(&state.db, &parts.headers).await))
    }
}

/// Extractor for the current authenticated session
#[async_trait]
impl FromRequestParts<Arc<AppState>> for SessionInfo {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        if let Some(session) = parts.extensions.get::<SessionInfo>() {
            return Ok(session.clone());
        }
        session_from_headers(&state.db, &parts.headers)
            .await
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))
    }
}

/// Admin-only middleware: 401 without a session, 403 for other roles
pub async fn admin_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let session = session_from_headers(&state.db, request.headers())
        .await
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

    if session.role != Role::Admin {
        return Err(ApiError::forbidden("Admin access required"));
    }

    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}

/// Login endpoint
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), ApiError> {
    let user = authenticate(&state.db, &request.email, &request.password)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    if user.role_enum().is_none() {
        return Err(ApiError::forbidden("Account has no dashboard role"));
    }

    let ttl_days = state.config.auth.session_ttl_days;
    let token = create_session(&state.db, &user.id, ttl_days).await?;
    info!(user_id = %user.id, "User signed in");

    let jar = jar.add(session_cookie(token.clone(), state.config.auth.secure_cookies));

    Ok((
        jar,
        Json(LoginResponse {
            token,
            user: UserResponse::from(user),
        }),
    ))
}

/// Logout endpoint. Also drops any homepage wizard draft of the session.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(token) = extract_token(&headers) {
        if let Some(session) = resolve_session(&state.db, &token).await? {
            state.wizards.discard(&session.session_id);
        }
        revoke_session(&state.db, &token).await?;
    }

    Ok((jar.add(removal_cookie()), StatusCode::NO_CONTENT))
}

/// Current session endpoint
pub async fn current_session(session: SessionInfo) -> Json<SessionInfo> {
    Json(session)
}
