use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::api::auth::MAX_SESSION_TTL_DAYS;
use crate::ui::Theme;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub integrations: IntegrationsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory served under /static (stylesheets, images)
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite connection string (overridden by DATABASE_URL)
    #[serde(default = "default_database_url")]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

fn default_database_url() -> String {
    "sqlite:./data/salonkit.db?mode=rwc".to_string()
}

fn default_max_connections() -> u32 {
    5
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Lifetime of a sign-in session in days
    #[serde(default = "default_session_ttl_days")]
    pub session_ttl_days: i64,
    /// Mark the session cookie `Secure` (enable behind HTTPS)
    #[serde(default)]
    pub secure_cookies: bool,
    /// Admin account created on startup when no admin exists yet
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl_days: default_session_ttl_days(),
            secure_cookies: false,
            admin_email: None,
            admin_password: None,
        }
    }
}

fn default_session_ttl_days() -> i64 {
    7
}

#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    /// Theme forced onto every public (non-dashboard) page
    #[serde(default = "default_public_theme")]
    pub public_theme: Theme,
    /// Dashboard theme for users who have not picked one
    #[serde(default = "default_dashboard_theme")]
    pub dashboard_theme: Theme,
    /// Language used when a request does not ask for one
    #[serde(default = "default_language")]
    pub default_language: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            public_theme: default_public_theme(),
            dashboard_theme: default_dashboard_theme(),
            default_language: default_language(),
        }
    }
}

fn default_public_theme() -> Theme {
    Theme::Light
}

fn default_dashboard_theme() -> Theme {
    Theme::Light
}

fn default_language() -> String {
    "de".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IntegrationsConfig {
    #[serde(default)]
    pub google_business: GoogleBusinessConfig,
}

/// Google Business Profile OAuth credentials. Any of them may be missing;
/// the integration then reports itself as not configured.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GoogleBusinessConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub redirect_uri: Option<String>,
}

pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
pub const ENV_GOOGLE_CLIENT_ID: &str = "GOOGLE_BUSINESS_CLIENT_ID";
pub const ENV_GOOGLE_CLIENT_SECRET: &str = "GOOGLE_BUSINESS_CLIENT_SECRET";
pub const ENV_GOOGLE_REDIRECT_URI: &str = "GOOGLE_BUSINESS_REDIRECT_URI";
pub const ENV_ADMIN_EMAIL: &str = "SALONKIT_ADMIN_EMAIL";
pub const ENV_ADMIN_PASSWORD: &str = "SALONKIT_ADMIN_PASSWORD";

impl Config {
    /// Load the TOML file (or defaults when it does not exist), then apply
    /// overrides from the process environment.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = Self::from_file(path)?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Reject values the server cannot run with
    pub fn validate(&self) -> Result<()> {
        let ttl = self.auth.session_ttl_days;
        if !(1..=MAX_SESSION_TTL_DAYS).contains(&ttl) {
            anyhow::bail!(
                "auth.session_ttl_days must be between 1 and {} (got {})",
                MAX_SESSION_TTL_DAYS,
                ttl
            );
        }
        Ok(())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        if path.exists() {
            info!("Loading configuration from {}", path.display());
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| "Failed to parse configuration file")?;
            Ok(config)
        } else {
            info!("No config file found, using defaults");
            Ok(Config::default())
        }
    }

    /// Apply environment overrides using `lookup` to read variables.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_DATABASE_URL).filter(|v| !v.is_empty()) {
            self.database.url = url;
        }

        let google = &mut self.integrations.google_business;
        if let Some(v) = lookup(ENV_GOOGLE_CLIENT_ID) {
            google.client_id = Some(v);
        }
        if let Some(v) = lookup(ENV_GOOGLE_CLIENT_SECRET) {
            google.client_secret = Some(v);
        }
        if let Some(v) = lookup(ENV_GOOGLE_REDIRECT_URI) {
            google.redirect_uri = Some(v);
        }

        if let Some(v) = lookup(ENV_ADMIN_EMAIL) {
            self.auth.admin_email = Some(v);
        }
        if let Some(v) = lookup(ENV_ADMIN_PASSWORD) {
            self.auth.admin_password = Some(v);
        }
    }

    pub fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
            ui: UiConfig::default(),
            logging: LoggingConfig::default(),
            integrations: IntegrationsConfig::default(),
        }
    }
}
