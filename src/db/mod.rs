mod models;
mod seeders;

pub use models::*;
pub use seeders::seed_approach_cards;

use anyhow::{Context, Result};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tracing::info;

use crate::config::DatabaseConfig;

pub type DbPool = SqlitePool;

/// Tables every running instance needs; checked at startup.
pub const ESSENTIAL_TABLES: [&str; 6] = [
    "tenants",
    "users",
    "sessions",
    "legal_contents",
    "approach_cards",
    "homepages",
];

/// Execute a SQL migration file, properly handling comments
async fn execute_sql(pool: &SqlitePool, sql: &str) -> Result<()> {
    for statement in sql.split(';') {
        // Strip SQL comment lines (lines starting with --)
        let cleaned: String = statement
            .lines()
            .filter(|line| !line.trim().starts_with("--"))
            .collect::<Vec<_>>()
            .join("\n");
        let trimmed = cleaned.trim();
        if !trimmed.is_empty() {
            sqlx::query(trimmed).execute(pool).await?;
        }
    }
    Ok(())
}

pub async fn init(config: &DatabaseConfig) -> Result<DbPool> {
    info!(url = %config.url, "Initializing database");

    if let Some(dir) = database_dir(&config.url) {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create database directory {}", dir.display()))?;
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.url)
        .await
        .with_context(|| format!("Failed to connect to database at {}", config.url))?;

    // Enable WAL mode for better concurrency
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;
    sqlx::query("PRAGMA synchronous = NORMAL")
        .execute(&pool)
        .await?;

    run_migrations(&pool).await?;

    // Seed the marketing cards shown on a fresh install
    seeders::seed_approach_cards(&pool).await?;

    info!("Database initialized successfully");
    Ok(pool)
}

/// Parent directory of a file-backed SQLite URL, if it has one
fn database_dir(url: &str) -> Option<std::path::PathBuf> {
    let path = url.strip_prefix("sqlite://").or_else(|| url.strip_prefix("sqlite:"))?;
    let path = path.split('?').next()?;
    if path.is_empty() || path.starts_with(":memory:") {
        return None;
    }
    std::path::Path::new(path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(|p| p.to_path_buf())
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    info!("Running database migrations...");

    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(pool)
        .await?;

    // Migration 001: tenants, users, sessions
    execute_sql(pool, include_str!("../../migrations/001_initial.sql"))
        .await
        .context("Migration 001 failed")?;

    // Migration 002: legal content and approach cards
    execute_sql(pool, include_str!("../../migrations/002_content.sql"))
        .await
        .context("Migration 002 failed")?;

    // Migration 003: published homepages
    execute_sql(pool, include_str!("../../migrations/003_homepages.sql"))
        .await
        .context("Migration 003 failed")?;

    info!("Migrations completed");
    Ok(())
}
