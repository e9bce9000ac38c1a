//! Legal and marketing content records.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

/// Page-type tag a content record is keyed by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PageType {
    /// Allgemeine Geschäftsbedingungen (terms and conditions)
    Agb,
    /// Datenschutzerklärung (privacy policy)
    Datenschutz,
    /// Impressum (legal notice)
    Impressum,
    /// Beta-program information page
    BetaProgram,
}

impl PageType {
    pub const ALL: [PageType; 4] = [
        PageType::Agb,
        PageType::Datenschutz,
        PageType::Impressum,
        PageType::BetaProgram,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PageType::Agb => "AGB",
            PageType::Datenschutz => "DATENSCHUTZ",
            PageType::Impressum => "IMPRESSUM",
            PageType::BetaProgram => "BETA_PROGRAM",
        }
    }

    /// Public route slug (`/agb`, `/datenschutz`, ...)
    pub fn slug(&self) -> &'static str {
        match self {
            PageType::Agb => "agb",
            PageType::Datenschutz => "datenschutz",
            PageType::Impressum => "impressum",
            PageType::BetaProgram => "beta",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.slug() == slug || p.as_str().eq_ignore_ascii_case(slug))
    }
}

impl std::fmt::Display for PageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_slug(&s.trim().to_lowercase())
            .ok_or_else(|| format!("Unknown page type: {}", s))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LegalContent {
    pub id: String,
    pub page_type: String,
    pub language: String,
    pub title: String,
    pub body: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Request to create a content record
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLegalContentRequest {
    pub page_type: String,
    pub language: String,
    pub title: String,
    pub body: String,
}

/// Request to update a content record
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateLegalContentRequest {
    pub title: Option<String>,
    pub body: Option<String>,
}

impl LegalContent {
    /// All records for one (page type, language) pair, current one first
    pub async fn candidates(
        db: &SqlitePool,
        page_type: PageType,
        language: &str,
    ) -> Result<Vec<LegalContent>, sqlx::Error> {
        sqlx::query_as(
            r#"
            SELECT * FROM legal_contents
            WHERE page_type = ? AND language = ?
            ORDER BY updated_at DESC, created_at DESC, id DESC
            "#,
        )
        .bind(page_type.as_str())
        .bind(language)
        .fetch_all(db)
        .await
    }

    pub async fn list_all(db: &SqlitePool) -> Result<Vec<LegalContent>, sqlx::Error> {
        sqlx::query_as(
            "SELECT * FROM legal_contents ORDER BY page_type ASC, language ASC, updated_at DESC",
        )
        .fetch_all(db)
        .await
    }

    pub async fn get(db: &SqlitePool, id: &str) -> Result<Option<LegalContent>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM legal_contents WHERE id = ?")
            .bind(id)
            .fetch_optional(db)
            .await
    }

    pub async fn create(
        db: &SqlitePool,
        page_type: PageType,
        language: &str,
        title: &str,
        body: &str,
    ) -> Result<LegalContent, sqlx::Error> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = chrono::Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO legal_contents (id, page_type, language, title, body, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(page_type.as_str())
        .bind(language)
        .bind(title)
        .bind(body)
        .bind(&now)
        .bind(&now)
        .execute(db)
        .await?;

        sqlx::query_as("SELECT * FROM legal_contents WHERE id = ?")
            .bind(&id)
            .fetch_one(db)
            .await
    }

    /// Apply the given changes and bump `updated_at`, which makes this
    /// record the current one for its page type and language.
    pub async fn update(
        db: &SqlitePool,
        id: &str,
        req: &UpdateLegalContentRequest,
    ) -> Result<Option<LegalContent>, sqlx::Error> {
        let Some(existing) = Self::get(db, id).await? else {
            return Ok(None);
        };

        let now = chrono::Utc::now().to_rfc3339();
        sqlx::query("UPDATE legal_contents SET title = ?, body = ?, updated_at = ? WHERE id = ?")
            .bind(req.title.as_deref().unwrap_or(&existing.title))
            .bind(req.body.as_deref().unwrap_or(&existing.body))
            .bind(&now)
            .bind(id)
            .execute(db)
            .await?;

        Self::get(db, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_type_slugs() {
        assert_eq!(PageType::from_slug("agb"), Some(PageType::Agb));
        assert_eq!(PageType::from_slug("beta"), Some(PageType::BetaProgram));
        assert_eq!(PageType::from_slug("IMPRESSUM"), Some(PageType::Impressum));
        assert_eq!(PageType::from_slug("faq"), None);
    }

    #[test]
    fn test_page_type_from_str_is_case_insensitive() {
        assert_eq!("Datenschutz".parse::<PageType>().unwrap(), PageType::Datenschutz);
        assert_eq!("beta_program".parse::<PageType>().unwrap(), PageType::BetaProgram);
    }
}
