//! Published homepages produced by the homepage wizard.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use thiserror::Error;

use super::Role;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Homepage {
    pub id: String,
    pub tenant_id: String,
    pub owner_role: String,
    pub template: String,
    /// JSON array of section keys, in display order
    pub sections: String,
    pub display_name: String,
    pub tagline: String,
    pub primary_color: String,
    pub logo_url: Option<String>,
    pub slug: String,
    pub published_at: String,
    pub created_at: String,
    pub updated_at: String,
}

impl Homepage {
    pub fn section_keys(&self) -> Vec<String> {
        serde_json::from_str(&self.sections).unwrap_or_default()
    }
}

/// Public representation of a published homepage
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomepageResponse {
    pub id: String,
    pub slug: String,
    pub template: String,
    pub sections: Vec<String>,
    pub display_name: String,
    pub tagline: String,
    pub primary_color: String,
    pub logo_url: Option<String>,
    pub published_at: String,
}

impl From<Homepage> for HomepageResponse {
    fn from(page: Homepage) -> Self {
        let sections = page.section_keys();
        Self {
            id: page.id,
            slug: page.slug,
            template: page.template,
            sections,
            display_name: page.display_name,
            tagline: page.tagline,
            primary_color: page.primary_color,
            logo_url: page.logo_url,
            published_at: page.published_at,
        }
    }
}

/// A fully validated draft ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct HomepagePublish {
    pub tenant_id: String,
    pub owner_role: Role,
    pub template: String,
    pub sections: Vec<String>,
    pub display_name: String,
    pub tagline: String,
    pub primary_color: String,
    pub logo_url: Option<String>,
    pub slug: String,
}

#[derive(Debug, Error)]
pub enum HomepageError {
    #[error("the address '{0}' is already used by another homepage")]
    SlugTaken(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Homepage {
    pub async fn find_by_slug(db: &SqlitePool, slug: &str) -> Result<Option<Homepage>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM homepages WHERE slug = ?")
            .bind(slug)
            .fetch_optional(db)
            .await
    }

    pub async fn find_for_owner(
        db: &SqlitePool,
        tenant_id: &str,
        role: Role,
    ) -> Result<Option<Homepage>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM homepages WHERE tenant_id = ? AND owner_role = ?")
            .bind(tenant_id)
            .bind(role.as_str())
            .fetch_optional(db)
            .await
    }

    /// Create the homepage for `(tenant, role)` or replace its content, in
    /// one transaction. The slug must not belong to a different owner.
    pub async fn publish(db: &SqlitePool, page: &HomepagePublish) -> Result<Homepage, HomepageError> {
        let mut tx = db.begin().await?;

        let slug_owner: Option<(String,)> = sqlx::query_as(
            "SELECT id FROM homepages WHERE slug = ? AND NOT (tenant_id = ? AND owner_role = ?)",
        )
        .bind(&page.slug)
        .bind(&page.tenant_id)
        .bind(page.owner_role.as_str())
        .fetch_optional(&mut *tx)
        .await?;

        if slug_owner.is_some() {
            return Err(HomepageError::SlugTaken(page.slug.clone()));
        }

        let id = uuid::Uuid::new_v4().to_string();
        let now = chrono::Utc::now().to_rfc3339();
        let sections = serde_json::to_string(&page.sections).unwrap_or_else(|_| "[]".to_string());

        sqlx::query(
            r#"
            INSERT INTO homepages (
                id, tenant_id, owner_role, template, sections, display_name, tagline,
                primary_color, logo_url, slug, published_at, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (tenant_id, owner_role) DO UPDATE SET
                template = excluded.template,
                sections = excluded.sections,
                display_name = excluded.display_name,
                tagline = excluded.tagline,
                primary_color = excluded.primary_color,
                logo_url = excluded.logo_url,
                slug = excluded.slug,
                published_at = excluded.published_at,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&id)
        .bind(&page.tenant_id)
        .bind(page.owner_role.as_str())
        .bind(&page.template)
        .bind(&sections)
        .bind(&page.display_name)
        .bind(&page.tagline)
        .bind(&page.primary_color)
        .bind(&page.logo_url)
        .bind(&page.slug)
        .bind(&now)
        .bind(&now)
        .bind(&now)
        .execute(&mut *tx)
        .await?;

        let stored: Homepage =
            sqlx::query_as("SELECT * FROM homepages WHERE tenant_id = ? AND owner_role = ?")
                .bind(&page.tenant_id)
                .bind(page.owner_role.as_str())
                .fetch_one(&mut *tx)
                .await?;

        tx.commit().await?;
        Ok(stored)
    }
}
