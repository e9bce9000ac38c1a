//! Approach cards shown on the marketing home page.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApproachCard {
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon_name: String,
    pub sort_order: i64,
    pub is_active: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Public shape of a card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproachCardResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon_name: String,
    pub sort_order: i64,
}

impl From<ApproachCard> for ApproachCardResponse {
    fn from(card: ApproachCard) -> Self {
        Self {
            id: card.id,
            title: card.title,
            description: card.description,
            icon_name: card.icon_name,
            sort_order: card.sort_order,
        }
    }
}

/// Admin view including the inactive flag and timestamps
#[derive(Debug, Clone, Serialize)]
pub struct ApproachCardDetail {
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon_name: String,
    pub sort_order: i64,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<ApproachCard> for ApproachCardDetail {
    fn from(card: ApproachCard) -> Self {
        Self {
            id: card.id,
            title: card.title,
            description: card.description,
            icon_name: card.icon_name,
            sort_order: card.sort_order,
            is_active: card.is_active != 0,
            created_at: card.created_at,
            updated_at: card.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateApproachCardRequest {
    pub title: String,
    pub description: String,
    pub icon_name: String,
    #[serde(default)]
    pub sort_order: i64,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateApproachCardRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub icon_name: Option<String>,
    pub sort_order: Option<i64>,
    pub is_active: Option<bool>,
}

impl ApproachCard {
    /// Active cards in display order: `sort_order` ascending, newest first on ties
    pub async fn list_active(db: &SqlitePool) -> Result<Vec<ApproachCard>, sqlx::Error> {
        sqlx::query_as(
            r#"
            SELECT * FROM approach_cards
            WHERE is_active = 1
            ORDER BY sort_order ASC, created_at DESC, id ASC
            "#,
        )
        .fetch_all(db)
        .await
    }

    pub async fn list_all(db: &SqlitePool) -> Result<Vec<ApproachCard>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM approach_cards ORDER BY sort_order ASC, created_at DESC")
            .fetch_all(db)
            .await
    }

    pub async fn get(db: &SqlitePool, id: &str) -> Result<Option<ApproachCard>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM approach_cards WHERE id = ?")
            .bind(id)
            .fetch_optional(db)
            .await
    }

    pub async fn count(db: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM approach_cards")
            .fetch_one(db)
            .await
    }

    pub async fn create(
        db: &SqlitePool,
        req: &CreateApproachCardRequest,
    ) -> Result<ApproachCard, sqlx::Error> {
        let now = chrono::Utc::now().to_rfc3339();
        Self::insert_at(db, req, &now).await
    }

    /// Insert with an explicit creation timestamp (seeding, imports)
    pub async fn insert_at(
        db: &SqlitePool,
        req: &CreateApproachCardRequest,
        created_at: &str,
    ) -> Result<ApproachCard, sqlx::Error> {
        let id = uuid::Uuid::new_v4().to_string();

        sqlx::query(
            r#"
            INSERT INTO approach_cards (id, title, description, icon_name, sort_order, is_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&req.title)
        .bind(&req.description)
        .bind(&req.icon_name)
        .bind(req.sort_order)
        .bind(req.is_active as i64)
        .bind(created_at)
        .bind(created_at)
        .execute(db)
        .await?;

        sqlx::query_as("SELECT * FROM approach_cards WHERE id = ?")
            .bind(&id)
            .fetch_one(db)
            .await
    }

    pub async fn update(
        db: &SqlitePool,
        id: &str,
        req: &UpdateApproachCardRequest,
    ) -> Result<Option<ApproachCard>, sqlx::Error> {
        let Some(existing) = Self::get(db, id).await? else {
            return Ok(None);
        };

        let now = chrono::Utc::now().to_rfc3339();
        let is_active = req.is_active.map(|a| a as i64).unwrap_or(existing.is_active);

        sqlx::query(
            r#"
            UPDATE approach_cards
            SET title = ?, description = ?, icon_name = ?, sort_order = ?, is_active = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(req.title.as_deref().unwrap_or(&existing.title))
        .bind(req.description.as_deref().unwrap_or(&existing.description))
        .bind(req.icon_name.as_deref().unwrap_or(&existing.icon_name))
        .bind(req.sort_order.unwrap_or(existing.sort_order))
        .bind(is_active)
        .bind(&now)
        .bind(id)
        .execute(db)
        .await?;

        Self::get(db, id).await
    }

    /// Returns whether a card was deleted
    pub async fn delete(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM approach_cards WHERE id = ?")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
