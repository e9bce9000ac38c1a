//! Content access resolver.
//!
//! Resolves the single authoritative content record for a page type and
//! language. Resolution never fails: when storage has nothing (or cannot be
//! read) a built-in default record is returned instead.

mod defaults;

use async_trait::async_trait;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::warn;

use crate::db::{LegalContent, PageType};

pub use defaults::builtin_default;

/// Where a resolved record came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentSource {
    Stored { id: String },
    BuiltIn,
}

/// The record a page renders
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
    pub page_type: PageType,
    pub language: String,
    pub title: String,
    pub body: String,
    pub updated_at: Option<String>,
    pub source: ContentSource,
}

impl ContentRecord {
    pub fn is_builtin(&self) -> bool {
        self.source == ContentSource::BuiltIn
    }

    /// Body split into paragraphs on blank lines
    pub fn paragraphs(&self) -> Vec<String> {
        self.body
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl From<LegalContent> for ContentRecord {
    fn from(row: LegalContent) -> Self {
        Self {
            page_type: row.page_type.parse().unwrap_or(PageType::Impressum),
            language: row.language,
            title: row.title,
            body: row.body,
            updated_at: Some(row.updated_at),
            source: ContentSource::Stored { id: row.id },
        }
    }
}

/// Storage the resolver reads candidates from
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn candidates(
        &self,
        page_type: PageType,
        language: &str,
    ) -> Result<Vec<LegalContent>, sqlx::Error>;
}

#[async_trait]
impl ContentStore for SqlitePool {
    async fn candidates(
        &self,
        page_type: PageType,
        language: &str,
    ) -> Result<Vec<LegalContent>, sqlx::Error> {
        LegalContent::candidates(self, page_type, language).await
    }
}

/// Pick the current record: latest `updated_at`, then latest `created_at`,
/// then greatest id.
pub fn select_current(candidates: Vec<LegalContent>) -> Option<LegalContent> {
    candidates.into_iter().max_by(|a, b| {
        a.updated_at
            .cmp(&b.updated_at)
            .then_with(|| a.created_at.cmp(&b.created_at))
            .then_with(|| a.id.cmp(&b.id))
    })
}

/// Normalise a requested language to its lowercase primary subtag
/// (`de-DE` -> `de`), falling back to `default_language`.
pub fn normalize_language(requested: Option<&str>, default_language: &str) -> String {
    let primary = requested
        .map(str::trim)
        .and_then(|l| l.split(['-', '_']).next())
        .map(|l| l.to_ascii_lowercase())
        .filter(|l| !l.is_empty() && l.len() <= 8 && l.chars().all(|c| c.is_ascii_alphabetic()));

    primary.unwrap_or_else(|| default_language.to_ascii_lowercase())
}

/// Resolve the record to render for `(page_type, language)`.
pub async fn resolve(store: &dyn ContentStore, page_type: PageType, language: &str) -> ContentRecord {
    match store.candidates(page_type, language).await {
        Ok(candidates) => match select_current(candidates) {
            Some(row) => ContentRecord::from(row),
            None => builtin_default(page_type, language),
        },
        Err(e) => {
            warn!(
                page_type = %page_type,
                language = %language,
                error = %e,
                "Content lookup failed, serving built-in default"
            );
            builtin_default(page_type, language)
        }
    }
}
