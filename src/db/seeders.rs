//! Database seeders for built-in data
//!
//! Fresh installs get a starter set of approach cards so the marketing home
//! page is never empty. Existing data is never touched.

use anyhow::Result;
use sqlx::SqlitePool;
use tracing::info;

use super::{ApproachCard, CreateApproachCardRequest};

/// Seed the default approach cards when the table is empty
pub async fn seed_approach_cards(pool: &SqlitePool) -> Result<()> {
    let existing = ApproachCard::count(pool).await?;
    if existing > 0 {
        return Ok(());
    }

    info!("Seeding default approach cards...");

    // Format: (title, description, icon_name, sort_order)
    let cards: Vec<(&str, &str, &str, i64)> = vec![
        (
            "Beratung zuerst",
            "Jeder Termin beginnt mit einem ehrlichen Gespräch über Haar, Stil und Alltag.",
            "message-circle",
            10,
        ),
        (
            "Transparente Preise",
            "Alle Leistungen und Preise sind vor der Buchung sichtbar, ohne Überraschungen.",
            "receipt",
            20,
        ),
        (
            "Nachhaltige Pflege",
            "Wir arbeiten mit Produkten, die Haar und Umwelt gleichermaßen schonen.",
            "leaf",
            30,
        ),
        (
            "Online buchen",
            "Freie Termine rund um die Uhr einsehen und direkt reservieren.",
            "calendar-check",
            40,
        ),
    ];

    let now = chrono::Utc::now().to_rfc3339();
    for (title, description, icon_name, sort_order) in cards {
        let req = CreateApproachCardRequest {
            title: title.to_string(),
            description: description.to_string(),
            icon_name: icon_name.to_string(),
            sort_order,
            is_active: true,
        };
        ApproachCard::insert_at(pool, &req, &now).await?;
    }

    info!("Seeded default approach cards");
    Ok(())
}
