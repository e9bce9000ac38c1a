// Askama template definitions

use askama::Template;

use super::shell::ShellContext;
use super::theme::ThemeContext;
use super::wizard::WizardView;
use crate::content::ContentRecord;
use crate::db::{ApproachCardDetail, ApproachCardResponse, LegalContent};

/// Custom filters for Askama templates
mod filters {
    /// Shorten to `len` characters, never splitting a character
    pub fn excerpt(s: &str, len: usize) -> ::askama::Result<String> {
        if s.chars().count() <= len {
            Ok(s.to_string())
        } else {
            Ok(format!("{}...", s.chars().take(len).collect::<String>()))
        }
    }

    /// RFC 3339 timestamp as a German date (`17.10.2026`)
    pub fn date(s: &str) -> ::askama::Result<String> {
        Ok(chrono::DateTime::parse_from_rfc3339(s)
            .map(|d| d.format("%d.%m.%Y").to_string())
            .unwrap_or_else(|_| s.to_string()))
    }
}

// Link back into the dashboard for signed-in visitors
pub struct DashboardLink {
    pub href: String,
    pub name: String,
}

// Marketing home page
#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub theme: ThemeContext,
    pub title: String,
    pub cards: Vec<ApproachCardResponse>,
    pub dashboard: Option<DashboardLink>,
}

// Legal and beta pages
#[derive(Template)]
#[template(path = "legal.html")]
pub struct LegalTemplate {
    pub theme: ThemeContext,
    pub title: String,
    pub record: ContentRecord,
    pub paragraphs: Vec<String>,
}

// Sign-in form
#[derive(Template)]
#[template(path = "sign_in.html")]
pub struct SignInTemplate {
    pub theme: ThemeContext,
    pub title: String,
    pub error: Option<String>,
    pub email: String,
    pub redirect_to: String,
}

// Dashboard tile linking to a section
pub struct Tile {
    pub label: &'static str,
    pub description: &'static str,
    pub href: String,
}

// Role home page
#[derive(Template)]
#[template(path = "dashboard_home.html")]
pub struct DashboardHomeTemplate {
    pub shell: ShellContext,
    pub title: String,
    pub greeting: String,
    pub tiles: Vec<Tile>,
}

// Published homepage, as listed on the overview
pub struct HomepageSummary {
    pub display_name: String,
    pub tagline: String,
    pub template: String,
    pub sections: Vec<String>,
    pub primary_color: String,
    pub slug: String,
    pub published_at: String,
}

// Homepage overview
#[derive(Template)]
#[template(path = "homepage_overview.html")]
pub struct HomepageOverviewTemplate {
    pub shell: ShellContext,
    pub title: String,
    pub homepage: Option<HomepageSummary>,
    pub create_path: String,
    pub can_publish: bool,
}

// Homepage wizard
#[derive(Template)]
#[template(path = "wizard.html")]
pub struct WizardTemplate {
    pub shell: ShellContext,
    pub title: String,
    pub view: WizardView,
}

// Admin content overview
#[derive(Template)]
#[template(path = "admin_content.html")]
pub struct AdminContentTemplate {
    pub shell: ShellContext,
    pub title: String,
    pub cards: Vec<ApproachCardDetail>,
    pub contents: Vec<LegalContent>,
}

// Newsletter editor
#[derive(Template)]
#[template(path = "newsletter_edit.html")]
pub struct NewsletterEditTemplate {
    pub shell: ShellContext,
    pub title: String,
    pub newsletter_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excerpt_counts_characters() {
        assert_eq!(filters::excerpt("Ärger", 10).unwrap(), "Ärger");
        assert_eq!(filters::excerpt("Öffnungszeiten", 4).unwrap(), "Öffn...");
    }

    #[test]
    fn test_date_filter() {
        assert_eq!(filters::date("2026-10-17T08:30:00+00:00").unwrap(), "17.10.2026");
        assert_eq!(filters::date("gestern").unwrap(), "gestern");
    }
}
