// Dashboard pages. All handlers except the newsletter redirect and the
// fallback sit behind `shell::role_gate`.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Redirect, Response},
    Extension,
};
use std::sync::Arc;
use tracing::warn;

use super::render_template;
use super::shell::{evaluate, DashboardContext, GateOutcome};
use super::templates::{
    AdminContentTemplate, DashboardHomeTemplate, HomepageOverviewTemplate, HomepageSummary,
    NewsletterEditTemplate, Tile,
};
use crate::access::newsletter_edit_path;
use crate::db::{ApproachCard, ApproachCardDetail, Homepage, LegalContent, Role};
use crate::wizard::{SectionKind, WizardConfig};
use crate::AppState;

fn tiles_for(ctx: &DashboardContext) -> Vec<Tile> {
    let base = ctx.profile.base_url;
    match ctx.session.role {
        Role::SalonOwner => vec![
            Tile {
                label: "Salon-Homepage",
                description: "Vorlage, Bereiche und Branding deiner Salon-Website.",
                href: format!("{}/marketing/homepage", base),
            },
            Tile {
                label: "Homepage-Assistent",
                description: "Neue Homepage in vier Schritten erstellen.",
                href: format!("{}/marketing/homepage/create", base),
            },
        ],
        Role::Stylist => vec![
            Tile {
                label: "Profilseite",
                description: "Deine persönliche Seite mit Leistungen und Buchung.",
                href: format!("{}/marketing/homepage", base),
            },
            Tile {
                label: "Profil-Assistent",
                description: "Profilseite Schritt für Schritt anlegen.",
                href: format!("{}/marketing/homepage/create", base),
            },
        ],
        Role::Admin => vec![Tile {
            label: "Inhalte",
            description: "Rechtstexte und Karten der Startseite.",
            href: format!("{}/content", base),
        }],
    }
}

/// Role home page (`/salon`, `/stylist`, `/admin`)
pub async fn home(Extension(ctx): Extension<DashboardContext>) -> Response {
    render_template(DashboardHomeTemplate {
        shell: ctx.shell(ctx.profile.base_url),
        title: "Übersicht".to_string(),
        greeting: format!("Hallo {}", ctx.session.name),
        tiles: tiles_for(&ctx),
    })
}

/// Published homepage of the signed-in owner, if any
pub async fn homepage_overview(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<DashboardContext>,
) -> Response {
    let Some(config) = WizardConfig::for_role(ctx.session.role) else {
        return Redirect::to(ctx.profile.base_url).into_response();
    };

    let homepage = match ctx.session.tenant_id.as_deref() {
        Some(tenant_id) => Homepage::find_for_owner(&state.db, tenant_id, ctx.session.role)
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "Failed to load homepage");
                None
            }),
        None => None,
    };

    let summary = homepage.map(|page| {
        let sections = page
            .section_keys()
            .iter()
            .map(|key| {
                SectionKind::parse(key)
                    .map(|k| k.label().to_string())
                    .unwrap_or_else(|| key.clone())
            })
            .collect();
        HomepageSummary {
            display_name: page.display_name,
            tagline: page.tagline,
            template: page.template,
            sections,
            primary_color: page.primary_color,
            slug: page.slug,
            published_at: page.published_at,
        }
    });

    render_template(HomepageOverviewTemplate {
        shell: ctx.shell(&config.redirect_after_publish()),
        title: config.heading().to_string(),
        homepage: summary,
        create_path: config.entry_path(),
        can_publish: ctx.session.tenant_id.is_some(),
    })
}

/// Admin overview of approach cards and legal content records
pub async fn admin_content(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<DashboardContext>,
) -> Response {
    let cards = ApproachCard::list_all(&state.db).await.unwrap_or_else(|e| {
        warn!(error = %e, "Failed to list approach cards");
        Vec::new()
    });
    let contents = LegalContent::list_all(&state.db).await.unwrap_or_else(|e| {
        warn!(error = %e, "Failed to list legal content");
        Vec::new()
    });

    render_template(AdminContentTemplate {
        shell: ctx.shell(&format!("{}/content", ctx.profile.base_url)),
        title: "Inhalte".to_string(),
        cards: cards.into_iter().map(ApproachCardDetail::from).collect(),
        contents,
    })
}

/// GET /admin/marketing/newsletter/:id/edit
pub async fn newsletter_edit(
    Extension(ctx): Extension<DashboardContext>,
    Path(id): Path<String>,
) -> Response {
    render_template(NewsletterEditTemplate {
        shell: ctx.shell(&newsletter_edit_path(&id)),
        title: "Newsletter bearbeiten".to_string(),
        newsletter_id: id,
    })
}

/// GET /admin/marketing/newsletter/:id always lands on the edit page
pub async fn newsletter_redirect(Path(id): Path<String>) -> Redirect {
    Redirect::to(&newsletter_edit_path(&id))
}

/// Unmatched paths. Dashboard paths still go through the role router so a
/// wrong role or missing session is redirected rather than told "not found".
pub async fn fallback(
    State(state): State<Arc<AppState>>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    match evaluate(&state, &uri, &headers).await {
        GateOutcome::Redirect(target) => Redirect::to(&target).into_response(),
        GateOutcome::Allowed(_) | GateOutcome::NotDashboard => {
            (StatusCode::NOT_FOUND, "Seite nicht gefunden").into_response()
        }
    }
}
