//! Homepage wizard pages.
//!
//! Every POST applies one action through `wizard::reduce` and redirects back
//! (post/redirect/get), so refreshing never resubmits a step.

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Extension,
};
use axum_extra::extract::Form;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info, warn};

use super::render_template;
use super::shell::DashboardContext;
use super::templates::WizardTemplate;
use crate::db::{Homepage, HomepageError};
use crate::wizard::{
    prepare_publish, reduce, BrandingInput, FieldErrors, SectionKind, StepInput, TemplateKind,
    WizardAction, WizardConfig, WizardState, WizardStatus, WizardStep,
};
use crate::AppState;

pub struct StepView {
    pub number: usize,
    pub title: &'static str,
    pub current: bool,
    pub done: bool,
}

pub struct ChoiceView {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
    pub required: bool,
}

/// Flattened wizard state for the template
pub struct WizardView {
    pub heading: &'static str,
    pub intro: &'static str,
    pub form_action: String,
    pub step_key: &'static str,
    pub step_title: &'static str,
    pub is_first: bool,
    pub steps: Vec<StepView>,
    pub templates: Vec<ChoiceView>,
    pub sections: Vec<ChoiceView>,
    pub display_name: String,
    pub tagline: String,
    pub primary_color: String,
    pub logo_url: String,
    pub slug: String,
    pub template_label: String,
    pub section_labels: String,
    pub errors: FieldErrors,
    pub submit_error: Option<String>,
}

impl WizardView {
    pub fn build(state: &WizardState, accent_color: &str) -> Self {
        let config = &state.config;
        let draft = &state.draft;

        let steps = WizardStep::ALL
            .iter()
            .map(|step| StepView {
                number: step.index() + 1,
                title: step.title(),
                current: *step == state.step,
                done: step.index() < state.step.index(),
            })
            .collect();

        let templates = TemplateKind::ALL
            .iter()
            .map(|t| ChoiceView {
                value: t.as_str(),
                label: t.label(),
                selected: draft.template == Some(*t),
                required: false,
            })
            .collect();

        let required = config.required_sections();
        let sections = config
            .allowed_sections()
            .iter()
            .map(|s| ChoiceView {
                value: s.as_str(),
                label: s.label(),
                selected: if draft.sections.is_empty() {
                    required.contains(s)
                } else {
                    draft.sections.contains(s)
                },
                required: required.contains(s),
            })
            .collect();

        let branding = draft.branding.clone().unwrap_or_default();

        Self {
            heading: config.heading(),
            intro: config.intro(),
            form_action: config.entry_path(),
            step_key: state.step.key(),
            step_title: state.step.title(),
            is_first: state.step.previous().is_none(),
            steps,
            templates,
            sections,
            display_name: branding.display_name,
            tagline: branding.tagline,
            primary_color: if branding.primary_color.is_empty() {
                accent_color.to_string()
            } else {
                branding.primary_color
            },
            logo_url: branding.logo_url.unwrap_or_default(),
            slug: branding.slug,
            template_label: draft
                .template
                .map(|t| t.label().to_string())
                .unwrap_or_default(),
            section_labels: draft
                .sections
                .iter()
                .map(SectionKind::label)
                .collect::<Vec<_>>()
                .join(", "),
            errors: state.errors.clone(),
            submit_error: state.submit_error.clone(),
        }
    }

    pub fn has_error(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn error_for(&self, field: &str) -> String {
        self.errors
            .get(field)
            .map(|messages| messages.join(" "))
            .unwrap_or_default()
    }
}

fn wizard_config(ctx: &DashboardContext) -> Option<WizardConfig> {
    WizardConfig::for_role(ctx.session.role)
}

/// GET {base}/marketing/homepage/create
pub async fn show(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<DashboardContext>,
) -> Response {
    let Some(config) = wizard_config(&ctx) else {
        return Redirect::to(ctx.profile.base_url).into_response();
    };

    let wizard = state.wizards.load(&ctx.session.session_id, &config);
    let view = WizardView::build(&wizard, ctx.profile.accent_color);

    render_template(WizardTemplate {
        shell: ctx.shell(&config.entry_path()),
        title: config.heading().to_string(),
        view,
    })
}

#[derive(Debug, Default, Deserialize)]
pub struct WizardForm {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub template: String,
    #[serde(default)]
    pub sections: Vec<String>,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub tagline: String,
    #[serde(default)]
    pub primary_color: String,
    #[serde(default)]
    pub logo_url: String,
    #[serde(default)]
    pub slug: String,
}

impl WizardForm {
    /// The submitted values for `step`; the review step takes no input
    fn step_input(self, step: WizardStep) -> Option<StepInput> {
        match step {
            WizardStep::Template => Some(StepInput::Template {
                template: self.template,
            }),
            WizardStep::Sections => Some(StepInput::Sections {
                sections: self.sections,
            }),
            WizardStep::Branding => Some(StepInput::Branding(BrandingInput {
                display_name: self.display_name,
                tagline: self.tagline,
                primary_color: self.primary_color,
                logo_url: self.logo_url,
                slug: self.slug,
            })),
            WizardStep::Review => None,
        }
    }
}

/// POST {base}/marketing/homepage/create
pub async fn submit(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<DashboardContext>,
    Form(mut form): Form<WizardForm>,
) -> Response {
    let Some(config) = wizard_config(&ctx) else {
        return Redirect::to(ctx.profile.base_url).into_response();
    };

    let session_id = ctx.session.session_id.as_str();
    let current = state.wizards.load(session_id, &config);

    let action = std::mem::take(&mut form.action);
    let next = match action.as_str() {
        "next" => match form.step_input(current.step) {
            Some(input) => reduce(current, WizardAction::Advance(input)),
            None => current,
        },
        "back" => reduce(current, WizardAction::Back),
        "cancel" => reduce(current, WizardAction::Abandon),
        "publish" => publish(&state, &ctx, current).await,
        other => {
            warn!(action = %other, "Unknown wizard action");
            current
        }
    };

    let target = match next.status {
        WizardStatus::Editing => config.entry_path(),
        WizardStatus::Published { .. } | WizardStatus::Abandoned => {
            config.redirect_after_publish()
        }
    };
    state.wizards.save(session_id, next);

    Redirect::to(&target).into_response()
}

async fn publish(state: &AppState, ctx: &DashboardContext, current: WizardState) -> WizardState {
    if current.step != WizardStep::Review {
        return current;
    }

    let Some(tenant_id) = ctx.session.tenant_id.as_deref() else {
        let message = "Deinem Konto ist kein Salon zugeordnet.".to_string();
        return reduce(current, WizardAction::PublishFailed { message });
    };

    let page = match prepare_publish(&current, tenant_id) {
        Ok(page) => page,
        Err(errors) => {
            let fields: Vec<&str> = errors.keys().map(String::as_str).collect();
            warn!(fields = ?fields, "Homepage draft incomplete at publish");
            let message = "Bitte vervollständige alle Schritte vor dem Veröffentlichen.".to_string();
            return reduce(current, WizardAction::PublishFailed { message });
        }
    };

    match Homepage::publish(&state.db, &page).await {
        Ok(homepage) => {
            info!(
                homepage_id = %homepage.id,
                tenant_id = %homepage.tenant_id,
                slug = %homepage.slug,
                role = %page.owner_role,
                "Homepage published"
            );
            reduce(
                current,
                WizardAction::PublishSucceeded {
                    homepage_id: homepage.id,
                },
            )
        }
        Err(HomepageError::SlugTaken(slug)) => {
            let message = format!(
                "Die Adresse '{}' ist bereits vergeben. Bitte wähle im Schritt Branding eine andere.",
                slug
            );
            reduce(current, WizardAction::PublishFailed { message })
        }
        Err(HomepageError::Database(e)) => {
            error!(error = %e, "Failed to publish homepage");
            let message =
                "Die Homepage konnte nicht veröffentlicht werden. Bitte versuche es erneut.".to_string();
            reduce(current, WizardAction::PublishFailed { message })
        }
    }
}
