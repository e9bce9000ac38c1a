//! Homepage builder wizard.
//!
//! The wizard is a linear sequence of steps that accumulates a
//! [`HomepageDraft`]. All transitions go through [`reduce`], a pure function
//! from `(state, action)` to the next state, so a sequence of actions can be
//! replayed deterministically. Publishing is the only side effect and is
//! performed by the caller between [`prepare_publish`] and the
//! `PublishSucceeded`/`PublishFailed` actions.

mod store;
mod validation;

use serde::Serialize;
use std::collections::BTreeMap;

use crate::access::profile_for;
use crate::db::{HomepagePublish, Role};

pub use store::WizardStore;
pub use validation::{validate_branding, validate_sections, validate_template};

/// Field name -> messages
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WizardStep {
    Template,
    Sections,
    Branding,
    Review,
}

impl WizardStep {
    pub const ALL: [WizardStep; 4] = [
        WizardStep::Template,
        WizardStep::Sections,
        WizardStep::Branding,
        WizardStep::Review,
    ];

    pub fn index(&self) -> usize {
        match self {
            WizardStep::Template => 0,
            WizardStep::Sections => 1,
            WizardStep::Branding => 2,
            WizardStep::Review => 3,
        }
    }

    pub fn next(&self) -> Option<WizardStep> {
        Self::ALL.get(self.index() + 1).copied()
    }

    pub fn previous(&self) -> Option<WizardStep> {
        self.index().checked_sub(1).map(|i| Self::ALL[i])
    }

    pub fn key(&self) -> &'static str {
        match self {
            WizardStep::Template => "template",
            WizardStep::Sections => "sections",
            WizardStep::Branding => "branding",
            WizardStep::Review => "review",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::Template => "Vorlage wählen",
            WizardStep::Sections => "Bereiche",
            WizardStep::Branding => "Branding",
            WizardStep::Review => "Überprüfen & veröffentlichen",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    Classic,
    Modern,
    Minimal,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 3] = [TemplateKind::Classic, TemplateKind::Modern, TemplateKind::Minimal];

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateKind::Classic => "classic",
            TemplateKind::Modern => "modern",
            TemplateKind::Minimal => "minimal",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TemplateKind::Classic => "Klassisch",
            TemplateKind::Modern => "Modern",
            TemplateKind::Minimal => "Minimal",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s.trim().to_lowercase())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Hero,
    About,
    Services,
    Team,
    Gallery,
    Booking,
    Contact,
}

impl SectionKind {
    pub const ALL: [SectionKind; 7] = [
        SectionKind::Hero,
        SectionKind::About,
        SectionKind::Services,
        SectionKind::Team,
        SectionKind::Gallery,
        SectionKind::Booking,
        SectionKind::Contact,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Hero => "hero",
            SectionKind::About => "about",
            SectionKind::Services => "services",
            SectionKind::Team => "team",
            SectionKind::Gallery => "gallery",
            SectionKind::Booking => "booking",
            SectionKind::Contact => "contact",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SectionKind::Hero => "Titelbild",
            SectionKind::About => "Über uns",
            SectionKind::Services => "Leistungen & Preise",
            SectionKind::Team => "Team",
            SectionKind::Gallery => "Galerie",
            SectionKind::Booking => "Online-Buchung",
            SectionKind::Contact => "Kontakt & Anfahrt",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == s.trim().to_lowercase())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Branding {
    pub display_name: String,
    pub tagline: String,
    pub primary_color: String,
    pub logo_url: Option<String>,
    pub slug: String,
}

/// The in-progress homepage, owned by one session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HomepageDraft {
    pub template: Option<TemplateKind>,
    pub sections: Vec<SectionKind>,
    pub branding: Option<Branding>,
}

/// Raw branding form values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrandingInput {
    pub display_name: String,
    pub tagline: String,
    pub primary_color: String,
    pub logo_url: String,
    pub slug: String,
}

/// What the user submitted on a step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepInput {
    Template { template: String },
    Sections { sections: Vec<String> },
    Branding(BrandingInput),
}

impl StepInput {
    fn step(&self) -> WizardStep {
        match self {
            StepInput::Template { .. } => WizardStep::Template,
            StepInput::Sections { .. } => WizardStep::Sections,
            StepInput::Branding(_) => WizardStep::Branding,
        }
    }
}

/// Role-specific wizard parameters. They select copy, section rules and the
/// redirect target; the step sequence is the same for every role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardConfig {
    pub role: Role,
    pub base_path: String,
}

static SALON_SECTIONS: [SectionKind; 7] = SectionKind::ALL;
static SALON_REQUIRED: [SectionKind; 3] = [SectionKind::Hero, SectionKind::Services, SectionKind::Contact];
static STYLIST_SECTIONS: [SectionKind; 6] = [
    SectionKind::Hero,
    SectionKind::About,
    SectionKind::Services,
    SectionKind::Gallery,
    SectionKind::Booking,
    SectionKind::Contact,
];
static STYLIST_REQUIRED: [SectionKind; 2] = [SectionKind::Hero, SectionKind::About];

impl WizardConfig {
    /// Only salon owners and stylists build homepages
    pub fn for_role(role: Role) -> Option<Self> {
        match role {
            Role::SalonOwner | Role::Stylist => Some(Self {
                role,
                base_path: profile_for(role).base_url.to_string(),
            }),
            Role::Admin => None,
        }
    }

    pub fn allowed_sections(&self) -> &'static [SectionKind] {
        match self.role {
            Role::Stylist => &STYLIST_SECTIONS,
            _ => &SALON_SECTIONS,
        }
    }

    pub fn required_sections(&self) -> &'static [SectionKind] {
        match self.role {
            Role::Stylist => &STYLIST_REQUIRED,
            _ => &SALON_REQUIRED,
        }
    }

    pub fn heading(&self) -> &'static str {
        match self.role {
            Role::Stylist => "Deine persönliche Profilseite",
            _ => "Die Homepage für deinen Salon",
        }
    }

    pub fn intro(&self) -> &'static str {
        match self.role {
            Role::Stylist => "Zeig Kundinnen und Kunden, wer du bist und was du am besten kannst.",
            _ => "In wenigen Schritten zur eigenen Salon-Website mit Leistungen, Team und Online-Buchung.",
        }
    }

    pub fn entry_path(&self) -> String {
        format!("{}/marketing/homepage/create", self.base_path)
    }

    pub fn redirect_after_publish(&self) -> String {
        format!("{}/marketing/homepage", self.base_path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardStatus {
    Editing,
    Published { homepage_id: String },
    Abandoned,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardState {
    pub config: WizardConfig,
    pub step: WizardStep,
    pub draft: HomepageDraft,
    pub errors: FieldErrors,
    pub submit_error: Option<String>,
    pub status: WizardStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardAction {
    Advance(StepInput),
    Back,
    PublishSucceeded { homepage_id: String },
    PublishFailed { message: String },
    Abandon,
}

impl WizardState {
    pub fn new(config: WizardConfig) -> Self {
        Self {
            config,
            step: WizardStep::Template,
            draft: HomepageDraft::default(),
            errors: FieldErrors::new(),
            submit_error: None,
            status: WizardStatus::Editing,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status != WizardStatus::Editing
    }
}

fn single_error(field: &str, message: impl Into<String>) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.insert(field.to_string(), vec![message.into()]);
    errors
}

/// Apply `action` to `state`, returning the next state.
pub fn reduce(state: WizardState, action: WizardAction) -> WizardState {
    if state.is_terminal() {
        return state;
    }

    match action {
        WizardAction::Advance(input) => advance(state, input),
        WizardAction::Back => match state.step.previous() {
            Some(previous) => WizardState {
                step: previous,
                errors: FieldErrors::new(),
                submit_error: None,
                ..state
            },
            None => WizardState {
                errors: FieldErrors::new(),
                ..state
            },
        },
        // Publishing only ever happens from the review step
        WizardAction::PublishSucceeded { .. } | WizardAction::PublishFailed { .. }
            if state.step != WizardStep::Review =>
        {
            state
        }
        WizardAction::PublishSucceeded { homepage_id } => WizardState {
            errors: FieldErrors::new(),
            submit_error: None,
            status: WizardStatus::Published { homepage_id },
            ..state
        },
        WizardAction::PublishFailed { message } => WizardState {
            submit_error: Some(message),
            ..state
        },
        WizardAction::Abandon => WizardState {
            draft: HomepageDraft::default(),
            errors: FieldErrors::new(),
            submit_error: None,
            status: WizardStatus::Abandoned,
            ..state
        },
    }
}

fn advance(state: WizardState, input: StepInput) -> WizardState {
    let Some(next) = state.step.next() else {
        return state;
    };

    if input.step() != state.step {
        return WizardState {
            errors: single_error("step", "Die Eingaben gehören nicht zu diesem Schritt."),
            ..state
        };
    }

    let mut draft = state.draft.clone();
    let merged = match input {
        StepInput::Template { template } => {
            validate_template(&template).map(|t| draft.template = Some(t))
        }
        StepInput::Sections { sections } => {
            validate_sections(&sections, &state.config).map(|s| draft.sections = s)
        }
        StepInput::Branding(branding) => {
            validate_branding(&branding).map(|b| draft.branding = Some(b))
        }
    };

    match merged {
        Ok(()) => WizardState {
            step: next,
            draft,
            errors: FieldErrors::new(),
            submit_error: None,
            ..state
        },
        Err(errors) => WizardState { errors, ..state },
    }
}

/// Validate the complete draft and turn it into a write for `tenant_id`.
pub fn prepare_publish(state: &WizardState, tenant_id: &str) -> Result<HomepagePublish, FieldErrors> {
    let mut errors = FieldErrors::new();
    let draft = &state.draft;

    if draft.template.is_none() {
        errors.insert("template".to_string(), vec!["Bitte wähle eine Vorlage.".to_string()]);
    }

    let section_keys: Vec<String> = draft.sections.iter().map(|s| s.as_str().to_string()).collect();
    if let Err(section_errors) = validate_sections(&section_keys, &state.config) {
        errors.extend(section_errors);
    }

    let branding = match &draft.branding {
        Some(b) => Some(b),
        None => {
            errors.insert("display_name".to_string(), vec!["Bitte ergänze das Branding.".to_string()]);
            None
        }
    };

    match (draft.template, branding) {
        (Some(template), Some(branding)) if errors.is_empty() => Ok(HomepagePublish {
            tenant_id: tenant_id.to_string(),
            owner_role: state.config.role,
            template: template.as_str().to_string(),
            sections: section_keys,
            display_name: branding.display_name.clone(),
            tagline: branding.tagline.clone(),
            primary_color: branding.primary_color.clone(),
            logo_url: branding.logo_url.clone(),
            slug: branding.slug.clone(),
        }),
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn salon() -> WizardState {
        WizardState::new(WizardConfig::for_role(Role::SalonOwner).unwrap())
    }

    fn template(t: &str) -> WizardAction {
        WizardAction::Advance(StepInput::Template { template: t.to_string() })
    }

    fn sections(keys: &[&str]) -> WizardAction {
        WizardAction::Advance(StepInput::Sections {
            sections: keys.iter().map(|k| k.to_string()).collect(),
        })
    }

    fn branding(name: &str, slug: &str) -> WizardAction {
        WizardAction::Advance(StepInput::Branding(BrandingInput {
            display_name: name.to_string(),
            tagline: "Schnitt mit Haltung".to_string(),
            primary_color: "#aa3366".to_string(),
            logo_url: String::new(),
            slug: slug.to_string(),
        }))
    }

    fn replay(actions: Vec<WizardAction>) -> WizardState {
        actions.into_iter().fold(salon(), reduce)
    }

    #[test]
    fn test_step_sequence() {
        assert_eq!(WizardStep::Template.next(), Some(WizardStep::Sections));
        assert_eq!(WizardStep::Review.next(), None);
        assert_eq!(WizardStep::Template.previous(), None);
        assert_eq!(WizardStep::Review.previous(), Some(WizardStep::Branding));
    }

    #[test]
    fn test_admin_has_no_wizard() {
        assert!(WizardConfig::for_role(Role::Admin).is_none());
        let stylist = WizardConfig::for_role(Role::Stylist).unwrap();
        assert_eq!(stylist.base_path, "/stylist");
        assert_eq!(stylist.entry_path(), "/stylist/marketing/homepage/create");
        assert_eq!(stylist.redirect_after_publish(), "/stylist/marketing/homepage");
    }

    #[test]
    fn test_full_flow_reaches_review() {
        let state = replay(vec![
            template("modern"),
            sections(&["hero", "services", "contact"]),
            branding("Salon Haarmonie", "haarmonie"),
        ]);

        assert_eq!(state.step, WizardStep::Review);
        assert!(state.errors.is_empty());
        assert_eq!(state.draft.template, Some(TemplateKind::Modern));
        assert_eq!(
            state.draft.sections,
            vec![SectionKind::Hero, SectionKind::Services, SectionKind::Contact]
        );
        assert_eq!(state.draft.branding.as_ref().unwrap().slug, "haarmonie");
    }

    #[test]
    fn test_invalid_input_keeps_step_and_earlier_data() {
        let before = replay(vec![template("classic")]);
        let after = reduce(before.clone(), sections(&["hero"]));

        assert_eq!(after.step, WizardStep::Sections);
        assert_eq!(after.draft, before.draft);
        assert!(after.errors.contains_key("sections"));
    }

    #[test]
    fn test_invalid_branding_reports_fields() {
        let before = replay(vec![template("classic"), sections(&["hero", "services", "contact"])]);
        let after = reduce(before.clone(), branding("X", "Bad Slug"));

        assert_eq!(after.step, WizardStep::Branding);
        assert_eq!(after.draft, before.draft);
        assert!(after.errors.contains_key("display_name"));
        assert!(after.errors.contains_key("slug"));
    }

    #[test]
    fn test_back_keeps_later_data() {
        let at_review = replay(vec![
            template("modern"),
            sections(&["hero", "services", "contact"]),
            branding("Salon Haarmonie", "haarmonie"),
        ]);
        let back_twice = reduce(reduce(at_review.clone(), WizardAction::Back), WizardAction::Back);

        assert_eq!(back_twice.step, WizardStep::Sections);
        assert_eq!(back_twice.draft, at_review.draft);
    }

    #[test]
    fn test_back_then_forward_is_idempotent() {
        let at_branding = replay(vec![template("minimal"), sections(&["hero", "services", "contact"])]);
        let round_trip = reduce(
            reduce(at_branding.clone(), WizardAction::Back),
            sections(&["hero", "services", "contact"]),
        );

        assert_eq!(round_trip, at_branding);
    }

    #[test]
    fn test_back_on_first_step_is_noop() {
        let state = reduce(salon(), WizardAction::Back);
        assert_eq!(state, salon());
    }

    #[test]
    fn test_input_for_wrong_step_is_rejected() {
        let state = reduce(salon(), sections(&["hero"]));
        assert_eq!(state.step, WizardStep::Template);
        assert!(state.errors.contains_key("step"));
    }

    #[test]
    fn test_publish_failure_stays_on_review() {
        let at_review = replay(vec![
            template("modern"),
            sections(&["hero", "services", "contact"]),
            branding("Salon Haarmonie", "haarmonie"),
        ]);
        let failed = reduce(
            at_review.clone(),
            WizardAction::PublishFailed { message: "try again".to_string() },
        );

        assert_eq!(failed.step, WizardStep::Review);
        assert_eq!(failed.status, WizardStatus::Editing);
        assert_eq!(failed.submit_error.as_deref(), Some("try again"));
        assert_eq!(failed.draft, at_review.draft);
    }

    #[test]
    fn test_publish_outcomes_before_review_are_ignored() {
        let at_sections = replay(vec![template("modern")]);
        for action in [
            WizardAction::PublishSucceeded { homepage_id: "hp".to_string() },
            WizardAction::PublishFailed { message: "try again".to_string() },
        ] {
            assert_eq!(reduce(salon(), action.clone()), salon());
            assert_eq!(reduce(at_sections.clone(), action), at_sections);
        }
    }

    #[test]
    fn test_terminal_states_ignore_actions() {
        let at_review = replay(vec![
            template("modern"),
            sections(&["hero", "services", "contact"]),
            branding("Salon Haarmonie", "haarmonie"),
        ]);
        let published = reduce(
            at_review,
            WizardAction::PublishSucceeded { homepage_id: "hp".to_string() },
        );
        assert_eq!(
            published.status,
            WizardStatus::Published { homepage_id: "hp".to_string() }
        );
        let still = reduce(published.clone(), template("modern"));
        assert_eq!(still, published);

        let abandoned = reduce(replay(vec![template("modern")]), WizardAction::Abandon);
        assert_eq!(abandoned.status, WizardStatus::Abandoned);
        assert_eq!(abandoned.draft, HomepageDraft::default());
        assert_eq!(reduce(abandoned.clone(), WizardAction::Back), abandoned);
    }

    #[test]
    fn test_prepare_publish() {
        let at_review = replay(vec![
            template("modern"),
            sections(&["hero", "services", "contact"]),
            branding("Salon Haarmonie", "haarmonie"),
        ]);
        let publish = prepare_publish(&at_review, "tenant-1").unwrap();

        assert_eq!(publish.tenant_id, "tenant-1");
        assert_eq!(publish.owner_role, Role::SalonOwner);
        assert_eq!(publish.template, "modern");
        assert_eq!(publish.sections, vec!["hero", "services", "contact"]);
        assert_eq!(publish.logo_url, None);

        let incomplete = replay(vec![template("modern")]);
        let errors = prepare_publish(&incomplete, "tenant-1").unwrap_err();
        assert!(errors.contains_key("sections"));
        assert!(errors.contains_key("display_name"));
    }
}
