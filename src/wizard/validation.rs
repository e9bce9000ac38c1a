//! Per-step validation for the homepage wizard.

use lazy_static::lazy_static;
use regex::Regex;

use super::{Branding, BrandingInput, FieldErrors, SectionKind, TemplateKind, WizardConfig};

lazy_static! {
    /// Hex colour in `#rrggbb` form
    static ref COLOR_REGEX: Regex = Regex::new(r"^#[0-9a-fA-F]{6}$").unwrap();

    /// Homepage address: lowercase alphanumeric with inner dashes
    static ref SLUG_REGEX: Regex = Regex::new(r"^[a-z0-9]([a-z0-9-]*[a-z0-9])?$").unwrap();
}

const DISPLAY_NAME_MIN: usize = 2;
const DISPLAY_NAME_MAX: usize = 80;
const TAGLINE_MAX: usize = 160;
const SLUG_MIN: usize = 3;
const SLUG_MAX: usize = 63;
const LOGO_URL_MAX: usize = 2048;

fn error_map(field: &str, message: impl Into<String>) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.insert(field.to_string(), vec![message.into()]);
    errors
}

pub fn validate_template(raw: &str) -> Result<TemplateKind, FieldErrors> {
    if raw.trim().is_empty() {
        return Err(error_map("template", "Bitte wähle eine Vorlage."));
    }
    TemplateKind::parse(raw).ok_or_else(|| error_map("template", "Unbekannte Vorlage."))
}

/// Parse and check section keys against the role's allowed and required
/// sections. Duplicates collapse; the submitted order is kept.
pub fn validate_sections(raw: &[String], config: &WizardConfig) -> Result<Vec<SectionKind>, FieldErrors> {
    let allowed = config.allowed_sections();
    let mut messages = Vec::new();
    let mut sections = Vec::new();

    for key in raw {
        match SectionKind::parse(key) {
            Some(kind) if allowed.contains(&kind) => {
                if !sections.contains(&kind) {
                    sections.push(kind);
                }
            }
            _ => messages.push(format!("Der Bereich '{}' ist hier nicht verfügbar.", key)),
        }
    }

    for required in config.required_sections() {
        if !sections.contains(required) {
            messages.push(format!("Der Bereich '{}' ist erforderlich.", required.label()));
        }
    }

    if messages.is_empty() {
        Ok(sections)
    } else {
        let mut errors = FieldErrors::new();
        errors.insert("sections".to_string(), messages);
        Err(errors)
    }
}

/// Validate the branding form, collecting every field error at once
pub fn validate_branding(input: &BrandingInput) -> Result<Branding, FieldErrors> {
    let mut errors = FieldErrors::new();
    let mut push = |field: &str, message: &str| {
        errors
            .entry(field.to_string())
            .or_default()
            .push(message.to_string());
    };

    let display_name = input.display_name.trim();
    let name_len = display_name.chars().count();
    if name_len < DISPLAY_NAME_MIN {
        push("display_name", "Der Name muss mindestens 2 Zeichen lang sein.");
    } else if name_len > DISPLAY_NAME_MAX {
        push("display_name", "Der Name darf höchstens 80 Zeichen lang sein.");
    }

    let tagline = input.tagline.trim();
    if tagline.chars().count() > TAGLINE_MAX {
        push("tagline", "Der Slogan darf höchstens 160 Zeichen lang sein.");
    }

    let primary_color = input.primary_color.trim().to_lowercase();
    if !COLOR_REGEX.is_match(&primary_color) {
        push("primary_color", "Die Farbe muss im Format #rrggbb angegeben werden.");
    }

    let logo_url = input.logo_url.trim();
    if !logo_url.is_empty() {
        if !logo_url.starts_with("https://") || logo_url.len() <= "https://".len() {
            push("logo_url", "Das Logo muss über eine https-Adresse erreichbar sein.");
        } else if logo_url.len() > LOGO_URL_MAX {
            push("logo_url", "Die Logo-Adresse ist zu lang.");
        }
    }

    let slug = input.slug.trim();
    if slug.len() < SLUG_MIN || slug.len() > SLUG_MAX {
        push("slug", "Die Adresse muss zwischen 3 und 63 Zeichen lang sein.");
    } else if !SLUG_REGEX.is_match(slug) {
        push(
            "slug",
            "Die Adresse darf nur Kleinbuchstaben, Ziffern und Bindestriche enthalten.",
        );
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(Branding {
        display_name: display_name.to_string(),
        tagline: tagline.to_string(),
        primary_color,
        logo_url: (!logo_url.is_empty()).then(|| logo_url.to_string()),
        slug: slug.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Role;

    fn input() -> BrandingInput {
        BrandingInput {
            display_name: "Salon Haarmonie".to_string(),
            tagline: String::new(),
            primary_color: "#AA3366".to_string(),
            logo_url: String::new(),
            slug: "haarmonie".to_string(),
        }
    }

    #[test]
    fn test_validate_template() {
        assert_eq!(validate_template("classic").unwrap(), TemplateKind::Classic);
        assert_eq!(validate_template(" Modern ").unwrap(), TemplateKind::Modern);
        assert!(validate_template("").unwrap_err().contains_key("template"));
        assert!(validate_template("fancy").is_err());
    }

    #[test]
    fn test_sections_for_salon_owner() {
        let config = WizardConfig::for_role(Role::SalonOwner).unwrap();
        let keys: Vec<String> = ["contact", "hero", "services", "hero", "team"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let sections = validate_sections(&keys, &config).unwrap();
        assert_eq!(
            sections,
            vec![SectionKind::Contact, SectionKind::Hero, SectionKind::Services, SectionKind::Team]
        );
    }

    #[test]
    fn test_sections_missing_required() {
        let config = WizardConfig::for_role(Role::Stylist).unwrap();
        let errors = validate_sections(&["hero".to_string()], &config).unwrap_err();
        assert_eq!(errors["sections"].len(), 1);
    }

    #[test]
    fn test_team_not_available_for_stylists() {
        let config = WizardConfig::for_role(Role::Stylist).unwrap();
        let keys: Vec<String> = ["hero", "about", "team"].iter().map(|s| s.to_string()).collect();
        assert!(validate_sections(&keys, &config).is_err());
    }

    #[test]
    fn test_branding_normalises_values() {
        let branding = validate_branding(&input()).unwrap();
        assert_eq!(branding.primary_color, "#aa3366");
        assert_eq!(branding.logo_url, None);
    }

    #[test]
    fn test_branding_field_errors() {
        let bad = BrandingInput {
            display_name: "A".to_string(),
            tagline: "x".repeat(161),
            primary_color: "red".to_string(),
            logo_url: "http://example.com/logo.png".to_string(),
            slug: "-bad-".to_string(),
        };
        let errors = validate_branding(&bad).unwrap_err();

        for field in ["display_name", "tagline", "primary_color", "logo_url", "slug"] {
            assert!(errors.contains_key(field), "missing error for {}", field);
        }
    }

    #[test]
    fn test_branding_accepts_https_logo() {
        let mut with_logo = input();
        with_logo.logo_url = "https://cdn.example.com/logo.svg".to_string();
        let branding = validate_branding(&with_logo).unwrap();
        assert_eq!(branding.logo_url.as_deref(), Some("https://cdn.example.com/logo.svg"));
    }

    #[test]
    fn test_slug_length_bounds() {
        let mut short = input();
        short.slug = "ab".to_string();
        assert!(validate_branding(&short).is_err());

        let mut long = input();
        long.slug = "a".repeat(64);
        assert!(validate_branding(&long).is_err());
    }
}
