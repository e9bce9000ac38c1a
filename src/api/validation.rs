//! Input validation for admin API requests.
//!
//! Each function checks one field and returns a message on failure. Handlers
//! collect the messages with `ValidationErrorBuilder` from the `error`
//! module.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Icon identifiers: lowercase words joined by single dashes (`calendar-check`)
    static ref ICON_NAME_REGEX: Regex = Regex::new(
        r"^[a-z0-9]+(-[a-z0-9]+)*$"
    ).unwrap();

    /// Stored language tags are lowercase primary subtags (`de`, `en`)
    static ref LANGUAGE_REGEX: Regex = Regex::new(
        r"^[a-z]{2,8}$"
    ).unwrap();

    /// Loose email shape check; deliverability is not our concern
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[^@\s]+@[^@\s]+\.[^@\s]+$"
    ).unwrap();
}

const CARD_TITLE_MAX: usize = 120;
const CARD_DESCRIPTION_MAX: usize = 500;
const ICON_NAME_MAX: usize = 64;
const CONTENT_TITLE_MAX: usize = 200;
const CONTENT_BODY_MAX: usize = 100_000;

fn required_text(value: &str, label: &str, max: usize) -> Result<(), String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("{} is required", label));
    }
    if trimmed.chars().count() > max {
        return Err(format!("{} is too long (max {} characters)", label, max));
    }
    Ok(())
}

/// Validate an approach card title
pub fn validate_card_title(title: &str) -> Result<(), String> {
    required_text(title, "Title", CARD_TITLE_MAX)
}

/// Validate an approach card description
pub fn validate_card_description(description: &str) -> Result<(), String> {
    required_text(description, "Description", CARD_DESCRIPTION_MAX)
}

/// Validate an icon name
pub fn validate_icon_name(icon_name: &str) -> Result<(), String> {
    if icon_name.is_empty() {
        return Err("Icon name is required".to_string());
    }

    if icon_name.len() > ICON_NAME_MAX {
        return Err("Icon name is too long (max 64 characters)".to_string());
    }

    if !ICON_NAME_REGEX.is_match(icon_name) {
        return Err(
            "Icon name must be lowercase alphanumeric words separated by single dashes".to_string(),
        );
    }

    Ok(())
}

/// Validate a sort order value
pub fn validate_sort_order(sort_order: i64) -> Result<(), String> {
    if !(0..=10_000).contains(&sort_order) {
        return Err("Sort order must be between 0 and 10000".to_string());
    }
    Ok(())
}

/// Validate a stored content language tag
pub fn validate_language(language: &str) -> Result<(), String> {
    if !LANGUAGE_REGEX.is_match(language) {
        return Err("Language must be a lowercase language code such as 'de' or 'en'".to_string());
    }
    Ok(())
}

/// Validate a legal content title
pub fn validate_content_title(title: &str) -> Result<(), String> {
    required_text(title, "Title", CONTENT_TITLE_MAX)
}

/// Validate a legal content body
pub fn validate_content_body(body: &str) -> Result<(), String> {
    required_text(body, "Body", CONTENT_BODY_MAX)
}

/// Validate an email address
pub fn validate_email(email: &str) -> Result<(), String> {
    let email = email.trim();
    if email.is_empty() {
        return Err("Email is required".to_string());
    }
    if email.len() > 254 || !EMAIL_REGEX.is_match(email) {
        return Err("Invalid email address".to_string());
    }
    Ok(())
}
