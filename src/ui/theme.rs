//! Colour theme handling.
//!
//! Public pages always render the configured public theme. Dashboard pages
//! honour the visitor's stored preference. Either way the decision travels to
//! templates as a `ThemeContext` value.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};

/// Cookie holding the dashboard theme preference
pub const THEME_COOKIE: &str = "salonkit_theme";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Theme decision for one render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeContext {
    pub theme: Theme,
    /// Set on public pages: the preference toggle is hidden and ignored
    pub enforced: bool,
}

impl ThemeContext {
    /// Fixed theme, used for every public route
    pub fn enforced(theme: Theme) -> Self {
        Self {
            theme,
            enforced: true,
        }
    }

    /// The stored preference when it parses, `fallback` otherwise
    pub fn preferred(preference: Option<&str>, fallback: Theme) -> Self {
        Self {
            theme: preference.and_then(Theme::parse).unwrap_or(fallback),
            enforced: false,
        }
    }

    pub fn from_cookies(jar: &CookieJar, fallback: Theme) -> Self {
        Self::preferred(jar.get(THEME_COOKIE).map(|c| c.value()), fallback)
    }

    pub fn name(&self) -> &'static str {
        self.theme.as_str()
    }

    /// The theme the toggle switches to
    pub fn alternate(&self) -> &'static str {
        self.theme.toggled().as_str()
    }
}

/// Cookie persisting a dashboard theme preference
pub fn preference_cookie(theme: Theme) -> Cookie<'static> {
    Cookie::build((THEME_COOKIE, theme.as_str()))
        .path("/")
        .same_site(SameSite::Lax)
        .build()
}
