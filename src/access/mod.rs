//! Role router: maps session roles to their dashboard route families.
//!
//! Every role owns one family of paths under a fixed base URL. A request for
//! a dashboard path is either allowed (and handed the role's dashboard
//! profile) or redirected; mismatches are never errors.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::db::Role;

// Characters that cannot appear raw inside a single path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Which sidebar the dashboard shell renders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarVariant {
    Salon,
    Stylist,
    Admin,
}

impl SidebarVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            SidebarVariant::Salon => "salon",
            SidebarVariant::Stylist => "stylist",
            SidebarVariant::Admin => "admin",
        }
    }
}

/// A navigation entry, `path` relative to the profile's base URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    pub path: &'static str,
}

/// Layout configuration for one role's dashboard
#[derive(Debug, PartialEq, Eq)]
pub struct DashboardProfile {
    pub role: Role,
    pub sidebar: SidebarVariant,
    pub base_url: &'static str,
    pub accent_color: &'static str,
    pub nav: &'static [NavItem],
}

static SALON_NAV: [NavItem; 2] = [
    NavItem { label: "Übersicht", path: "" },
    NavItem { label: "Homepage", path: "/marketing/homepage" },
];

static STYLIST_NAV: [NavItem; 2] = [
    NavItem { label: "Übersicht", path: "" },
    NavItem { label: "Profilseite", path: "/marketing/homepage" },
];

static ADMIN_NAV: [NavItem; 2] = [
    NavItem { label: "Übersicht", path: "" },
    NavItem { label: "Inhalte", path: "/content" },
];

static PROFILES: [DashboardProfile; 3] = [
    DashboardProfile {
        role: Role::SalonOwner,
        sidebar: SidebarVariant::Salon,
        base_url: "/salon",
        accent_color: "#b0417a",
        nav: &SALON_NAV,
    },
    DashboardProfile {
        role: Role::Stylist,
        sidebar: SidebarVariant::Stylist,
        base_url: "/stylist",
        accent_color: "#2f7d6d",
        nav: &STYLIST_NAV,
    },
    DashboardProfile {
        role: Role::Admin,
        sidebar: SidebarVariant::Admin,
        base_url: "/admin",
        accent_color: "#3b4a9c",
        nav: &ADMIN_NAV,
    },
];

pub const SIGN_IN_PATH: &str = "/sign-in";

/// The dashboard profile for a role
pub fn profile_for(role: Role) -> &'static DashboardProfile {
    PROFILES
        .iter()
        .find(|p| p.role == role)
        .unwrap_or(&PROFILES[0])
}

/// The role whose family contains `path`, if any
pub fn family_for_path(path: &str) -> Option<Role> {
    PROFILES
        .iter()
        .find(|p| path_in_family(path, p.base_url))
        .map(|p| p.role)
}

fn path_in_family(path: &str, base_url: &str) -> bool {
    match path.strip_prefix(base_url) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

fn path_only(requested: &str) -> &str {
    requested.split(['?', '#']).next().unwrap_or(requested)
}

/// Outcome of gating a dashboard request
#[derive(Debug, PartialEq, Eq)]
pub enum AccessDecision {
    Allow(&'static DashboardProfile),
    Redirect(String),
}

/// Gate `requested` (path plus optional query) for a session with the given
/// role. Returns `None` when the path is not a dashboard path.
pub fn decide(session_role: Option<Role>, requested: &str) -> Option<AccessDecision> {
    let family = family_for_path(path_only(requested))?;

    let decision = match session_role {
        None => AccessDecision::Redirect(sign_in_redirect(requested)),
        Some(role) if role == family => AccessDecision::Allow(profile_for(role)),
        Some(role) => AccessDecision::Redirect(profile_for(role).base_url.to_string()),
    };
    Some(decision)
}

/// Sign-in URL that returns to `requested` afterwards
pub fn sign_in_redirect(requested: &str) -> String {
    match serde_urlencoded::to_string([("redirect_to", requested)]) {
        Ok(query) => format!("{}?{}", SIGN_IN_PATH, query),
        Err(_) => SIGN_IN_PATH.to_string(),
    }
}

/// A caller-supplied redirect target, if it is a plain local path.
///
/// Rejects absolute and protocol-relative URLs, backslashes (browsers treat
/// `/\host` like `//host`) and control characters.
pub fn local_redirect_target(candidate: &str) -> Option<&str> {
    let target = candidate.trim();
    let acceptable = target.starts_with('/')
        && !target.starts_with("//")
        && !target.contains('\\')
        && !target.chars().any(char::is_control);
    acceptable.then_some(target)
}

/// Where to send a user after sign-in. Only local paths inside the user's
/// own family are honoured; anything else lands on the family root.
pub fn post_sign_in_target(role: Role, candidate: Option<&str>) -> String {
    let base = profile_for(role).base_url;

    match candidate.and_then(local_redirect_target) {
        Some(target) if family_for_path(path_only(target)) == Some(role) => target.to_string(),
        _ => base.to_string(),
    }
}

/// Newsletter detail URLs always resolve to their edit page. The id is
/// encoded as one path segment.
pub fn newsletter_edit_path(id: &str) -> String {
    format!(
        "/admin/marketing/newsletter/{}/edit",
        utf8_percent_encode(id, PATH_SEGMENT)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_role_has_a_distinct_profile() {
        for role in Role::ALL {
            assert_eq!(profile_for(role).role, role);
        }
        assert_eq!(profile_for(Role::SalonOwner).base_url, "/salon");
        assert_eq!(profile_for(Role::Stylist).base_url, "/stylist");
        assert_eq!(profile_for(Role::Admin).base_url, "/admin");
    }

    #[test]
    fn test_family_for_path() {
        assert_eq!(family_for_path("/salon"), Some(Role::SalonOwner));
        assert_eq!(family_for_path("/salon/marketing/homepage/create"), Some(Role::SalonOwner));
        assert_eq!(family_for_path("/stylist/calendar"), Some(Role::Stylist));
        assert_eq!(family_for_path("/admin/marketing/newsletter/1/edit"), Some(Role::Admin));
        // Prefix alone is not enough
        assert_eq!(family_for_path("/salons"), None);
        assert_eq!(family_for_path("/administrator"), None);
        assert_eq!(family_for_path("/agb"), None);
        assert_eq!(family_for_path("/"), None);
    }

    #[test]
    fn test_matching_role_is_allowed() {
        for role in Role::ALL {
            let base = profile_for(role).base_url;
            for path in [base.to_string(), format!("{}/marketing/homepage?tab=1", base)] {
                assert_eq!(
                    decide(Some(role), &path),
                    Some(AccessDecision::Allow(profile_for(role)))
                );
            }
        }
    }

    #[test]
    fn test_mismatched_role_redirects_to_own_root() {
        for role in Role::ALL {
            for other in Role::ALL.into_iter().filter(|r| *r != role) {
                let path = format!("{}/anything", profile_for(other).base_url);
                assert_eq!(
                    decide(Some(role), &path),
                    Some(AccessDecision::Redirect(profile_for(role).base_url.to_string()))
                );
            }
        }
    }

    #[test]
    fn test_missing_session_redirects_to_sign_in_with_destination() {
        let decision = decide(None, "/stylist/calendar?week=3").unwrap();
        assert_eq!(
            decision,
            AccessDecision::Redirect(
                "/sign-in?redirect_to=%2Fstylist%2Fcalendar%3Fweek%3D3".to_string()
            )
        );
    }

    #[test]
    fn test_public_paths_are_not_gated() {
        assert_eq!(decide(None, "/impressum"), None);
        assert_eq!(decide(Some(Role::Admin), "/api/approach-cards"), None);
    }

    #[test]
    fn test_post_sign_in_target() {
        assert_eq!(
            post_sign_in_target(Role::Stylist, Some("/stylist/calendar")),
            "/stylist/calendar"
        );
        assert_eq!(post_sign_in_target(Role::Stylist, Some("/admin")), "/stylist");
        assert_eq!(post_sign_in_target(Role::Stylist, Some("//evil.example")), "/stylist");
        assert_eq!(post_sign_in_target(Role::Stylist, Some("https://evil.example")), "/stylist");
        assert_eq!(post_sign_in_target(Role::SalonOwner, None), "/salon");
        assert_eq!(post_sign_in_target(Role::Stylist, Some("/\\evil.example")), "/stylist");
        assert_eq!(post_sign_in_target(Role::Stylist, Some("/stylist/a\nb")), "/stylist");
        assert_eq!(post_sign_in_target(Role::Stylist, Some("/stylist/a\rb")), "/stylist");
    }

    #[test]
    fn test_local_redirect_target() {
        assert_eq!(local_redirect_target("/salon?tab=2"), Some("/salon?tab=2"));
        assert_eq!(local_redirect_target(" /agb "), Some("/agb"));
        assert_eq!(local_redirect_target("//evil.example"), None);
        assert_eq!(local_redirect_target("/\\evil.example"), None);
        assert_eq!(local_redirect_target("https://evil.example"), None);
        assert_eq!(local_redirect_target("/a\u{7f}b"), None);
        assert_eq!(local_redirect_target("/a\tb"), None);
        assert_eq!(local_redirect_target(""), None);
    }

    #[test]
    fn test_newsletter_edit_path() {
        for id in ["123", "abc-def", "0"] {
            assert_eq!(
                newsletter_edit_path(id),
                format!("/admin/marketing/newsletter/{}/edit", id)
            );
        }
    }

    #[test]
    fn test_newsletter_edit_path_encodes_the_id() {
        assert_eq!(
            newsletter_edit_path("a\nb"),
            "/admin/marketing/newsletter/a%0Ab/edit"
        );
        assert_eq!(
            newsletter_edit_path("../x y"),
            "/admin/marketing/newsletter/..%2Fx%20y/edit"
        );
        assert_eq!(
            newsletter_edit_path("\"><script>"),
            "/admin/marketing/newsletter/%22%3E%3Cscript%3E/edit"
        );
        assert!(axum::http::HeaderValue::from_str(&newsletter_edit_path("a\r\nb")).is_ok());
    }
}
