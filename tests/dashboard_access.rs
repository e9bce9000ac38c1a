mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use common::{body_string, escaped, location, set_cookies, TestApp};
use salonkit::config::Config;
use salonkit::db::Role;
use salonkit::ui::Theme;

#[tokio::test]
async fn test_anonymous_dashboard_request_goes_to_sign_in() {
    let app = TestApp::new().await;
    let response = app.get("/salon/marketing/homepage", None).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response).as_deref(),
        Some("/sign-in?redirect_to=%2Fsalon%2Fmarketing%2Fhomepage")
    );
}

#[tokio::test]
async fn test_wrong_role_goes_to_own_dashboard() {
    let app = TestApp::new().await;
    let (_, token) = app.signed_in(Role::Stylist).await;

    for path in ["/salon", "/salon/marketing/homepage/create", "/admin/content"] {
        let response = app.get(path, Some(&token)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{}", path);
        assert_eq!(location(&response).as_deref(), Some("/stylist"), "{}", path);
    }
}

#[tokio::test]
async fn test_shell_carries_role_profile() {
    let app = TestApp::new().await;
    let (_, token) = app.signed_in(Role::SalonOwner).await;

    let response = app.get("/salon", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_string(response).await;
    assert!(html.contains(&format!(r#"data-base-url="{}""#, escaped("/salon"))));
    assert!(html.contains("--accent: #b0417a"));
    assert!(html.contains("sidebar-salon"));
    assert!(html.contains(&format!(r#"href="{}""#, escaped("/salon/marketing/homepage"))));
}

#[tokio::test]
async fn test_stylist_and_admin_shells() {
    let app = TestApp::new().await;

    let (_, stylist) = app.signed_in(Role::Stylist).await;
    let html = body_string(app.get("/stylist", Some(&stylist)).await).await;
    assert!(html.contains(&format!(r#"data-base-url="{}""#, escaped("/stylist"))));
    assert!(html.contains("--accent: #2f7d6d"));

    let (_, admin) = app.signed_in(Role::Admin).await;
    let response = app.get("/admin/content", Some(&admin)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains(&format!(r#"data-base-url="{}""#, escaped("/admin"))));
    assert!(html.contains("sidebar-admin"));
}

#[tokio::test]
async fn test_unknown_dashboard_paths_are_still_gated() {
    let app = TestApp::new().await;

    let anonymous = app.get("/admin/reports", None).await;
    assert_eq!(anonymous.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&anonymous).as_deref(),
        Some("/sign-in?redirect_to=%2Fadmin%2Freports")
    );

    let (_, salon) = app.signed_in(Role::SalonOwner).await;
    let wrong_role = app.get("/admin/reports", Some(&salon)).await;
    assert_eq!(location(&wrong_role).as_deref(), Some("/salon"));

    let own_family = app.get("/salon/reports", Some(&salon)).await;
    assert_eq!(own_family.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_lookalike_paths_are_not_dashboards() {
    let app = TestApp::new().await;
    let response = app.get("/salons", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_newsletter_detail_redirects_to_edit() {
    let app = TestApp::new().await;

    let response = app.get("/admin/marketing/newsletter/42", None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response).as_deref(),
        Some("/admin/marketing/newsletter/42/edit")
    );

    let (_, admin) = app.signed_in(Role::Admin).await;
    let edit = app
        .get("/admin/marketing/newsletter/42/edit", Some(&admin))
        .await;
    assert_eq!(edit.status(), StatusCode::OK);
    assert!(body_string(edit).await.contains(r#"data-newsletter-id="42""#));
}

#[tokio::test]
async fn test_newsletter_id_is_escaped_on_the_edit_page() {
    let app = TestApp::new().await;
    let (_, admin) = app.signed_in(Role::Admin).await;

    let response = app
        .get(
            "/admin/marketing/newsletter/%22%3E%3Cscript%3Ealert(1)%3C%2Fscript%3E/edit",
            Some(&admin),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_string(response).await;
    assert!(!html.contains("<script>"));
    assert!(!html.contains(r#""><"#));
    assert!(html.contains(&format!(
        r#"data-newsletter-id="{}""#,
        escaped("\"><script>alert(1)</script>")
    )));
    assert!(html.contains(&format!(
        r#"name="redirect_to" value="{}""#,
        escaped("/admin/marketing/newsletter/%22%3E%3Cscript%3Ealert(1)%3C%2Fscript%3E/edit")
    )));
}

#[tokio::test]
async fn test_newsletter_redirect_encodes_any_id() {
    let app = TestApp::new().await;

    let response = app.get("/admin/marketing/newsletter/a%0Ab", None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response).as_deref(),
        Some("/admin/marketing/newsletter/a%0Ab/edit")
    );

    let spaced = app.get("/admin/marketing/newsletter/mai%20news", None).await;
    assert_eq!(
        location(&spaced).as_deref(),
        Some("/admin/marketing/newsletter/mai%20news/edit")
    );

    let (_, admin) = app.signed_in(Role::Admin).await;
    let edit = app
        .get("/admin/marketing/newsletter/a%0Ab/edit", Some(&admin))
        .await;
    assert_eq!(edit.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_public_pages_ignore_theme_preference() {
    let mut config = Config::default();
    config.ui.public_theme = Theme::Light;
    let app = TestApp::with_config(config).await;

    let request = Request::builder()
        .uri("/impressum")
        .header(header::COOKIE, "salonkit_theme=dark")
        .body(Body::empty())
        .unwrap();
    let response = app.send(request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_string(response).await;
    assert!(html.contains(r#"data-theme="light""#));
    assert!(html.contains("Impressum"));
}

#[tokio::test]
async fn test_dashboard_honours_theme_preference() {
    let app = TestApp::new().await;
    let (_, token) = app.signed_in(Role::SalonOwner).await;

    let request = Request::builder()
        .uri("/salon")
        .header(
            header::COOKIE,
            format!("{}; salonkit_theme=dark", common::session_cookie(&token)),
        )
        .body(Body::empty())
        .unwrap();
    let html = body_string(app.send(request).await).await;
    assert!(html.contains(r#"data-theme="dark""#));
}

#[tokio::test]
async fn test_theme_preference_is_stored() {
    let app = TestApp::new().await;

    let response = app
        .post_form("/preferences/theme", None, "theme=dark&redirect_to=%2Fsalon")
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response).as_deref(), Some("/salon"));
    assert!(set_cookies(&response)
        .iter()
        .any(|c| c.starts_with("salonkit_theme=dark")));

    let offsite = app
        .post_form(
            "/preferences/theme",
            None,
            "theme=light&redirect_to=https%3A%2F%2Fevil.example",
        )
        .await;
    assert_eq!(location(&offsite).as_deref(), Some("/"));

    let invalid = app.post_form("/preferences/theme", None, "theme=sepia").await;
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_theme_redirect_rejects_unsafe_targets() {
    let app = TestApp::new().await;

    for target in ["%2Fa%0Db", "%2Fsalon%0A", "%2F%5Cevil.example", "%2F%2Fevil.example"] {
        let response = app
            .post_form(
                "/preferences/theme",
                None,
                &format!("theme=dark&redirect_to={}", target),
            )
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{}", target);
        assert_eq!(location(&response).as_deref(), Some("/"), "{}", target);
    }
}

#[tokio::test]
async fn test_sign_in_returns_to_requested_page() {
    let app = TestApp::new().await;
    let tenant = app.tenant("Salon Haarmonie", "haarmonie").await;
    app.user("mara@salon.example", Role::SalonOwner, Some(&tenant.id))
        .await;

    let form = format!(
        "email=mara%40salon.example&password={}&redirect_to=%2Fsalon%2Fmarketing%2Fhomepage",
        urlencode(common::PASSWORD)
    );
    let response = app.post_form("/sign-in", None, &form).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response).as_deref(),
        Some("/salon/marketing/homepage")
    );
    assert!(set_cookies(&response)
        .iter()
        .any(|c| c.starts_with("salonkit_session=")));
}

#[tokio::test]
async fn test_sign_in_ignores_foreign_redirect_target() {
    let app = TestApp::new().await;
    app.user("lena@salon.example", Role::Stylist, None).await;

    let form = format!(
        "email=lena%40salon.example&password={}&redirect_to=%2Fadmin%2Fcontent",
        urlencode(common::PASSWORD)
    );
    let response = app.post_form("/sign-in", None, &form).await;
    assert_eq!(location(&response).as_deref(), Some("/stylist"));
}

#[tokio::test]
async fn test_sign_in_rejects_unsafe_redirect_targets() {
    let app = TestApp::new().await;
    app.user("lena@salon.example", Role::Stylist, None).await;

    for target in ["%2Fstylist%0D%0ASet-Cookie%3A+x%3Dy", "%2F%5Cevil.example"] {
        let form = format!(
            "email=lena%40salon.example&password={}&redirect_to={}",
            urlencode(common::PASSWORD),
            target
        );
        let response = app.post_form("/sign-in", None, &form).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{}", target);
        assert_eq!(location(&response).as_deref(), Some("/stylist"), "{}", target);
    }

    let (_, admin) = app.signed_in(Role::Admin).await;
    let response = app
        .get("/sign-in?redirect_to=%2Fadmin%0Ax", Some(&admin))
        .await;
    assert_eq!(location(&response).as_deref(), Some("/admin"));
}

#[tokio::test]
async fn test_dashboard_theme_falls_back_to_config() {
    let mut config = Config::default();
    config.ui.dashboard_theme = Theme::Dark;
    let app = TestApp::with_config(config).await;
    let (_, token) = app.signed_in(Role::Stylist).await;

    let html = body_string(app.get("/stylist", Some(&token)).await).await;
    assert!(html.contains(r#"data-theme="dark""#));
}

#[tokio::test]
async fn test_sign_in_with_wrong_password_rerenders_form() {
    let app = TestApp::new().await;
    app.user("lena@salon.example", Role::Stylist, None).await;

    let response = app
        .post_form(
            "/sign-in",
            None,
            "email=lena%40salon.example&password=falsch&redirect_to=",
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let html = body_string(response).await;
    assert!(html.contains("E-Mail oder Passwort ist falsch."));
}

#[tokio::test]
async fn test_signed_in_visit_to_sign_in_redirects() {
    let app = TestApp::new().await;
    let (_, token) = app.signed_in(Role::Admin).await;

    let response = app.get("/sign-in", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response).as_deref(), Some("/admin"));
}

#[tokio::test]
async fn test_sign_out_revokes_session() {
    let app = TestApp::new().await;
    let (_, token) = app.signed_in(Role::SalonOwner).await;

    let response = app.post_form("/sign-out", Some(&token), "").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response).as_deref(), Some("/"));

    let after = app.get("/salon", Some(&token)).await;
    assert_eq!(after.status(), StatusCode::SEE_OTHER);
    assert!(location(&after).unwrap().starts_with("/sign-in"));
}

#[tokio::test]
async fn test_home_page_links_signed_in_users_to_dashboard() {
    let app = TestApp::new().await;
    let (_, token) = app.signed_in(Role::Stylist).await;

    let html = body_string(app.get("/", Some(&token)).await).await;
    assert!(html.contains(&format!(r#"href="{}" data-dashboard-link"#, escaped("/stylist"))));

    let anonymous = body_string(app.get("/", None).await).await;
    assert!(!anonymous.contains("data-dashboard-link"));
}

fn urlencode(value: &str) -> String {
    serde_urlencoded::to_string([("v", value)])
        .unwrap()
        .trim_start_matches("v=")
        .to_string()
}
