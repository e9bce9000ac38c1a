mod common;

use axum::http::StatusCode;
use common::{body_json, body_string, location, TestApp};
use salonkit::api::auth::create_session;
use salonkit::db::Role;

const SALON_WIZARD: &str = "/salon/marketing/homepage/create";

async fn step(app: &TestApp, path: &str, token: &str, form: &str) {
    let response = app.post_form(path, Some(token), form).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER, "{}", form);
    assert_eq!(location(&response).as_deref(), Some(path), "{}", form);
}

async fn fill_salon_wizard(app: &TestApp, token: &str, slug: &str) {
    step(app, SALON_WIZARD, token, "action=next&template=modern").await;
    step(
        app,
        SALON_WIZARD,
        token,
        "action=next&sections=hero&sections=services&sections=team&sections=contact",
    )
    .await;
    step(
        app,
        SALON_WIZARD,
        token,
        &format!(
            "action=next&display_name=Salon+Haarmonie&tagline=Schnitt+mit+Haltung&primary_color=%23AA3366&logo_url=&slug={}",
            slug
        ),
    )
    .await;
}

#[tokio::test]
async fn test_salon_owner_publishes_homepage() {
    let app = TestApp::new().await;
    let (_, token) = app.signed_in(Role::SalonOwner).await;

    let first = body_string(app.get(SALON_WIZARD, Some(&token)).await).await;
    assert!(first.contains(r#"data-step="template""#));

    fill_salon_wizard(&app, &token, "haarmonie").await;

    let review = body_string(app.get(SALON_WIZARD, Some(&token)).await).await;
    assert!(review.contains(r#"data-step="review""#));
    assert!(review.contains("Salon Haarmonie"));

    let response = app
        .post_form(SALON_WIZARD, Some(&token), "action=publish")
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response).as_deref(),
        Some("/salon/marketing/homepage")
    );
    assert!(app.state.wizards.is_empty());

    let json = body_json(app.get("/api/homepages/haarmonie", None).await).await;
    assert_eq!(json["template"], "modern");
    assert_eq!(json["primaryColor"], "#aa3366");
    assert_eq!(
        json["sections"],
        serde_json::json!(["hero", "services", "team", "contact"])
    );

    let overview = body_string(app.get("/salon/marketing/homepage", Some(&token)).await).await;
    assert!(overview.contains("Salon Haarmonie"));

    // A new visit starts over
    let fresh = body_string(app.get(SALON_WIZARD, Some(&token)).await).await;
    assert!(fresh.contains(r#"data-step="template""#));
}

#[tokio::test]
async fn test_invalid_step_stays_with_errors() {
    let app = TestApp::new().await;
    let (_, token) = app.signed_in(Role::SalonOwner).await;

    step(&app, SALON_WIZARD, &token, "action=next&template=modern").await;
    // Services and contact are required for salons
    step(&app, SALON_WIZARD, &token, "action=next&sections=hero").await;

    let html = body_string(app.get(SALON_WIZARD, Some(&token)).await).await;
    assert!(html.contains(r#"data-step="sections""#));
    assert!(html.contains(r#"class="field-error""#));
}

#[tokio::test]
async fn test_back_keeps_entered_values() {
    let app = TestApp::new().await;
    let (_, token) = app.signed_in(Role::SalonOwner).await;

    step(&app, SALON_WIZARD, &token, "action=next&template=minimal").await;
    step(&app, SALON_WIZARD, &token, "action=back").await;

    let html = body_string(app.get(SALON_WIZARD, Some(&token)).await).await;
    assert!(html.contains(r#"data-step="template""#));
    assert!(html.contains(r#"value="minimal" checked"#));
}

#[tokio::test]
async fn test_cancel_discards_draft() {
    let app = TestApp::new().await;
    let (_, token) = app.signed_in(Role::SalonOwner).await;

    step(&app, SALON_WIZARD, &token, "action=next&template=classic").await;
    assert_eq!(app.state.wizards.len(), 1);

    let response = app
        .post_form(SALON_WIZARD, Some(&token), "action=cancel")
        .await;
    assert_eq!(
        location(&response).as_deref(),
        Some("/salon/marketing/homepage")
    );
    assert!(app.state.wizards.is_empty());
}

#[tokio::test]
async fn test_taken_slug_keeps_wizard_on_review() {
    let app = TestApp::new().await;
    let (_, salon_token) = app.signed_in(Role::SalonOwner).await;
    fill_salon_wizard(&app, &salon_token, "haarmonie").await;
    app.post_form(SALON_WIZARD, Some(&salon_token), "action=publish")
        .await;

    // A stylist in another salon wants the same address
    let other = app.tenant("Studio Locke", "studio-locke").await;
    let stylist = app
        .user("lena@locke.example", Role::Stylist, Some(&other.id))
        .await;
    let token = create_session(app.db(), &stylist.id, 7).await.unwrap();

    let wizard = "/stylist/marketing/homepage/create";
    step(&app, wizard, &token, "action=next&template=classic").await;
    step(&app, wizard, &token, "action=next&sections=hero&sections=about").await;
    step(
        &app,
        wizard,
        &token,
        "action=next&display_name=Lena&tagline=&primary_color=%232f7d6d&logo_url=&slug=haarmonie",
    )
    .await;
    step(&app, wizard, &token, "action=publish").await;

    let html = body_string(app.get(wizard, Some(&token)).await).await;
    assert!(html.contains(r#"data-step="review""#));
    assert!(html.contains("ist bereits vergeben"));
    assert_eq!(app.state.wizards.len(), 1);
}

#[tokio::test]
async fn test_republishing_replaces_own_homepage() {
    let app = TestApp::new().await;
    let (_, token) = app.signed_in(Role::SalonOwner).await;

    fill_salon_wizard(&app, &token, "haarmonie").await;
    app.post_form(SALON_WIZARD, Some(&token), "action=publish").await;
    fill_salon_wizard(&app, &token, "haarmonie-neu").await;
    let response = app.post_form(SALON_WIZARD, Some(&token), "action=publish").await;
    assert_eq!(
        location(&response).as_deref(),
        Some("/salon/marketing/homepage")
    );

    let old = app.get("/api/homepages/haarmonie", None).await;
    assert_eq!(old.status(), StatusCode::NOT_FOUND);
    let new = app.get("/api/homepages/haarmonie-neu", None).await;
    assert_eq!(new.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_admin_has_no_wizard() {
    let app = TestApp::new().await;
    let (_, token) = app.signed_in(Role::Admin).await;

    // Admin paths have no wizard route; the salon one redirects by role
    let response = app.get(SALON_WIZARD, Some(&token)).await;
    assert_eq!(location(&response).as_deref(), Some("/admin"));
}
