use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use sea_orm::{ConnectOptions, Database};
use sea_orm_migration::MigratorTrait;
use serde_json::{json, Value};
use tower::ServiceExt;

use rolodex::api::rest::routes;
use rolodex::domain::service::{Service, ServiceConfig};
use rolodex::infra::storage::migrations::Migrator;
use rolodex::infra::storage::users;

async fn test_app() -> (Router, Arc<Service>) {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1);
    let db = Database::connect(options)
        .await
        .expect("Failed to connect to test database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    let service = Arc::new(Service::new(db, ServiceConfig::default()));
    (routes::router(service.clone()), service)
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Signs up through the login endpoint, returning (token, user id).
async fn signup(app: &Router, email: &str) -> (String, String) {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/auth/email",
            None,
            json!({"email": email, "password": "secret-pass", "name": "Test User"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    (
        body["token"].as_str().unwrap().to_string(),
        body["user"]["id"].as_str().unwrap().to_string(),
    )
}

#[tokio::test]
async fn health_is_public() {
    let (app, _) = test_app().await;
    let response = app.oneshot(get_request("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");
}

#[tokio::test]
async fn protected_routes_reject_missing_and_bad_tokens() {
    let (app, _) = test_app().await;

    let response = app
        .clone()
        .oneshot(get_request("/contacts", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok()),
        Some("application/problem+json")
    );

    let response = app
        .oneshot(get_request("/contacts", Some("not-a-token")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn event_crud_over_http() {
    let (app, _) = test_app().await;
    let (token, _) = signup(&app, "ada@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/events",
            Some(&token),
            json!({
                "name": "RustConf",
                "location": "Montreal",
                "start_date": "2026-09-01",
                "end_date": "2026-09-03"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    let event_id = created["id"].as_str().unwrap().to_string();

    // Dates are validated.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/events",
            Some(&token),
            json!({
                "name": "Backwards",
                "location": "Nowhere",
                "start_date": "2026-09-03",
                "end_date": "2026-09-01"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = app
        .clone()
        .oneshot(get_request(&format!("/events/{event_id}"), Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/events/{event_id}"))
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(get_request(&format!("/events/{event_id}"), Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn contact_create_with_tags_and_media() {
    let (app, _) = test_app().await;
    let (token, _) = signup(&app, "ada@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/contacts",
            Some(&token),
            json!({
                "name": "Dana",
                "email": "dana@example.com",
                "tags": ["VIP", "Conference"],
                "media": [{
                    "file_url": "https://cdn.example/card.jpg",
                    "file_type": "image",
                    "file_name": "card.jpg"
                }]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["tags"].as_array().unwrap().len(), 2);
    assert_eq!(created["media"].as_array().unwrap().len(), 1);
    assert_eq!(created["media"][0]["file_type"], "image");

    // Unknown media type is a validation error.
    let response = app
        .oneshot(json_request(
            "POST",
            "/contacts",
            Some(&token),
            json!({
                "name": "Eve",
                "media": [{"file_url": "https://cdn.example/x", "file_type": "video"}]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn contact_update_distinguishes_null_from_absent_event() {
    let (app, _) = test_app().await;
    let (token, _) = signup(&app, "ada@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/events",
            Some(&token),
            json!({
                "name": "RustConf",
                "location": "Montreal",
                "start_date": "2026-09-01",
                "end_date": "2026-09-03"
            }),
        ))
        .await
        .unwrap();
    let event_id = body_json(response).await["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/contacts",
            Some(&token),
            json!({"name": "Dana", "event_id": event_id}),
        ))
        .await
        .unwrap();
    let contact = body_json(response).await;
    let contact_id = contact["id"].as_str().unwrap().to_string();
    assert_eq!(contact["event_id"].as_str().unwrap(), event_id);

    // Updating another field leaves the link alone.
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/contacts/{contact_id}"),
            Some(&token),
            json!({"role_company": "CTO, Example"}),
        ))
        .await
        .unwrap();
    let updated = body_json(response).await;
    assert_eq!(updated["event_id"].as_str().unwrap(), event_id);

    // Explicit null clears it.
    let response = app
        .oneshot(json_request(
            "PUT",
            &format!("/contacts/{contact_id}"),
            Some(&token),
            json!({"event_id": null}),
        ))
        .await
        .unwrap();
    let cleared = body_json(response).await;
    assert!(cleared["event_id"].is_null());
}

#[tokio::test]
async fn notes_append_to_the_meeting_context() {
    let (app, _) = test_app().await;
    let (token, _) = signup(&app, "ada@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/contacts",
            Some(&token),
            json!({"name": "Dana", "meeting_context": "Met at the booth"}),
        ))
        .await
        .unwrap();
    let contact_id = body_json(response).await["id"].as_str().unwrap().to_string();

    let response = app
        .oneshot(json_request(
            "POST",
            &format!("/contacts/{contact_id}/notes"),
            Some(&token),
            json!({"note": "Wants a follow-up in May"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(
        updated["meeting_context"].as_str().unwrap(),
        "Met at the booth\nWants a follow-up in May"
    );
}

#[tokio::test]
async fn admin_routes_require_the_admin_flag() {
    let (app, service) = test_app().await;
    let (token, user_id) = signup(&app, "ada@example.com").await;

    let response = app
        .clone()
        .oneshot(get_request("/admin/users", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Promote and retry with the same token.
    users::update(
        service.db(),
        user_id.parse().unwrap(),
        users::UpdateUser {
            is_admin: Some(true),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let response = app
        .oneshot(get_request("/admin/users", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let listed = body_json(response).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn admin_can_impersonate_another_user() {
    let (app, service) = test_app().await;
    let (admin_token, admin_id) = signup(&app, "admin@example.com").await;
    let (_, _) = signup(&app, "bob@example.com").await;

    users::update(
        service.db(),
        admin_id.parse().unwrap(),
        users::UpdateUser {
            is_admin: Some(true),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let bob = users::find_by_email(service.db(), "bob@example.com")
        .await
        .unwrap()
        .unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/admin/login-as/{}", bob.id),
            Some(&admin_token),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["user"]["email"], "bob@example.com");
    let bob_token = body["token"].as_str().unwrap().to_string();

    // The minted token acts as the target user.
    let response = app
        .oneshot(get_request("/profile/me", Some(&bob_token)))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["email"], "bob@example.com");
}

#[tokio::test]
async fn follow_ups_are_listed_per_contact() {
    let (app, _) = test_app().await;
    let (token, _) = signup(&app, "ada@example.com").await;
    let (other_token, _) = signup(&app, "bob@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/contacts",
            Some(&token),
            json!({"name": "Dana"}),
        ))
        .await
        .unwrap();
    let contact_id = body_json(response).await["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/followups",
            Some(&token),
            json!({"contact_id": contact_id, "message": "Send the deck"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(get_request(
            &format!("/followups/contact/{contact_id}"),
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let listed = body_json(response).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["message"], "Send the deck");

    // Another tenant sees the contact itself as absent.
    let response = app
        .oneshot(get_request(
            &format!("/followups/contact/{contact_id}"),
            Some(&other_token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn export_returns_csv_with_contact_rows() {
    let (app, _) = test_app().await;
    let (token, _) = signup(&app, "ada@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/contacts",
            Some(&token),
            json!({"name": "Dana", "email": "dana@example.com", "tags": ["VIP"]}),
        ))
        .await
        .unwrap();
    let contact_id = body_json(response).await["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/export/contacts/csv",
            Some(&token),
            json!({"contact_ids": [contact_id]}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .starts_with("text/csv"));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let csv = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(csv.starts_with("Name,"));
    assert!(csv.contains("Dana"));
    assert!(csv.contains("VIP"));

    // An empty selection is rejected rather than producing a header-only file.
    let response = app
        .oneshot(json_request(
            "POST",
            "/export/contacts/csv",
            Some(&token),
            json!({"contact_ids": []}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn event_export_is_scoped_to_the_owned_event() {
    let (app, _) = test_app().await;
    let (token, _) = signup(&app, "ada@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/events",
            Some(&token),
            json!({
                "name": "RustConf",
                "location": "Montreal",
                "start_date": "2026-09-01",
                "end_date": "2026-09-03"
            }),
        ))
        .await
        .unwrap();
    let event_id = body_json(response).await["id"].as_str().unwrap().to_string();

    app.clone()
        .oneshot(json_request(
            "POST",
            "/contacts",
            Some(&token),
            json!({"name": "Dana", "event_id": event_id}),
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(get_request(
            &format!("/export/event/{event_id}/csv"),
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(disposition.contains("RustConf_contacts.csv"));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let csv = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(csv.contains("Dana"));
    assert!(csv.contains("RustConf"));

    // A made-up event id is absent, not an empty file.
    let response = app
        .oneshot(get_request(
            &format!("/export/event/{}/csv", uuid::Uuid::new_v4()),
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn public_profile_is_served_without_auth() {
    let (app, _) = test_app().await;
    let (_, user_id) = signup(&app, "ada@example.com").await;

    let response = app
        .clone()
        .oneshot(get_request(&format!("/profile/{user_id}"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["name"], "Test User");
    // Public payload carries no admin flag or timestamps.
    assert!(body.get("is_admin").is_none());
    assert!(body.get("created_at").is_none());
}

#[tokio::test]
async fn qr_endpoint_serves_both_modes() {
    let (app, _) = test_app().await;
    let (_, user_id) = signup(&app, "ada@example.com").await;

    // QR sharing is public, like the profile page it points at.
    let response = app
        .clone()
        .oneshot(get_request(&format!("/profile/qr/{user_id}"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["mode"], "url");
    assert!(body["qr_code"]
        .as_str()
        .unwrap()
        .starts_with("data:image/svg+xml;base64,"));
    assert!(body["profile_url"].as_str().unwrap().contains("/profile/"));

    let response = app
        .clone()
        .oneshot(get_request(&format!("/profile/qr/{user_id}?mode=vcard"), None))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["mode"], "vcard");
    assert!(body["vcard"].as_str().unwrap().starts_with("BEGIN:VCARD"));

    let response = app
        .oneshot(get_request(
            &format!("/profile/qr/{user_id}?mode=hologram"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
