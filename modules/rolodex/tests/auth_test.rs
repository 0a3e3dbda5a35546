use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

use rolodex::domain::error::DomainError;
use rolodex::domain::model::UserPatch;
use rolodex::domain::service::{Service, ServiceConfig};
use rolodex::infra::storage::migrations::Migrator;

async fn test_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1);
    let db = Database::connect(options)
        .await
        .expect("Failed to connect to test database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

async fn test_service() -> Service {
    Service::new(test_db().await, ServiceConfig::default())
}

#[tokio::test]
async fn email_signup_then_login() {
    let svc = test_service().await;

    let (created, token) = svc
        .email_login("ada@example.com", "hunter22", Some("Ada".into()))
        .await
        .unwrap();
    assert_eq!(created.email, "ada@example.com");
    assert!(created.password_hash.is_some());

    let authenticated = svc.authenticate(&token).await.unwrap();
    assert_eq!(authenticated.id, created.id);

    // Second login with the same credentials resolves the same account.
    let (again, _token) = svc
        .email_login("ada@example.com", "hunter22", None)
        .await
        .unwrap();
    assert_eq!(again.id, created.id);
}

#[tokio::test]
async fn email_is_case_insensitive() {
    let svc = test_service().await;
    let (created, _) = svc
        .email_login("Ada@Example.com", "hunter22", Some("Ada".into()))
        .await
        .unwrap();
    let (found, _) = svc
        .email_login("ada@example.com", "hunter22", None)
        .await
        .unwrap();
    assert_eq!(created.id, found.id);
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let svc = test_service().await;
    svc.email_login("ada@example.com", "hunter22", Some("Ada".into()))
        .await
        .unwrap();

    let err = svc
        .email_login("ada@example.com", "wrong", None)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Unauthorized));
}

#[tokio::test]
async fn signup_requires_name_and_password_length() {
    let svc = test_service().await;

    let err = svc
        .email_login("new@example.com", "hunter22", None)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { .. }));

    let err = svc
        .email_login("new@example.com", "short", Some("New".into()))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { .. }));
}

#[tokio::test]
async fn oauth_login_upserts_by_email() {
    let svc = test_service().await;

    let (created, _) = svc
        .oauth_login("google", "goog-1", "ada@example.com", "Ada", None)
        .await
        .unwrap();
    assert_eq!(created.oauth_provider.as_deref(), Some("google"));
    assert!(created.password_hash.is_none());

    // Same email through another provider still maps to the same account.
    let (linked, _) = svc
        .oauth_login("github", "gh-9", "ada@example.com", "Ada L", None)
        .await
        .unwrap();
    assert_eq!(linked.id, created.id);
    assert_eq!(linked.oauth_provider.as_deref(), Some("github"));
}

#[tokio::test]
async fn oauth_only_account_cannot_use_password_login() {
    let svc = test_service().await;
    svc.oauth_login("google", "goog-1", "ada@example.com", "Ada", None)
        .await
        .unwrap();

    let err = svc
        .email_login("ada@example.com", "whatever", None)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { .. }));
}

#[tokio::test]
async fn token_of_a_deleted_user_stops_working() {
    let svc = test_service().await;
    let (user, token) = svc
        .email_login("ada@example.com", "hunter22", Some("Ada".into()))
        .await
        .unwrap();

    svc.admin_delete_user(user.id).await.unwrap();

    let err = svc.authenticate(&token).await.unwrap_err();
    assert!(matches!(err, DomainError::Unauthorized));
}

#[tokio::test]
async fn tampered_token_is_rejected() {
    let svc = test_service().await;
    let (_, token) = svc
        .email_login("ada@example.com", "hunter22", Some("Ada".into()))
        .await
        .unwrap();

    let mut tampered = token.clone();
    tampered.push('x');
    assert!(matches!(
        svc.authenticate(&tampered).await.unwrap_err(),
        DomainError::Unauthorized
    ));
}

#[tokio::test]
async fn blank_profile_fields_clear_but_name_cannot() {
    let svc = test_service().await;
    let (user, _) = svc
        .email_login("ada@example.com", "hunter22", Some("Ada".into()))
        .await
        .unwrap();

    let updated = svc
        .update_profile(
            user.id,
            UserPatch {
                mobile: Some("+44 20 7946 0958".into()),
                about_me: Some("Engineer".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.mobile.as_deref(), Some("+44 20 7946 0958"));

    let cleared = svc
        .update_profile(
            user.id,
            UserPatch {
                mobile: Some("".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(cleared.mobile, None);
    // Untouched field keeps its value.
    assert_eq!(cleared.about_me.as_deref(), Some("Engineer"));

    let err = svc
        .update_profile(
            user.id,
            UserPatch {
                name: Some("   ".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { .. }));
}

#[tokio::test]
async fn admin_create_rejects_duplicate_email() {
    let svc = test_service().await;
    svc.admin_create_user("ada@example.com", "Ada", Some("hunter22"), false)
        .await
        .unwrap();

    let err = svc
        .admin_create_user("ada@example.com", "Other", None, false)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict { .. }));
}
