use chrono::NaiveDate;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

use rolodex::domain::error::DomainError;
use rolodex::domain::model::{
    ContactPatch, FollowUpPatch, FollowUpStatus, NewContact, NewEvent, NewFollowUp, User,
};
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

async fn signup(svc: &Service, email: &str) -> User {
    let (user, _token) = svc
        .email_login(email, "secret-pass", Some("Test User".into()))
        .await
        .expect("signup failed");
    user
}

#[tokio::test]
async fn another_tenants_contact_reads_as_absent() {
    let svc = test_service().await;
    let alice = signup(&svc, "alice@example.com").await;
    let bob = signup(&svc, "bob@example.com").await;

    let details = svc
        .create_contact(
            alice.id,
            NewContact {
                name: "Dana".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let contact_id = details.contact.id;

    assert!(matches!(
        svc.get_contact(bob.id, contact_id).await.unwrap_err(),
        DomainError::NotFound { .. }
    ));
    assert!(matches!(
        svc.update_contact(bob.id, contact_id, ContactPatch::default())
            .await
            .unwrap_err(),
        DomainError::NotFound { .. }
    ));
    assert!(matches!(
        svc.delete_contact(bob.id, contact_id).await.unwrap_err(),
        DomainError::NotFound { .. }
    ));

    // Still intact for the owner.
    assert!(svc.get_contact(alice.id, contact_id).await.is_ok());
}

#[tokio::test]
async fn another_tenants_event_reads_as_absent() {
    let svc = test_service().await;
    let alice = signup(&svc, "alice@example.com").await;
    let bob = signup(&svc, "bob@example.com").await;

    let event = svc
        .create_event(
            alice.id,
            NewEvent {
                name: "RustConf".into(),
                location: "Montreal".into(),
                start_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2026, 9, 3).unwrap(),
                description: None,
            },
        )
        .await
        .unwrap();

    assert!(matches!(
        svc.get_event(bob.id, event.id).await.unwrap_err(),
        DomainError::NotFound { .. }
    ));
    assert!(matches!(
        svc.delete_event(bob.id, event.id).await.unwrap_err(),
        DomainError::NotFound { .. }
    ));
}

#[tokio::test]
async fn listings_are_scoped_to_the_owner() {
    let svc = test_service().await;
    let alice = signup(&svc, "alice@example.com").await;
    let bob = signup(&svc, "bob@example.com").await;

    svc.create_contact(
        alice.id,
        NewContact {
            name: "Dana".into(),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let bobs = svc.list_contacts(bob.id, None, None, None).await.unwrap();
    assert!(bobs.is_empty());
}

#[tokio::test]
async fn follow_ups_are_scoped_to_the_owner() {
    let svc = test_service().await;
    let alice = signup(&svc, "alice@example.com").await;
    let bob = signup(&svc, "bob@example.com").await;

    let details = svc
        .create_contact(
            alice.id,
            NewContact {
                name: "Dana".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    // Bob cannot hang a follow-up on Alice's contact.
    let err = svc
        .create_follow_up(
            bob.id,
            NewFollowUp {
                contact_id: details.contact.id,
                message: "hi".into(),
                follow_up_date: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));

    let follow_up = svc
        .create_follow_up(
            alice.id,
            NewFollowUp {
                contact_id: details.contact.id,
                message: "Send the deck".into(),
                follow_up_date: None,
            },
        )
        .await
        .unwrap();

    let err = svc
        .update_follow_up(bob.id, follow_up.id, FollowUpPatch::default())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}

#[tokio::test]
async fn marking_a_follow_up_sent_stamps_the_time_once() {
    let svc = test_service().await;
    let alice = signup(&svc, "alice@example.com").await;

    let details = svc
        .create_contact(
            alice.id,
            NewContact {
                name: "Dana".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let follow_up = svc
        .create_follow_up(
            alice.id,
            NewFollowUp {
                contact_id: details.contact.id,
                message: "Send the deck".into(),
                follow_up_date: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(follow_up.status, FollowUpStatus::Pending);
    assert!(follow_up.sent_at.is_none());

    let sent = svc
        .update_follow_up(
            alice.id,
            follow_up.id,
            FollowUpPatch {
                status: Some(FollowUpStatus::Sent),
                sent_at: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(sent.status, FollowUpStatus::Sent);
    let first_stamp = sent.sent_at.expect("sent_at should be stamped");

    let completed = svc
        .update_follow_up(
            alice.id,
            follow_up.id,
            FollowUpPatch {
                status: Some(FollowUpStatus::Completed),
                sent_at: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(completed.status, FollowUpStatus::Completed);
    assert_eq!(completed.sent_at, Some(first_stamp));
}

#[tokio::test]
async fn unowned_event_reference_is_dropped_on_create() {
    let svc = test_service().await;
    let alice = signup(&svc, "alice@example.com").await;
    let bob = signup(&svc, "bob@example.com").await;

    let bobs_event = svc
        .create_event(
            bob.id,
            NewEvent {
                name: "BobConf".into(),
                location: "Austin".into(),
                start_date: NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2026, 5, 2).unwrap(),
                description: None,
            },
        )
        .await
        .unwrap();

    let details = svc
        .create_contact(
            alice.id,
            NewContact {
                name: "Dana".into(),
                event_id: Some(bobs_event.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(details.contact.event_id, None);

    // A dangling id behaves the same.
    let details = svc
        .create_contact(
            alice.id,
            NewContact {
                name: "Eve".into(),
                event_id: Some(Uuid::new_v4()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(details.contact.event_id, None);
}

#[tokio::test]
async fn relinking_on_update_requires_owning_the_event() {
    let svc = test_service().await;
    let alice = signup(&svc, "alice@example.com").await;
    let bob = signup(&svc, "bob@example.com").await;

    let bobs_event = svc
        .create_event(
            bob.id,
            NewEvent {
                name: "BobConf".into(),
                location: "Austin".into(),
                start_date: NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2026, 5, 2).unwrap(),
                description: None,
            },
        )
        .await
        .unwrap();

    let details = svc
        .create_contact(
            alice.id,
            NewContact {
                name: "Dana".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let err = svc
        .update_contact(
            alice.id,
            details.contact.id,
            ContactPatch {
                event_id: Some(Some(bobs_event.id)),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}
