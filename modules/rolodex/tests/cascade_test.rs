use chrono::NaiveDate;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

use rolodex::domain::error::DomainError;
use rolodex::domain::model::{MediaKind, NewContact, NewEvent, NewFollowUp, NewMedia, User};
use rolodex::domain::service::{Service, ServiceConfig};
use rolodex::infra::storage::migrations::Migrator;
use rolodex::infra::storage::{contacts, events, follow_ups, media_attachments, tags};

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

fn sample_event() -> NewEvent {
    NewEvent {
        name: "RustConf".into(),
        location: "Montreal".into(),
        start_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2026, 9, 3).unwrap(),
        description: None,
    }
}

#[tokio::test]
async fn deleting_an_event_keeps_contacts_and_clears_their_link() {
    let svc = test_service().await;
    let alice = signup(&svc, "alice@example.com").await;

    let event = svc.create_event(alice.id, sample_event()).await.unwrap();
    let details = svc
        .create_contact(
            alice.id,
            NewContact {
                name: "Dana".into(),
                event_id: Some(event.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(details.contact.event_id, Some(event.id));

    svc.delete_event(alice.id, event.id).await.unwrap();

    let reloaded = svc.get_contact(alice.id, details.contact.id).await.unwrap();
    assert_eq!(reloaded.contact.event_id, None);
    assert!(reloaded.event.is_none());
}

#[tokio::test]
async fn deleting_a_contact_removes_its_children_but_not_the_tag() {
    let svc = test_service().await;
    let alice = signup(&svc, "alice@example.com").await;

    let details = svc
        .create_contact(
            alice.id,
            NewContact {
                name: "Dana".into(),
                tags: vec!["VIP".into()],
                media: vec![NewMedia {
                    file_url: "https://cdn.example/card.jpg".into(),
                    file_type: MediaKind::Image,
                    file_name: Some("card.jpg".into()),
                    file_size: Some(1024),
                }],
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let contact_id = details.contact.id;
    let tag_id = details.tags[0].id;
    let media_id = details.media[0].id;

    svc.create_follow_up(
        alice.id,
        NewFollowUp {
            contact_id,
            message: "Send the deck".into(),
            follow_up_date: None,
        },
    )
    .await
    .unwrap();

    svc.delete_contact(alice.id, contact_id).await.unwrap();

    let db = svc.db();
    assert!(contacts::find_owned(db, alice.id, contact_id)
        .await
        .unwrap()
        .is_none());
    assert!(media_attachments::find_by_id(db, media_id)
        .await
        .unwrap()
        .is_none());
    assert!(follow_ups::list_owned(db, alice.id).await.unwrap().is_empty());

    // The tag itself survives; only the link is gone.
    assert!(tags::find_by_id(db, tag_id).await.unwrap().is_some());
    svc.delete_tag(alice.id, tag_id).await.unwrap();
}

#[tokio::test]
async fn deleting_a_user_cascades_to_everything_they_own() {
    let svc = test_service().await;
    let alice = signup(&svc, "alice@example.com").await;

    let event = svc.create_event(alice.id, sample_event()).await.unwrap();
    let details = svc
        .create_contact(
            alice.id,
            NewContact {
                name: "Dana".into(),
                event_id: Some(event.id),
                tags: vec!["VIP".into()],
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let tag_id = details.tags[0].id;

    svc.admin_delete_user(alice.id).await.unwrap();

    let db = svc.db();
    assert!(events::find_owned(db, alice.id, event.id)
        .await
        .unwrap()
        .is_none());
    assert!(contacts::find_owned(db, alice.id, details.contact.id)
        .await
        .unwrap()
        .is_none());
    assert!(tags::find_by_id(db, tag_id).await.unwrap().is_none());

    let err = svc.get_user(alice.id).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}

#[tokio::test]
async fn event_dates_are_validated() {
    let svc = test_service().await;
    let alice = signup(&svc, "alice@example.com").await;

    let mut event = sample_event();
    event.end_date = NaiveDate::from_ymd_opt(2026, 8, 30).unwrap();

    let err = svc.create_event(alice.id, event).await.unwrap_err();
    assert!(matches!(err, DomainError::Validation { .. }));
}
