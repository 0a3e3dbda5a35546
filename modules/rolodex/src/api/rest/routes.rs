use std::sync::Arc;

use axum::routing::{delete, get, post, put};
use axum::{Extension, Router};

use crate::api::rest::handlers::{
    admin, auth, contacts, events, export, follow_ups, health, profile, tags,
};
use crate::domain::service::Service;

/// Builds the full API router with the service attached as an extension.
/// Authentication happens per-route via the extractors, so public routes
/// (health, login, public profile) need no special casing here.
pub fn router(service: Arc<Service>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/auth/oauth", post(auth::oauth_login))
        .route("/auth/email", post(auth::email_login))
        .route(
            "/profile/me",
            get(profile::get_me).put(profile::update_me),
        )
        .route("/profile/qr/{id}", get(profile::get_qr))
        .route("/profile/{id}", get(profile::get_public))
        .route(
            "/events",
            get(events::list_events).post(events::create_event),
        )
        .route(
            "/events/{id}",
            get(events::get_event)
                .put(events::update_event)
                .delete(events::delete_event),
        )
        .route(
            "/contacts",
            get(contacts::list_contacts).post(contacts::create_contact),
        )
        .route(
            "/contacts/{id}",
            get(contacts::get_contact)
                .put(contacts::update_contact)
                .delete(contacts::delete_contact),
        )
        .route("/contacts/{id}/notes", post(contacts::append_note))
        .route("/contacts/{id}/media", post(contacts::add_media))
        .route(
            "/contacts/{id}/media/{media_id}",
            delete(contacts::delete_media),
        )
        .route("/tags", get(tags::list_tags).post(tags::create_tag))
        .route("/tags/system", get(tags::list_system_tags))
        .route(
            "/tags/{id}",
            put(tags::update_tag).delete(tags::delete_tag),
        )
        .route(
            "/followups",
            get(follow_ups::list_follow_ups).post(follow_ups::create_follow_up),
        )
        .route(
            "/followups/{id}",
            put(follow_ups::update_follow_up).delete(follow_ups::delete_follow_up),
        )
        .route(
            "/followups/contact/{contact_id}",
            get(follow_ups::list_contact_follow_ups),
        )
        .route("/export/event/{id}/csv", get(export::event_csv))
        .route("/export/contacts/csv", post(export::contacts_csv))
        .route(
            "/admin/users",
            get(admin::list_users).post(admin::create_user),
        )
        .route(
            "/admin/users/{id}",
            get(admin::get_user)
                .put(admin::update_user)
                .delete(admin::delete_user),
        )
        .route("/admin/login-as/{id}", post(admin::login_as))
        .layer(Extension(service))
}
