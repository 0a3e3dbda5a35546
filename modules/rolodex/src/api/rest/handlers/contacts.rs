use std::sync::Arc;

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::{response::Json, Extension};
use uuid::Uuid;

use crate::api::rest::dto::{
    ContactDetailsDto, ContactDto, ContactsQuery, CreateContactReq, MediaDto, MediaReq, NoteReq,
    UpdateContactReq,
};
use crate::auth::CurrentUser;
use crate::domain::error::DomainError;
use crate::domain::model::{NewContact, NewMedia};
use crate::domain::service::Service;

pub async fn list_contacts(
    Extension(svc): Extension<Arc<Service>>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<ContactsQuery>,
) -> Result<Json<Vec<ContactDto>>, DomainError> {
    let contacts = svc
        .list_contacts(user.id, query.event_id, query.tag, query.q)
        .await?;
    Ok(Json(contacts.into_iter().map(ContactDto::from).collect()))
}

pub async fn get_contact(
    Extension(svc): Extension<Arc<Service>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ContactDetailsDto>, DomainError> {
    let details = svc.get_contact(user.id, id).await?;
    Ok(Json(details.into()))
}

pub async fn create_contact(
    Extension(svc): Extension<Arc<Service>>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<CreateContactReq>,
) -> Result<(StatusCode, Json<ContactDetailsDto>), DomainError> {
    let new_contact = NewContact::try_from(req)?;
    let created = svc.create_contact(user.id, new_contact).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

pub async fn update_contact(
    Extension(svc): Extension<Arc<Service>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateContactReq>,
) -> Result<Json<ContactDetailsDto>, DomainError> {
    let updated = svc.update_contact(user.id, id, req.into()).await?;
    Ok(Json(updated.into()))
}

pub async fn delete_contact(
    Extension(svc): Extension<Arc<Service>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, DomainError> {
    svc.delete_contact(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn append_note(
    Extension(svc): Extension<Arc<Service>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<NoteReq>,
) -> Result<Json<ContactDto>, DomainError> {
    let updated = svc.append_note(user.id, id, &req.note).await?;
    Ok(Json(updated.into()))
}

pub async fn add_media(
    Extension(svc): Extension<Arc<Service>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<MediaReq>,
) -> Result<(StatusCode, Json<MediaDto>), DomainError> {
    let media = NewMedia::try_from(req)?;
    let created = svc.add_media(user.id, id, media).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

pub async fn delete_media(
    Extension(svc): Extension<Arc<Service>>,
    CurrentUser(user): CurrentUser,
    Path((id, media_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, DomainError> {
    svc.delete_media(user.id, id, media_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
