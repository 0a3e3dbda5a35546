use std::sync::Arc;

use axum::extract::Path;
use axum::http::StatusCode;
use axum::{response::Json, Extension};
use uuid::Uuid;

use crate::api::rest::dto::{EventDto, EventReq};
use crate::auth::CurrentUser;
use crate::domain::error::DomainError;
use crate::domain::service::Service;

pub async fn list_events(
    Extension(svc): Extension<Arc<Service>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<EventDto>>, DomainError> {
    let events = svc.list_events(user.id).await?;
    Ok(Json(events.into_iter().map(EventDto::from).collect()))
}

pub async fn get_event(
    Extension(svc): Extension<Arc<Service>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<EventDto>, DomainError> {
    let event = svc.get_event(user.id, id).await?;
    Ok(Json(event.into()))
}

pub async fn create_event(
    Extension(svc): Extension<Arc<Service>>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<EventReq>,
) -> Result<(StatusCode, Json<EventDto>), DomainError> {
    let created = svc.create_event(user.id, req.into()).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

pub async fn update_event(
    Extension(svc): Extension<Arc<Service>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<EventReq>,
) -> Result<Json<EventDto>, DomainError> {
    let updated = svc.update_event(user.id, id, req.into()).await?;
    Ok(Json(updated.into()))
}

pub async fn delete_event(
    Extension(svc): Extension<Arc<Service>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, DomainError> {
    svc.delete_event(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
