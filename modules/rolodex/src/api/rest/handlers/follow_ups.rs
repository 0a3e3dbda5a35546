use std::sync::Arc;

use axum::extract::Path;
use axum::http::StatusCode;
use axum::{response::Json, Extension};
use uuid::Uuid;

use crate::api::rest::dto::{CreateFollowUpReq, FollowUpDto, UpdateFollowUpReq};
use crate::auth::CurrentUser;
use crate::domain::error::DomainError;
use crate::domain::model::FollowUpPatch;
use crate::domain::service::Service;

pub async fn list_follow_ups(
    Extension(svc): Extension<Arc<Service>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<FollowUpDto>>, DomainError> {
    let follow_ups = svc.list_follow_ups(user.id).await?;
    Ok(Json(follow_ups.into_iter().map(FollowUpDto::from).collect()))
}

pub async fn list_contact_follow_ups(
    Extension(svc): Extension<Arc<Service>>,
    CurrentUser(user): CurrentUser,
    Path(contact_id): Path<Uuid>,
) -> Result<Json<Vec<FollowUpDto>>, DomainError> {
    let follow_ups = svc.contact_follow_ups(user.id, contact_id).await?;
    Ok(Json(follow_ups.into_iter().map(FollowUpDto::from).collect()))
}

pub async fn create_follow_up(
    Extension(svc): Extension<Arc<Service>>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<CreateFollowUpReq>,
) -> Result<(StatusCode, Json<FollowUpDto>), DomainError> {
    let created = svc.create_follow_up(user.id, req.into()).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

pub async fn update_follow_up(
    Extension(svc): Extension<Arc<Service>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateFollowUpReq>,
) -> Result<Json<FollowUpDto>, DomainError> {
    let patch = FollowUpPatch::try_from(req)?;
    let updated = svc.update_follow_up(user.id, id, patch).await?;
    Ok(Json(updated.into()))
}

pub async fn delete_follow_up(
    Extension(svc): Extension<Arc<Service>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, DomainError> {
    svc.delete_follow_up(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
