use std::sync::Arc;

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::{response::Json, Extension};
use uuid::Uuid;

use crate::api::rest::dto::{CreateTagReq, ListTagsQuery, TagDto, UpdateTagReq};
use crate::auth::CurrentUser;
use crate::domain::error::DomainError;
use crate::domain::model::TagPatch;
use crate::domain::service::Service;

pub async fn list_tags(
    Extension(svc): Extension<Arc<Service>>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<ListTagsQuery>,
) -> Result<Json<Vec<TagDto>>, DomainError> {
    let tags = svc.list_tags(user.id, query.include_hidden).await?;
    Ok(Json(tags.into_iter().map(TagDto::from).collect()))
}

pub async fn list_system_tags(
    Extension(svc): Extension<Arc<Service>>,
    CurrentUser(_user): CurrentUser,
) -> Result<Json<Vec<TagDto>>, DomainError> {
    let tags = svc.system_tags().await?;
    Ok(Json(tags.into_iter().map(TagDto::from).collect()))
}

pub async fn create_tag(
    Extension(svc): Extension<Arc<Service>>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<CreateTagReq>,
) -> Result<(StatusCode, Json<TagDto>), DomainError> {
    let created = svc.create_tag(user.id, &req.name).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

pub async fn update_tag(
    Extension(svc): Extension<Arc<Service>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTagReq>,
) -> Result<Json<TagDto>, DomainError> {
    let patch = TagPatch {
        name: req.name,
        is_hidden: req.is_hidden,
    };
    let updated = svc.update_tag(user.id, id, patch).await?;
    Ok(Json(updated.into()))
}

pub async fn delete_tag(
    Extension(svc): Extension<Arc<Service>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, DomainError> {
    svc.delete_tag(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
