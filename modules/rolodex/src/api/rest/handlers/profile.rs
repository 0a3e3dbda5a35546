use std::sync::Arc;

use axum::extract::{Path, Query};
use axum::{response::Json, Extension};
use tracing::debug;
use uuid::Uuid;

use crate::api::rest::dto::{PublicProfileDto, QrDto, QrQuery, UpdateProfileReq, UserDto};
use crate::auth::CurrentUser;
use crate::cache::{
    private_profile_key, public_profile_key, qr_key, PRIVATE_PROFILE_TTL, PUBLIC_PROFILE_TTL,
    QR_TTL,
};
use crate::domain::error::DomainError;
use crate::domain::model::QrMode;
use crate::domain::service::Service;

/// The caller's own profile, served read-through from the cache.
pub async fn get_me(
    Extension(svc): Extension<Arc<Service>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<UserDto>, DomainError> {
    let key = private_profile_key(user.id);
    if let Some(hit) = svc.cache().get(&key).await {
        if let Ok(dto) = serde_json::from_str::<UserDto>(&hit) {
            debug!(user_id = %user.id, "profile cache hit");
            return Ok(Json(dto));
        }
    }

    let dto = UserDto::from(user);
    if let Ok(serialized) = serde_json::to_string(&dto) {
        svc.cache().set(&key, &serialized, PRIVATE_PROFILE_TTL).await;
    }
    Ok(Json(dto))
}

/// Profile update. Every cached rendering of this profile is invalidated,
/// QR payloads included since the vCard embeds profile fields.
pub async fn update_me(
    Extension(svc): Extension<Arc<Service>>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<UpdateProfileReq>,
) -> Result<Json<UserDto>, DomainError> {
    let updated = svc.update_profile(user.id, req.into()).await?;

    let cache = svc.cache();
    cache.delete(&private_profile_key(user.id)).await;
    cache.delete(&public_profile_key(user.id)).await;
    cache.delete(&qr_key(user.id, QrMode::Url.as_str())).await;
    cache.delete(&qr_key(user.id, QrMode::Vcard.as_str())).await;

    Ok(Json(UserDto::from(updated)))
}

/// Unauthenticated public profile, the target of shared QR links.
pub async fn get_public(
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<Uuid>,
) -> Result<Json<PublicProfileDto>, DomainError> {
    let key = public_profile_key(id);
    if let Some(hit) = svc.cache().get(&key).await {
        if let Ok(dto) = serde_json::from_str::<PublicProfileDto>(&hit) {
            return Ok(Json(dto));
        }
    }

    let dto = PublicProfileDto::from(svc.get_user(id).await?);
    if let Ok(serialized) = serde_json::to_string(&dto) {
        svc.cache().set(&key, &serialized, PUBLIC_PROFILE_TTL).await;
    }
    Ok(Json(dto))
}

/// QR payload for sharing a profile, cached per mode. Public like the
/// profile page it points at.
pub async fn get_qr(
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<Uuid>,
    Query(query): Query<QrQuery>,
) -> Result<Json<QrDto>, DomainError> {
    let mode = match query.mode.as_deref() {
        Some(raw) => QrMode::parse(raw)?,
        None => QrMode::Url,
    };

    let key = qr_key(id, mode.as_str());
    if let Some(hit) = svc.cache().get(&key).await {
        if let Ok(dto) = serde_json::from_str::<QrDto>(&hit) {
            return Ok(Json(dto));
        }
    }

    let dto = QrDto::from(svc.profile_qr(id, mode).await?);
    if let Ok(serialized) = serde_json::to_string(&dto) {
        svc.cache().set(&key, &serialized, QR_TTL).await;
    }
    Ok(Json(dto))
}
