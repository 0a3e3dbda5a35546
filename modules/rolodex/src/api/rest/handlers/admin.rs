use std::sync::Arc;

use axum::extract::Path;
use axum::http::StatusCode;
use axum::{response::Json, Extension};
use uuid::Uuid;

use crate::api::rest::dto::{AdminCreateUserReq, AdminUpdateUserReq, AuthDto, UserDto};
use crate::auth::CurrentAdmin;
use crate::domain::error::DomainError;
use crate::domain::service::Service;

pub async fn list_users(
    Extension(svc): Extension<Arc<Service>>,
    CurrentAdmin(_admin): CurrentAdmin,
) -> Result<Json<Vec<UserDto>>, DomainError> {
    let users = svc.list_users().await?;
    Ok(Json(users.into_iter().map(UserDto::from).collect()))
}

pub async fn get_user(
    Extension(svc): Extension<Arc<Service>>,
    CurrentAdmin(_admin): CurrentAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<UserDto>, DomainError> {
    let user = svc.get_user(id).await?;
    Ok(Json(user.into()))
}

pub async fn create_user(
    Extension(svc): Extension<Arc<Service>>,
    CurrentAdmin(_admin): CurrentAdmin,
    Json(req): Json<AdminCreateUserReq>,
) -> Result<(StatusCode, Json<UserDto>), DomainError> {
    let created = svc
        .admin_create_user(&req.email, &req.name, req.password.as_deref(), req.is_admin)
        .await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

pub async fn update_user(
    Extension(svc): Extension<Arc<Service>>,
    CurrentAdmin(admin): CurrentAdmin,
    Path(id): Path<Uuid>,
    Json(req): Json<AdminUpdateUserReq>,
) -> Result<Json<UserDto>, DomainError> {
    // An admin cannot strip their own admin flag.
    if admin.id == id && req.is_admin == Some(false) {
        return Err(DomainError::forbidden(
            "cannot remove your own admin status",
        ));
    }
    let updated = svc.admin_update_user(id, req.into()).await?;
    Ok(Json(updated.into()))
}

/// Impersonation: returns a token minted for the target user.
pub async fn login_as(
    Extension(svc): Extension<Arc<Service>>,
    CurrentAdmin(_admin): CurrentAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<AuthDto>, DomainError> {
    let (user, token) = svc.admin_login_as(id).await?;
    Ok(Json(AuthDto {
        token,
        user: user.into(),
    }))
}

pub async fn delete_user(
    Extension(svc): Extension<Arc<Service>>,
    CurrentAdmin(admin): CurrentAdmin,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, DomainError> {
    // An admin cannot delete their own account mid-session.
    if admin.id == id {
        return Err(DomainError::forbidden("cannot delete your own account"));
    }
    svc.admin_delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
