use std::sync::Arc;

use axum::{response::Json, Extension};
use tracing::info;

use crate::api::rest::dto::{AuthDto, EmailLoginReq, OauthLoginReq, UserDto};
use crate::domain::error::DomainError;
use crate::domain::service::Service;

/// Login with an identity already verified by an OAuth provider.
pub async fn oauth_login(
    Extension(svc): Extension<Arc<Service>>,
    Json(req): Json<OauthLoginReq>,
) -> Result<Json<AuthDto>, DomainError> {
    let (user, token) = svc
        .oauth_login(
            &req.provider,
            &req.oauth_id,
            &req.email,
            &req.name,
            req.profile_photo_url,
        )
        .await?;
    info!(user_id = %user.id, provider = %req.provider, "oauth login");
    Ok(Json(AuthDto {
        token,
        user: UserDto::from(user),
    }))
}

/// Email + password login; creates the account when the email is new.
pub async fn email_login(
    Extension(svc): Extension<Arc<Service>>,
    Json(req): Json<EmailLoginReq>,
) -> Result<Json<AuthDto>, DomainError> {
    let (user, token) = svc.email_login(&req.email, &req.password, req.name).await?;
    info!(user_id = %user.id, "email login");
    Ok(Json(AuthDto {
        token,
        user: UserDto::from(user),
    }))
}
