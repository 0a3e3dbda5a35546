use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::domain::error::DomainError;
use crate::domain::model::User;
use crate::domain::service::Service;

/// Extractor for authenticated routes. Resolves the Bearer token to a live
/// user row; a deleted user's token stops working immediately.
pub struct CurrentUser(pub User);

/// Extractor for admin-only routes. Authenticates like [`CurrentUser`] and
/// then requires the admin flag.
pub struct CurrentAdmin(pub User);

fn bearer_token(parts: &Parts) -> Result<&str, DomainError> {
    let header = parts
        .headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or(DomainError::Unauthorized)?;
    let value = header.to_str().map_err(|_| DomainError::Unauthorized)?;
    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(DomainError::Unauthorized)
}

async fn authenticate(parts: &mut Parts) -> Result<User, DomainError> {
    let service = parts
        .extensions
        .get::<Arc<Service>>()
        .cloned()
        .ok_or_else(|| DomainError::database("service not attached to router"))?;
    let token = bearer_token(parts)?;
    service.authenticate(token).await
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = DomainError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        authenticate(parts).await.map(CurrentUser)
    }
}

impl<S> FromRequestParts<S> for CurrentAdmin
where
    S: Send + Sync,
{
    type Rejection = DomainError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = authenticate(parts).await?;
        if !user.is_admin {
            return Err(DomainError::forbidden("Admin access required"));
        }
        Ok(CurrentAdmin(user))
    }
}
