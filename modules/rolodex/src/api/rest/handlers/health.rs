use std::sync::Arc;

use axum::{response::Json, Extension};

use crate::api::rest::dto::HealthDto;
use crate::domain::error::DomainError;
use crate::domain::service::Service;

pub async fn health(
    Extension(svc): Extension<Arc<Service>>,
) -> Result<Json<HealthDto>, DomainError> {
    svc.health().await?;
    Ok(Json(HealthDto {
        status: "ok".to_string(),
    }))
}
