use std::sync::Arc;

use axum::extract::Path;
use axum::http::{header, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use uuid::Uuid;

use crate::api::rest::dto::ExportContactsReq;
use crate::auth::CurrentUser;
use crate::domain::error::DomainError;
use crate::domain::service::Service;

/// CSV download of every contact captured at one of the caller's events.
pub async fn event_csv(
    Extension(svc): Extension<Arc<Service>>,
    CurrentUser(user): CurrentUser,
    Path(event_id): Path<Uuid>,
) -> Result<Response, DomainError> {
    let (event_name, csv) = svc.event_contacts_csv(user.id, event_id).await?;
    let filename = format!("{}_contacts.csv", event_name.replace(' ', "_"));
    Ok(csv_response(csv, &filename))
}

/// CSV download of an explicit selection of the caller's contacts.
pub async fn contacts_csv(
    Extension(svc): Extension<Arc<Service>>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<ExportContactsReq>,
) -> Result<Response, DomainError> {
    let csv = svc.selected_contacts_csv(user.id, &req.contact_ids).await?;
    let filename = format!("contacts_export_{}_contacts.csv", req.contact_ids.len());
    Ok(csv_response(csv, &filename))
}

fn csv_response(csv: String, filename: &str) -> Response {
    let mut response = csv.into_response();
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/csv; charset=utf-8"),
    );
    // Event names can carry characters a header value rejects; fall back to
    // a plain name rather than failing the download.
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{filename}\""))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment; filename=\"contacts.csv\""));
    response
        .headers_mut()
        .insert(header::CONTENT_DISPOSITION, disposition);
    response
}
