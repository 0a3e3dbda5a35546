use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::error::DomainError;

/// Pure user model; REST DTOs live in `api::rest::dto`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub password_hash: Option<String>,
    pub role_company: Option<String>,
    pub mobile: Option<String>,
    pub whatsapp: Option<String>,
    pub linkedin_url: Option<String>,
    pub about_me: Option<String>,
    pub profile_photo_url: Option<String>,
    pub oauth_provider: Option<String>,
    pub oauth_id: Option<String>,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for creating a new user (signup, OAuth upsert, admin create).
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password_hash: Option<String>,
    pub profile_photo_url: Option<String>,
    pub oauth_provider: Option<String>,
    pub oauth_id: Option<String>,
    pub is_admin: bool,
}

/// Partial profile update. `Some("")` clears an optional field; the
/// display name never becomes blank.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub role_company: Option<String>,
    pub mobile: Option<String>,
    pub whatsapp: Option<String>,
    pub linkedin_url: Option<String>,
    pub about_me: Option<String>,
    pub profile_photo_url: Option<String>,
}

/// Admin-only user update; may change email, admin flag and password.
#[derive(Debug, Clone, Default)]
pub struct AdminUserPatch {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
    pub is_admin: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub location: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full event payload; PUT replaces every field, like the create call.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub name: String,
    pub location: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Contact {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Option<Uuid>,
    pub name: String,
    pub email: Option<String>,
    pub role_company: Option<String>,
    pub mobile: Option<String>,
    pub linkedin_url: Option<String>,
    pub contact_photo_url: Option<String>,
    pub meeting_context: Option<String>,
    pub meeting_latitude: Option<f64>,
    pub meeting_longitude: Option<f64>,
    pub meeting_location_name: Option<String>,
    pub meeting_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct NewContact {
    pub name: String,
    pub email: Option<String>,
    pub role_company: Option<String>,
    pub mobile: Option<String>,
    pub linkedin_url: Option<String>,
    pub contact_photo_url: Option<String>,
    pub meeting_context: Option<String>,
    pub meeting_latitude: Option<f64>,
    pub meeting_longitude: Option<f64>,
    pub meeting_location_name: Option<String>,
    pub meeting_date: Option<DateTime<Utc>>,
    /// Dropped silently when the event is not owned by the caller.
    pub event_id: Option<Uuid>,
    /// Tag names, each resolved through find-or-create.
    pub tags: Vec<String>,
    /// Media descriptors whose URLs were already produced by object storage.
    pub media: Vec<NewMedia>,
}

/// Partial contact update. The nested option on `event_id` distinguishes
/// "leave as is" (None) from "clear the link" (Some(None)).
#[derive(Debug, Clone, Default)]
pub struct ContactPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role_company: Option<String>,
    pub mobile: Option<String>,
    pub linkedin_url: Option<String>,
    pub contact_photo_url: Option<String>,
    pub meeting_context: Option<String>,
    pub meeting_location_name: Option<String>,
    pub event_id: Option<Option<Uuid>>,
    /// When present, replaces the contact's tag set.
    pub tags: Option<Vec<String>>,
}

/// A contact with its relations resolved, as served to clients and exports.
#[derive(Debug, Clone)]
pub struct ContactDetails {
    pub contact: Contact,
    pub event: Option<Event>,
    pub tags: Vec<Tag>,
    pub media: Vec<MediaAttachment>,
    pub follow_ups: Vec<FollowUp>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    pub user_id: Option<Uuid>,
    pub is_system_tag: bool,
    pub is_hidden: bool,
    pub created_at: DateTime<Utc>,
}

/// Composite identity of a tag name within the shared namespace: either a
/// system tag visible to everyone or a custom tag scoped to one owner.
/// Making the null-owner case a distinct variant keeps the find-or-create
/// logic honest about which bucket it is searching.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TagKey {
    System(String),
    Owned(Uuid, String),
}

impl TagKey {
    pub fn name(&self) -> &str {
        match self {
            TagKey::System(name) => name,
            TagKey::Owned(_, name) => name,
        }
    }

    pub fn owner(&self) -> Option<Uuid> {
        match self {
            TagKey::System(_) => None,
            TagKey::Owned(owner, _) => Some(*owner),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TagPatch {
    pub name: Option<String>,
    pub is_hidden: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Audio,
    Document,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Audio => "audio",
            MediaKind::Document => "document",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "image" => Ok(MediaKind::Image),
            "audio" => Ok(MediaKind::Audio),
            "document" => Ok(MediaKind::Document),
            other => Err(DomainError::validation(
                "file_type",
                format!("unknown media type '{other}'"),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaAttachment {
    pub id: Uuid,
    pub contact_id: Uuid,
    pub file_url: String,
    pub file_type: MediaKind,
    pub file_name: Option<String>,
    pub file_size: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewMedia {
    pub file_url: String,
    pub file_type: MediaKind,
    pub file_name: Option<String>,
    pub file_size: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUpStatus {
    Pending,
    Sent,
    Completed,
}

impl FollowUpStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FollowUpStatus::Pending => "pending",
            FollowUpStatus::Sent => "sent",
            FollowUpStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "pending" => Ok(FollowUpStatus::Pending),
            "sent" => Ok(FollowUpStatus::Sent),
            "completed" => Ok(FollowUpStatus::Completed),
            other => Err(DomainError::validation(
                "status",
                format!("unknown follow-up status '{other}'"),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowUp {
    pub id: Uuid,
    pub contact_id: Uuid,
    pub user_id: Uuid,
    pub message: String,
    pub follow_up_date: Option<NaiveDate>,
    pub status: FollowUpStatus,
    pub sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewFollowUp {
    pub contact_id: Uuid,
    pub message: String,
    pub follow_up_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default)]
pub struct FollowUpPatch {
    pub status: Option<FollowUpStatus>,
    pub sent_at: Option<DateTime<Utc>>,
}

/// QR sharing payload: either a public profile URL or an inline vCard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QrMode {
    Url,
    Vcard,
}

impl QrMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            QrMode::Url => "url",
            QrMode::Vcard => "vcard",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "url" => Ok(QrMode::Url),
            "vcard" => Ok(QrMode::Vcard),
            other => Err(DomainError::validation(
                "mode",
                format!("unknown QR mode '{other}'"),
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct QrPayload {
    pub mode: QrMode,
    /// SVG image as a data URL, ready for an <img> tag.
    pub qr_code: String,
    /// Set in `Url` mode.
    pub profile_url: Option<String>,
    /// Set in `Vcard` mode.
    pub vcard: Option<String>,
}
