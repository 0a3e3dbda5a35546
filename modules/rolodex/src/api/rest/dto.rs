use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::model::{
    AdminUserPatch, Contact, ContactDetails, ContactPatch, Event, FollowUp, FollowUpPatch,
    FollowUpStatus, MediaAttachment, MediaKind, NewContact, NewEvent, NewFollowUp, NewMedia,
    QrPayload, Tag, User, UserPatch,
};

/// Distinguishes an absent field from an explicit `null`: absent leaves the
/// stored value, `null` clears it.
fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}

// ---------------------------------------------------------------------------
// Auth

#[derive(Debug, Clone, Deserialize)]
pub struct OauthLoginReq {
    pub provider: String,
    pub oauth_id: String,
    pub email: String,
    pub name: String,
    pub profile_photo_url: Option<String>,
}

/// Email login that doubles as signup when the email is unknown.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailLoginReq {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthDto {
    pub token: String,
    pub user: UserDto,
}

// ---------------------------------------------------------------------------
// Users and profile

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDto {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role_company: Option<String>,
    pub mobile: Option<String>,
    pub whatsapp: Option<String>,
    pub linkedin_url: Option<String>,
    pub about_me: Option<String>,
    pub profile_photo_url: Option<String>,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role_company: user.role_company,
            mobile: user.mobile,
            whatsapp: user.whatsapp,
            linkedin_url: user.linkedin_url,
            about_me: user.about_me,
            profile_photo_url: user.profile_photo_url,
            is_admin: user.is_admin,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Unauthenticated view of a shared profile; internal flags and timestamps
/// stay out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicProfileDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role_company: Option<String>,
    pub mobile: Option<String>,
    pub whatsapp: Option<String>,
    pub linkedin_url: Option<String>,
    pub about_me: Option<String>,
    pub profile_photo_url: Option<String>,
}

impl From<User> for PublicProfileDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role_company: user.role_company,
            mobile: user.mobile,
            whatsapp: user.whatsapp,
            linkedin_url: user.linkedin_url,
            about_me: user.about_me,
            profile_photo_url: user.profile_photo_url,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct UpdateProfileReq {
    pub name: Option<String>,
    pub role_company: Option<String>,
    pub mobile: Option<String>,
    pub whatsapp: Option<String>,
    pub linkedin_url: Option<String>,
    pub about_me: Option<String>,
    pub profile_photo_url: Option<String>,
}

impl From<UpdateProfileReq> for UserPatch {
    fn from(req: UpdateProfileReq) -> Self {
        Self {
            name: req.name,
            role_company: req.role_company,
            mobile: req.mobile,
            whatsapp: req.whatsapp,
            linkedin_url: req.linkedin_url,
            about_me: req.about_me,
            profile_photo_url: req.profile_photo_url,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminCreateUserReq {
    pub email: String,
    pub name: String,
    pub password: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AdminUpdateUserReq {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
    pub is_admin: Option<bool>,
}

impl From<AdminUpdateUserReq> for AdminUserPatch {
    fn from(req: AdminUpdateUserReq) -> Self {
        Self {
            email: req.email,
            name: req.name,
            password: req.password,
            is_admin: req.is_admin,
        }
    }
}

// ---------------------------------------------------------------------------
// QR sharing

#[derive(Debug, Clone, Deserialize, Default)]
pub struct QrQuery {
    /// "url" (default) or "vcard".
    pub mode: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QrDto {
    pub mode: String,
    /// SVG image as a data URL.
    pub qr_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vcard: Option<String>,
}

impl From<QrPayload> for QrDto {
    fn from(payload: QrPayload) -> Self {
        Self {
            mode: payload.mode.as_str().to_string(),
            qr_code: payload.qr_code,
            profile_url: payload.profile_url,
            vcard: payload.vcard,
        }
    }
}

// ---------------------------------------------------------------------------
// Events

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDto {
    pub id: Uuid,
    pub name: String,
    pub location: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Event> for EventDto {
    fn from(event: Event) -> Self {
        Self {
            id: event.id,
            name: event.name,
            location: event.location,
            start_date: event.start_date,
            end_date: event.end_date,
            description: event.description,
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }
}

/// Create and full-replace payload for an event.
#[derive(Debug, Clone, Deserialize)]
pub struct EventReq {
    pub name: String,
    pub location: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub description: Option<String>,
}

impl From<EventReq> for NewEvent {
    fn from(req: EventReq) -> Self {
        Self {
            name: req.name,
            location: req.location,
            start_date: req.start_date,
            end_date: req.end_date,
            description: req.description,
        }
    }
}

// ---------------------------------------------------------------------------
// Contacts

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactDto {
    pub id: Uuid,
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

impl From<Contact> for ContactDto {
    fn from(contact: Contact) -> Self {
        Self {
            id: contact.id,
            event_id: contact.event_id,
            name: contact.name,
            email: contact.email,
            role_company: contact.role_company,
            mobile: contact.mobile,
            linkedin_url: contact.linkedin_url,
            contact_photo_url: contact.contact_photo_url,
            meeting_context: contact.meeting_context,
            meeting_latitude: contact.meeting_latitude,
            meeting_longitude: contact.meeting_longitude,
            meeting_location_name: contact.meeting_location_name,
            meeting_date: contact.meeting_date,
            created_at: contact.created_at,
            updated_at: contact.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactDetailsDto {
    #[serde(flatten)]
    pub contact: ContactDto,
    pub event: Option<EventDto>,
    pub tags: Vec<TagDto>,
    pub media: Vec<MediaDto>,
    pub follow_ups: Vec<FollowUpDto>,
}

impl From<ContactDetails> for ContactDetailsDto {
    fn from(details: ContactDetails) -> Self {
        Self {
            contact: details.contact.into(),
            event: details.event.map(Into::into),
            tags: details.tags.into_iter().map(Into::into).collect(),
            media: details.media.into_iter().map(Into::into).collect(),
            follow_ups: details.follow_ups.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateContactReq {
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
    pub event_id: Option<Uuid>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub media: Vec<MediaReq>,
}

impl TryFrom<CreateContactReq> for NewContact {
    type Error = DomainError;

    fn try_from(req: CreateContactReq) -> Result<Self, Self::Error> {
        let media = req
            .media
            .into_iter()
            .map(NewMedia::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            name: req.name,
            email: req.email,
            role_company: req.role_company,
            mobile: req.mobile,
            linkedin_url: req.linkedin_url,
            contact_photo_url: req.contact_photo_url,
            meeting_context: req.meeting_context,
            meeting_latitude: req.meeting_latitude,
            meeting_longitude: req.meeting_longitude,
            meeting_location_name: req.meeting_location_name,
            meeting_date: req.meeting_date,
            event_id: req.event_id,
            tags: req.tags,
            media,
        })
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct UpdateContactReq {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role_company: Option<String>,
    pub mobile: Option<String>,
    pub linkedin_url: Option<String>,
    pub contact_photo_url: Option<String>,
    pub meeting_context: Option<String>,
    pub meeting_location_name: Option<String>,
    /// Omit to keep the event link, send `null` to clear it.
    #[serde(default, deserialize_with = "double_option")]
    pub event_id: Option<Option<Uuid>>,
    /// When present, replaces the contact's tag set.
    pub tags: Option<Vec<String>>,
}

impl From<UpdateContactReq> for ContactPatch {
    fn from(req: UpdateContactReq) -> Self {
        Self {
            name: req.name,
            email: req.email,
            role_company: req.role_company,
            mobile: req.mobile,
            linkedin_url: req.linkedin_url,
            contact_photo_url: req.contact_photo_url,
            meeting_context: req.meeting_context,
            meeting_location_name: req.meeting_location_name,
            event_id: req.event_id,
            tags: req.tags,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ContactsQuery {
    pub event_id: Option<Uuid>,
    pub tag: Option<String>,
    pub q: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NoteReq {
    pub note: String,
}

// ---------------------------------------------------------------------------
// Media

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaDto {
    pub id: Uuid,
    pub file_url: String,
    pub file_type: String,
    pub file_name: Option<String>,
    pub file_size: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl From<MediaAttachment> for MediaDto {
    fn from(media: MediaAttachment) -> Self {
        Self {
            id: media.id,
            file_url: media.file_url,
            file_type: media.file_type.as_str().to_string(),
            file_name: media.file_name,
            file_size: media.file_size,
            created_at: media.created_at,
        }
    }
}

/// Media descriptor; the file itself already lives in object storage.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaReq {
    pub file_url: String,
    pub file_type: String,
    pub file_name: Option<String>,
    pub file_size: Option<i64>,
}

impl TryFrom<MediaReq> for NewMedia {
    type Error = DomainError;

    fn try_from(req: MediaReq) -> Result<Self, Self::Error> {
        Ok(Self {
            file_url: req.file_url,
            file_type: MediaKind::parse(&req.file_type)?,
            file_name: req.file_name,
            file_size: req.file_size,
        })
    }
}

// ---------------------------------------------------------------------------
// Tags

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagDto {
    pub id: Uuid,
    pub name: String,
    pub is_system_tag: bool,
    pub is_hidden: bool,
}

impl From<Tag> for TagDto {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
            is_system_tag: tag.is_system_tag,
            is_hidden: tag.is_hidden,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ListTagsQuery {
    #[serde(default)]
    pub include_hidden: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTagReq {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct UpdateTagReq {
    pub name: Option<String>,
    pub is_hidden: Option<bool>,
}

// ---------------------------------------------------------------------------
// Follow-ups

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowUpDto {
    pub id: Uuid,
    pub contact_id: Uuid,
    pub message: String,
    pub follow_up_date: Option<NaiveDate>,
    pub status: String,
    pub sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<FollowUp> for FollowUpDto {
    fn from(follow_up: FollowUp) -> Self {
        Self {
            id: follow_up.id,
            contact_id: follow_up.contact_id,
            message: follow_up.message,
            follow_up_date: follow_up.follow_up_date,
            status: follow_up.status.as_str().to_string(),
            sent_at: follow_up.sent_at,
            created_at: follow_up.created_at,
            updated_at: follow_up.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateFollowUpReq {
    pub contact_id: Uuid,
    pub message: String,
    pub follow_up_date: Option<NaiveDate>,
}

impl From<CreateFollowUpReq> for NewFollowUp {
    fn from(req: CreateFollowUpReq) -> Self {
        Self {
            contact_id: req.contact_id,
            message: req.message,
            follow_up_date: req.follow_up_date,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct UpdateFollowUpReq {
    pub status: Option<String>,
    pub sent_at: Option<DateTime<Utc>>,
}

impl TryFrom<UpdateFollowUpReq> for FollowUpPatch {
    type Error = DomainError;

    fn try_from(req: UpdateFollowUpReq) -> Result<Self, Self::Error> {
        Ok(Self {
            status: req.status.as_deref().map(FollowUpStatus::parse).transpose()?,
            sent_at: req.sent_at,
        })
    }
}

// ---------------------------------------------------------------------------
// Export and health

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ExportContactsReq {
    pub contact_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthDto {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_id_absent_vs_null() {
        let absent: UpdateContactReq = serde_json::from_str(r#"{"name":"A"}"#).unwrap();
        assert_eq!(absent.event_id, None);

        let null: UpdateContactReq = serde_json::from_str(r#"{"event_id":null}"#).unwrap();
        assert_eq!(null.event_id, Some(None));

        let id = Uuid::new_v4();
        let set: UpdateContactReq =
            serde_json::from_str(&format!(r#"{{"event_id":"{id}"}}"#)).unwrap();
        assert_eq!(set.event_id, Some(Some(id)));
    }

    #[test]
    fn media_req_rejects_unknown_type() {
        let req = MediaReq {
            file_url: "https://cdn.example/x".into(),
            file_type: "video".into(),
            file_name: None,
            file_size: None,
        };
        assert!(NewMedia::try_from(req).is_err());
    }

    #[test]
    fn follow_up_patch_parses_status() {
        let req = UpdateFollowUpReq {
            status: Some("sent".into()),
            sent_at: None,
        };
        let patch = FollowUpPatch::try_from(req).unwrap();
        assert_eq!(patch.status, Some(FollowUpStatus::Sent));
    }
}
