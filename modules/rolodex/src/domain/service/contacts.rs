use sea_orm::{ConnectionTrait, TransactionTrait};
use tracing::debug;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::model::{
    Contact, ContactDetails, ContactPatch, MediaAttachment, NewContact, NewMedia,
};
use crate::infra::storage::{contact_tags, contacts, events, follow_ups, media_attachments, tags};

use super::{none_if_blank, Service};

/// Normalized tag names: trimmed, blanks dropped, order-preserving dedupe.
fn clean_tag_names(names: &[String]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for name in names {
        let trimmed = name.trim();
        if !trimmed.is_empty() && !seen.iter().any(|s| s == trimmed) {
            seen.push(trimmed.to_string());
        }
    }
    seen
}

async fn attach_tags<C: ConnectionTrait>(
    db: &C,
    owner: Uuid,
    contact_id: Uuid,
    names: &[String],
) -> Result<(), DomainError> {
    for name in clean_tag_names(names) {
        let tag = tags::find_or_create(db, owner, &name).await?;
        contact_tags::attach(db, contact_id, tag.id).await?;
    }
    Ok(())
}

impl Service {
    pub async fn list_contacts(
        &self,
        owner: Uuid,
        event_id: Option<Uuid>,
        tag: Option<String>,
        query: Option<String>,
    ) -> Result<Vec<Contact>, DomainError> {
        let tag_id = match tag.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()) {
            Some(name) => match tags::find_visible_by_name(&self.db, owner, &name).await? {
                Some(tag) => Some(tag.id),
                // A filter on a tag the user cannot see matches nothing.
                None => return Ok(Vec::new()),
            },
            None => None,
        };

        let models = contacts::list_owned(
            &self.db,
            owner,
            contacts::ContactFilter {
                event_id,
                tag_id,
                query,
            },
        )
        .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    pub async fn get_contact(&self, owner: Uuid, id: Uuid) -> Result<ContactDetails, DomainError> {
        let contact = contacts::find_owned(&self.db, owner, id)
            .await?
            .ok_or(DomainError::not_found("contact"))?;
        self.load_details(owner, contact).await
    }

    /// Creates the contact with its tags and media in one transaction.
    /// An event reference the caller does not own is dropped silently, so a
    /// stale client-side event id never fails the capture.
    pub async fn create_contact(
        &self,
        owner: Uuid,
        new_contact: NewContact,
    ) -> Result<ContactDetails, DomainError> {
        if new_contact.name.trim().is_empty() {
            return Err(DomainError::validation("name", "contact name is required"));
        }

        let txn = self.db.begin().await?;

        let event_id = match new_contact.event_id {
            Some(candidate) => {
                let owned = events::find_owned(&txn, owner, candidate).await?;
                if owned.is_none() {
                    debug!(%candidate, "dropping unowned event reference on contact create");
                }
                owned.map(|e| e.id)
            }
            None => None,
        };

        let created = contacts::create(&txn, owner, &new_contact, event_id).await?;
        attach_tags(&txn, owner, created.id, &new_contact.tags).await?;
        for media in &new_contact.media {
            media_attachments::create(&txn, created.id, media).await?;
        }

        txn.commit().await?;
        self.load_details(owner, created).await
    }

    pub async fn update_contact(
        &self,
        owner: Uuid,
        id: Uuid,
        patch: ContactPatch,
    ) -> Result<ContactDetails, DomainError> {
        let existing = contacts::find_owned(&self.db, owner, id)
            .await?
            .ok_or(DomainError::not_found("contact"))?;

        let name = match patch.name {
            Some(name) => Some(none_if_blank(name).ok_or_else(|| {
                DomainError::validation("name", "contact name cannot be blank")
            })?),
            None => None,
        };

        // Relinking to an event requires owning it; clearing always works.
        let event_id = match patch.event_id {
            Some(Some(candidate)) => {
                events::find_owned(&self.db, owner, candidate)
                    .await?
                    .ok_or(DomainError::not_found("event"))?;
                Some(Some(candidate))
            }
            other => other,
        };

        let txn = self.db.begin().await?;

        let changes = contacts::UpdateContact {
            name,
            email: patch.email.map(none_if_blank),
            role_company: patch.role_company.map(none_if_blank),
            mobile: patch.mobile.map(none_if_blank),
            linkedin_url: patch.linkedin_url.map(none_if_blank),
            contact_photo_url: patch.contact_photo_url.map(none_if_blank),
            meeting_context: patch.meeting_context.map(none_if_blank),
            meeting_location_name: patch.meeting_location_name.map(none_if_blank),
            event_id,
        };
        let updated = contacts::update(&txn, existing.id, changes).await?;

        if let Some(tag_names) = &patch.tags {
            contact_tags::detach_all(&txn, existing.id).await?;
            attach_tags(&txn, owner, existing.id, tag_names).await?;
        }

        txn.commit().await?;
        self.load_details(owner, updated).await
    }

    pub async fn delete_contact(&self, owner: Uuid, id: Uuid) -> Result<(), DomainError> {
        contacts::find_owned(&self.db, owner, id)
            .await?
            .ok_or(DomainError::not_found("contact"))?;
        contacts::delete(&self.db, id).await?;
        Ok(())
    }

    /// Appends a timestamped-by-caller note line to the meeting context.
    pub async fn append_note(
        &self,
        owner: Uuid,
        contact_id: Uuid,
        note: &str,
    ) -> Result<Contact, DomainError> {
        let note = note.trim();
        if note.is_empty() {
            return Err(DomainError::validation("note", "note cannot be empty"));
        }
        let contact = contacts::find_owned(&self.db, owner, contact_id)
            .await?
            .ok_or(DomainError::not_found("contact"))?;
        let updated = contacts::append_context(&self.db, &contact, note).await?;
        Ok(updated.into())
    }

    pub async fn add_media(
        &self,
        owner: Uuid,
        contact_id: Uuid,
        media: NewMedia,
    ) -> Result<MediaAttachment, DomainError> {
        if media.file_url.trim().is_empty() {
            return Err(DomainError::validation("file_url", "file URL is required"));
        }
        contacts::find_owned(&self.db, owner, contact_id)
            .await?
            .ok_or(DomainError::not_found("contact"))?;
        let created = media_attachments::create(&self.db, contact_id, &media).await?;
        Ok(created.into())
    }

    pub async fn delete_media(
        &self,
        owner: Uuid,
        contact_id: Uuid,
        media_id: Uuid,
    ) -> Result<(), DomainError> {
        contacts::find_owned(&self.db, owner, contact_id)
            .await?
            .ok_or(DomainError::not_found("contact"))?;
        let media = media_attachments::find_by_id(&self.db, media_id)
            .await?
            .filter(|m| m.contact_id == contact_id)
            .ok_or(DomainError::not_found("media attachment"))?;
        media_attachments::delete(&self.db, media.id).await?;
        Ok(())
    }

    async fn load_details(
        &self,
        owner: Uuid,
        contact: contacts::Model,
    ) -> Result<ContactDetails, DomainError> {
        let event = match contact.event_id {
            Some(event_id) => events::find_owned(&self.db, owner, event_id)
                .await?
                .map(Into::into),
            None => None,
        };
        let tag_models = contact_tags::tags_for_contact(&self.db, contact.id).await?;
        let media_models = media_attachments::list_for_contact(&self.db, contact.id).await?;
        let follow_up_models = follow_ups::list_for_contact(&self.db, contact.id).await?;

        Ok(ContactDetails {
            contact: contact.into(),
            event,
            tags: tag_models.into_iter().map(Into::into).collect(),
            media: media_models.into_iter().map(Into::into).collect(),
            follow_ups: follow_up_models.into_iter().map(Into::into).collect(),
        })
    }
}
