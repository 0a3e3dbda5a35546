use chrono::Utc;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::model::{FollowUp, FollowUpPatch, FollowUpStatus, NewFollowUp};
use crate::infra::storage::{contacts, follow_ups};

use super::Service;

impl Service {
    pub async fn list_follow_ups(&self, owner: Uuid) -> Result<Vec<FollowUp>, DomainError> {
        let models = follow_ups::list_owned(&self.db, owner).await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    /// Follow-ups hanging off one contact, which must be the caller's.
    pub async fn contact_follow_ups(
        &self,
        owner: Uuid,
        contact_id: Uuid,
    ) -> Result<Vec<FollowUp>, DomainError> {
        contacts::find_owned(&self.db, owner, contact_id)
            .await?
            .ok_or(DomainError::not_found("contact"))?;
        let models = follow_ups::list_for_contact(&self.db, contact_id).await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    pub async fn create_follow_up(
        &self,
        owner: Uuid,
        new_follow_up: NewFollowUp,
    ) -> Result<FollowUp, DomainError> {
        if new_follow_up.message.trim().is_empty() {
            return Err(DomainError::validation("message", "message is required"));
        }
        contacts::find_owned(&self.db, owner, new_follow_up.contact_id)
            .await?
            .ok_or(DomainError::not_found("contact"))?;
        let created = follow_ups::create(&self.db, owner, new_follow_up).await?;
        Ok(created.into())
    }

    /// Status transition. Moving to `sent` stamps the send time once; it is
    /// never overwritten by a repeated transition.
    pub async fn update_follow_up(
        &self,
        owner: Uuid,
        id: Uuid,
        patch: FollowUpPatch,
    ) -> Result<FollowUp, DomainError> {
        let existing = follow_ups::find_owned(&self.db, owner, id)
            .await?
            .ok_or(DomainError::not_found("follow-up"))?;

        let Some(status) = patch.status else {
            return Ok(existing.into());
        };

        let sent_at = match (status, existing.sent_at) {
            (FollowUpStatus::Sent, None) => Some(patch.sent_at.unwrap_or_else(Utc::now)),
            _ => None,
        };

        let updated = follow_ups::update_status(&self.db, id, status, sent_at).await?;
        Ok(updated.into())
    }

    pub async fn delete_follow_up(&self, owner: Uuid, id: Uuid) -> Result<(), DomainError> {
        follow_ups::find_owned(&self.db, owner, id)
            .await?
            .ok_or(DomainError::not_found("follow-up"))?;
        follow_ups::delete(&self.db, id).await?;
        Ok(())
    }
}
