use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::model::{Event, NewEvent};
use crate::infra::storage::events;

use super::Service;

fn validate(event: &NewEvent) -> Result<(), DomainError> {
    if event.name.trim().is_empty() {
        return Err(DomainError::validation("name", "event name is required"));
    }
    if event.location.trim().is_empty() {
        return Err(DomainError::validation("location", "location is required"));
    }
    if event.end_date < event.start_date {
        return Err(DomainError::validation(
            "end_date",
            "end date cannot be before start date",
        ));
    }
    Ok(())
}

impl Service {
    pub async fn list_events(&self, owner: Uuid) -> Result<Vec<Event>, DomainError> {
        let models = events::list_owned(&self.db, owner).await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    /// Events are tenant-private: someone else's event id reads as absent.
    pub async fn get_event(&self, owner: Uuid, id: Uuid) -> Result<Event, DomainError> {
        let event = events::find_owned(&self.db, owner, id)
            .await?
            .ok_or(DomainError::not_found("event"))?;
        Ok(event.into())
    }

    pub async fn create_event(&self, owner: Uuid, new_event: NewEvent) -> Result<Event, DomainError> {
        validate(&new_event)?;
        let created = events::create(&self.db, owner, new_event).await?;
        Ok(created.into())
    }

    pub async fn update_event(
        &self,
        owner: Uuid,
        id: Uuid,
        new_event: NewEvent,
    ) -> Result<Event, DomainError> {
        validate(&new_event)?;
        events::find_owned(&self.db, owner, id)
            .await?
            .ok_or(DomainError::not_found("event"))?;
        let updated = events::update(&self.db, id, new_event).await?;
        Ok(updated.into())
    }

    /// Deleting an event keeps its contacts; their event link is cleared by
    /// the ON DELETE SET NULL foreign key.
    pub async fn delete_event(&self, owner: Uuid, id: Uuid) -> Result<(), DomainError> {
        events::find_owned(&self.db, owner, id)
            .await?
            .ok_or(DomainError::not_found("event"))?;
        events::delete(&self.db, id).await?;
        Ok(())
    }
}
