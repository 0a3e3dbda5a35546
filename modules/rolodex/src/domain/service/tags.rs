use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::model::{Tag, TagPatch};
use crate::infra::storage::{contact_tags, is_unique_violation, tags};

use super::Service;

impl Service {
    /// Every system tag plus the caller's custom tags. Hidden tags only
    /// appear when asked for.
    pub async fn list_tags(
        &self,
        user_id: Uuid,
        include_hidden: bool,
    ) -> Result<Vec<Tag>, DomainError> {
        let models = tags::list_visible(&self.db, user_id, include_hidden).await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    pub async fn system_tags(&self) -> Result<Vec<Tag>, DomainError> {
        let models = tags::list_system(&self.db).await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    /// Explicit tag creation. Unlike the find-or-create used during contact
    /// capture, a duplicate visible name is an error here, so the client
    /// learns the tag already exists.
    pub async fn create_tag(&self, owner: Uuid, name: &str) -> Result<Tag, DomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("name", "tag name is required"));
        }
        if tags::find_visible_by_name(&self.db, owner, name)
            .await?
            .is_some()
        {
            return Err(DomainError::conflict(format!("tag '{name}' already exists")));
        }

        match tags::create_custom(&self.db, owner, name).await {
            Ok(created) => Ok(created.into()),
            Err(err) if is_unique_violation(&err) => {
                Err(DomainError::conflict(format!("tag '{name}' already exists")))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Rename or hide a custom tag. System tags are immutable through this
    /// API; another tenant's tag reads as absent.
    pub async fn update_tag(
        &self,
        owner: Uuid,
        id: Uuid,
        patch: TagPatch,
    ) -> Result<Tag, DomainError> {
        let existing = tags::find_by_id(&self.db, id)
            .await?
            .ok_or(DomainError::not_found("tag"))?;
        if existing.is_system_tag {
            return Err(DomainError::forbidden("system tags cannot be modified"));
        }
        if existing.user_id != Some(owner) {
            return Err(DomainError::not_found("tag"));
        }

        let name = match patch.name {
            Some(name) => {
                let name = name.trim().to_string();
                if name.is_empty() {
                    return Err(DomainError::validation("name", "tag name cannot be blank"));
                }
                if name != existing.name
                    && tags::find_visible_by_name(&self.db, owner, &name)
                        .await?
                        .is_some()
                {
                    return Err(DomainError::conflict(format!(
                        "tag '{name}' already exists"
                    )));
                }
                Some(name)
            }
            None => None,
        };

        match tags::rename(&self.db, id, name.clone(), patch.is_hidden).await {
            Ok(updated) => Ok(updated.into()),
            Err(err) if is_unique_violation(&err) => Err(DomainError::conflict(format!(
                "tag '{}' already exists",
                name.unwrap_or(existing.name)
            ))),
            Err(err) => Err(err.into()),
        }
    }

    /// Deletes a custom tag once none of the owner's contacts carry it.
    pub async fn delete_tag(&self, owner: Uuid, id: Uuid) -> Result<(), DomainError> {
        let existing = tags::find_by_id(&self.db, id)
            .await?
            .ok_or(DomainError::not_found("tag"))?;
        if existing.is_system_tag {
            return Err(DomainError::forbidden("system tags cannot be deleted"));
        }
        if existing.user_id != Some(owner) {
            return Err(DomainError::not_found("tag"));
        }

        let in_use = contact_tags::usage_by_owner(&self.db, owner, id).await?;
        if in_use > 0 {
            return Err(DomainError::conflict(format!(
                "tag '{}' is attached to {in_use} contact(s)",
                existing.name
            )));
        }

        tags::delete(&self.db, id).await?;
        Ok(())
    }
}
