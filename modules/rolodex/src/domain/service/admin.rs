use tracing::info;
use uuid::Uuid;

use crate::auth::password;
use crate::domain::error::DomainError;
use crate::domain::model::{AdminUserPatch, NewUser, User};
use crate::infra::storage::users;

use super::Service;

impl Service {
    pub async fn list_users(&self) -> Result<Vec<User>, DomainError> {
        let models = users::list_all(&self.db).await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    pub async fn admin_create_user(
        &self,
        email: &str,
        name: &str,
        pass: Option<&str>,
        is_admin: bool,
    ) -> Result<User, DomainError> {
        let email = email.trim().to_lowercase();
        if email.is_empty() {
            return Err(DomainError::validation("email", "email is required"));
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("name", "name is required"));
        }
        if users::find_by_email(&self.db, &email).await?.is_some() {
            return Err(DomainError::conflict(format!(
                "a user with email '{email}' already exists"
            )));
        }

        let password_hash = pass.map(password::hash).transpose()?;
        info!(%email, is_admin, "admin creating user");
        let created = users::create(
            &self.db,
            NewUser {
                email,
                name: name.to_string(),
                password_hash,
                is_admin,
                ..Default::default()
            },
        )
        .await?;
        Ok(created.into())
    }

    pub async fn admin_update_user(
        &self,
        id: Uuid,
        patch: AdminUserPatch,
    ) -> Result<User, DomainError> {
        let existing = users::find_by_id(&self.db, id)
            .await?
            .ok_or(DomainError::not_found("user"))?;

        let email = match patch.email {
            Some(email) => {
                let email = email.trim().to_lowercase();
                if email.is_empty() {
                    return Err(DomainError::validation("email", "email cannot be blank"));
                }
                if email != existing.email
                    && users::find_by_email(&self.db, &email).await?.is_some()
                {
                    return Err(DomainError::conflict(format!(
                        "a user with email '{email}' already exists"
                    )));
                }
                Some(email)
            }
            None => None,
        };

        let password_hash = patch
            .password
            .map(|raw| password::hash(&raw).map(Some))
            .transpose()?;

        let changes = users::UpdateUser {
            email,
            name: patch.name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
            password_hash,
            is_admin: patch.is_admin,
            ..Default::default()
        };
        let updated = users::update(&self.db, id, changes).await?;
        Ok(updated.into())
    }

    /// Impersonation: issue a token for another account. The returned user
    /// is the target, not the acting admin.
    pub async fn admin_login_as(&self, target: Uuid) -> Result<(User, String), DomainError> {
        let user = users::find_by_id(&self.db, target)
            .await?
            .ok_or(DomainError::not_found("user"))?;
        let token = self.issue_token(user.id)?;
        info!(target = %user.email, "admin impersonating user");
        Ok((user.into(), token))
    }

    /// Removes the user and, through the schema's foreign keys, all of
    /// their events, contacts, custom tags, media and follow-ups.
    pub async fn admin_delete_user(&self, id: Uuid) -> Result<(), DomainError> {
        if !users::delete(&self.db, id).await? {
            return Err(DomainError::not_found("user"));
        }
        info!(%id, "admin deleted user");
        Ok(())
    }
}
