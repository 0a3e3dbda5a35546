use tracing::info;
use uuid::Uuid;

use crate::auth::{jwt, password};
use crate::domain::error::DomainError;
use crate::domain::model::{NewUser, User};
use crate::infra::storage::users;

use super::Service;

const MIN_PASSWORD_LEN: usize = 6;

impl Service {
    /// Login for an identity already verified by an OAuth provider. Accounts
    /// are keyed by email: a returning user gets their provider link
    /// refreshed, a new email gets a passwordless account.
    pub async fn oauth_login(
        &self,
        provider: &str,
        oauth_id: &str,
        email: &str,
        name: &str,
        profile_photo_url: Option<String>,
    ) -> Result<(User, String), DomainError> {
        let email = email.trim().to_lowercase();
        if email.is_empty() {
            return Err(DomainError::validation("email", "email is required"));
        }

        let user = match users::find_by_email(&self.db, &email).await? {
            Some(existing) => {
                let changes = users::UpdateUser {
                    oauth_provider: Some(Some(provider.to_string())),
                    oauth_id: Some(Some(oauth_id.to_string())),
                    profile_photo_url: existing
                        .profile_photo_url
                        .is_none()
                        .then(|| profile_photo_url.clone()),
                    ..Default::default()
                };
                users::update(&self.db, existing.id, changes).await?
            }
            None => {
                info!(%email, provider, "creating account from oauth login");
                users::create(
                    &self.db,
                    NewUser {
                        email: email.clone(),
                        name: name.trim().to_string(),
                        password_hash: None,
                        profile_photo_url,
                        oauth_provider: Some(provider.to_string()),
                        oauth_id: Some(oauth_id.to_string()),
                        is_admin: false,
                    },
                )
                .await?
            }
        };

        let token = self.issue_token(user.id)?;
        Ok((user.into(), token))
    }

    /// Email + password login that doubles as signup: an unknown email with
    /// a name creates the account. An OAuth-only account cannot log in this
    /// way until it sets a password.
    pub async fn email_login(
        &self,
        email: &str,
        pass: &str,
        name: Option<String>,
    ) -> Result<(User, String), DomainError> {
        let email = email.trim().to_lowercase();
        if email.is_empty() {
            return Err(DomainError::validation("email", "email is required"));
        }

        let user = match users::find_by_email(&self.db, &email).await? {
            Some(existing) => {
                let Some(stored_hash) = existing.password_hash.as_deref() else {
                    return Err(DomainError::validation(
                        "password",
                        "this account uses social login; sign in with your provider",
                    ));
                };
                if !password::verify(pass, stored_hash) {
                    return Err(DomainError::Unauthorized);
                }
                existing
            }
            None => {
                let name = name
                    .map(|n| n.trim().to_string())
                    .filter(|n| !n.is_empty())
                    .ok_or_else(|| {
                        DomainError::validation("name", "name is required to create an account")
                    })?;
                if pass.len() < MIN_PASSWORD_LEN {
                    return Err(DomainError::validation(
                        "password",
                        format!("password must be at least {MIN_PASSWORD_LEN} characters"),
                    ));
                }
                info!(%email, "creating account from email signup");
                users::create(
                    &self.db,
                    NewUser {
                        email: email.clone(),
                        name,
                        password_hash: Some(password::hash(pass)?),
                        ..Default::default()
                    },
                )
                .await?
            }
        };

        let token = self.issue_token(user.id)?;
        Ok((user.into(), token))
    }

    /// Resolves a bearer token to a live user. Tokens of deleted users fail
    /// here even before expiry.
    pub async fn authenticate(&self, token: &str) -> Result<User, DomainError> {
        let user_id = jwt::verify(&self.config.jwt_secret, token)?;
        let user = users::find_by_id(&self.db, user_id)
            .await?
            .ok_or(DomainError::Unauthorized)?;
        Ok(user.into())
    }

    pub fn issue_token(&self, user_id: Uuid) -> Result<String, DomainError> {
        jwt::issue(
            &self.config.jwt_secret,
            user_id,
            self.config.token_ttl_days,
        )
    }
}
