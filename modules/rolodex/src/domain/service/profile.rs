use base64::Engine;
use qrcode::render::svg;
use qrcode::QrCode;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::model::{QrMode, QrPayload, User, UserPatch};
use crate::domain::vcard;
use crate::infra::storage::users;

use super::{none_if_blank, Service};

impl Service {
    pub async fn get_user(&self, id: Uuid) -> Result<User, DomainError> {
        let user = users::find_by_id(&self.db, id)
            .await?
            .ok_or(DomainError::not_found("user"))?;
        Ok(user.into())
    }

    /// Partial profile update. Optional fields clear on a blank string; the
    /// display name must stay non-empty.
    pub async fn update_profile(&self, user_id: Uuid, patch: UserPatch) -> Result<User, DomainError> {
        let name = match patch.name {
            Some(name) => Some(none_if_blank(name).ok_or_else(|| {
                DomainError::validation("name", "name cannot be blank")
            })?),
            None => None,
        };

        let changes = users::UpdateUser {
            name,
            role_company: patch.role_company.map(none_if_blank),
            mobile: patch.mobile.map(none_if_blank),
            whatsapp: patch.whatsapp.map(none_if_blank),
            linkedin_url: patch.linkedin_url.map(none_if_blank),
            about_me: patch.about_me.map(none_if_blank),
            profile_photo_url: patch.profile_photo_url.map(none_if_blank),
            ..Default::default()
        };

        let updated = users::update(&self.db, user_id, changes)
            .await
            .map_err(|err| match err {
                sea_orm::DbErr::RecordNotUpdated => DomainError::not_found("user"),
                other => other.into(),
            })?;
        Ok(updated.into())
    }

    /// Builds the QR sharing payload for a profile: either a link to the
    /// public profile page or a self-contained vCard.
    pub async fn profile_qr(&self, user_id: Uuid, mode: QrMode) -> Result<QrPayload, DomainError> {
        let user = self.get_user(user_id).await?;
        let profile_url = format!(
            "{}/profile/{}",
            self.config.public_url.trim_end_matches('/'),
            user.id
        );

        let content = match mode {
            QrMode::Url => profile_url.clone(),
            QrMode::Vcard => vcard::from_user(&user, &self.config.public_url),
        };

        let code = QrCode::new(content.as_bytes())
            .map_err(|err| DomainError::validation("mode", format!("QR payload too large: {err}")))?;
        let image = code
            .render::<svg::Color>()
            .min_dimensions(256, 256)
            .build();
        let qr_code = format!(
            "data:image/svg+xml;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(image)
        );

        Ok(match mode {
            QrMode::Url => QrPayload {
                mode,
                qr_code,
                profile_url: Some(profile_url),
                vcard: None,
            },
            QrMode::Vcard => QrPayload {
                mode,
                qr_code,
                profile_url: None,
                vcard: Some(content),
            },
        })
    }
}
