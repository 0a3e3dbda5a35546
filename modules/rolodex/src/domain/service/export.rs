use std::collections::HashMap;

use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::infra::storage::{contact_tags, contacts, events};

use super::Service;

const CSV_HEADER: [&str; 9] = [
    "Name",
    "Email",
    "Role/Company",
    "Mobile",
    "LinkedIn",
    "Meeting Date",
    "Meeting Context",
    "Tags",
    "Event",
];

impl Service {
    /// CSV of every contact captured at one of the caller's events.
    /// Returns the event name alongside the body so the handler can build
    /// the download filename.
    pub async fn event_contacts_csv(
        &self,
        owner: Uuid,
        event_id: Uuid,
    ) -> Result<(String, String), DomainError> {
        let event = events::find_owned(&self.db, owner, event_id)
            .await?
            .ok_or(DomainError::not_found("event"))?;

        let rows = contacts::list_owned(
            &self.db,
            owner,
            contacts::ContactFilter {
                event_id: Some(event_id),
                ..Default::default()
            },
        )
        .await?;

        let mut names = HashMap::new();
        names.insert(event.id, event.name.clone());
        let csv = self.render_csv(rows, &names).await?;
        Ok((event.name, csv))
    }

    /// CSV of an explicit selection of the caller's contacts. Ids the
    /// caller does not own are dropped; an empty result is an error so the
    /// client never downloads a header-only file by mistake.
    pub async fn selected_contacts_csv(
        &self,
        owner: Uuid,
        contact_ids: &[Uuid],
    ) -> Result<String, DomainError> {
        if contact_ids.is_empty() {
            return Err(DomainError::validation(
                "contact_ids",
                "no contact ids provided",
            ));
        }

        let rows = contacts::list_owned_by_ids(&self.db, owner, contact_ids).await?;
        if rows.is_empty() {
            return Err(DomainError::not_found("contacts"));
        }

        let event_names: HashMap<Uuid, String> = events::list_owned(&self.db, owner)
            .await?
            .into_iter()
            .map(|e| (e.id, e.name))
            .collect();

        self.render_csv(rows, &event_names).await
    }

    async fn render_csv(
        &self,
        rows: Vec<contacts::Model>,
        event_names: &HashMap<Uuid, String>,
    ) -> Result<String, DomainError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(CSV_HEADER)
            .map_err(|err| DomainError::database(format!("csv write failed: {err}")))?;

        for contact in rows {
            let tag_names: Vec<String> = contact_tags::tags_for_contact(&self.db, contact.id)
                .await?
                .into_iter()
                .map(|t| t.name)
                .collect();
            let event_name = contact
                .event_id
                .and_then(|id| event_names.get(&id).cloned())
                .unwrap_or_default();

            writer
                .write_record([
                    contact.name.as_str(),
                    contact.email.as_deref().unwrap_or(""),
                    contact.role_company.as_deref().unwrap_or(""),
                    contact.mobile.as_deref().unwrap_or(""),
                    contact.linkedin_url.as_deref().unwrap_or(""),
                    contact
                        .meeting_date
                        .format("%Y-%m-%d %H:%M:%S")
                        .to_string()
                        .as_str(),
                    contact.meeting_context.as_deref().unwrap_or(""),
                    tag_names.join(", ").as_str(),
                    event_name.as_str(),
                ])
                .map_err(|err| DomainError::database(format!("csv write failed: {err}")))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|err| DomainError::database(format!("csv write failed: {err}")))?;
        String::from_utf8(bytes).map_err(|err| DomainError::database(format!("csv encoding: {err}")))
    }
}
