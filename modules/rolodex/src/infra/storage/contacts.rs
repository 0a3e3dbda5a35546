use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::domain::model::{Contact, NewContact};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "contacts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Option<Uuid>,
    pub name: String,
    pub email: Option<String>,
    pub role_company: Option<String>,
    pub mobile: Option<String>,
    pub linkedin_url: Option<String>,
    pub contact_photo_url: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub meeting_context: Option<String>,
    pub meeting_latitude: Option<f64>,
    pub meeting_longitude: Option<f64>,
    pub meeting_location_name: Option<String>,
    pub meeting_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::events::Entity",
        from = "Column::EventId",
        to = "super::events::Column::Id",
        on_delete = "SetNull"
    )]
    Event,
    #[sea_orm(has_many = "super::contact_tags::Entity")]
    ContactTags,
    #[sea_orm(has_many = "super::media_attachments::Entity")]
    MediaAttachments,
    #[sea_orm(has_many = "super::follow_ups::Entity")]
    FollowUps,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::events::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Event.def()
    }
}

impl Related<super::contact_tags::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ContactTags.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Contact {
    fn from(m: Model) -> Self {
        Contact {
            id: m.id,
            user_id: m.user_id,
            event_id: m.event_id,
            name: m.name,
            email: m.email,
            role_company: m.role_company,
            mobile: m.mobile,
            linkedin_url: m.linkedin_url,
            contact_photo_url: m.contact_photo_url,
            meeting_context: m.meeting_context,
            meeting_latitude: m.meeting_latitude,
            meeting_longitude: m.meeting_longitude,
            meeting_location_name: m.meeting_location_name,
            meeting_date: m.meeting_date,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Optional listing filters, combined with AND.
#[derive(Debug, Default)]
pub struct ContactFilter {
    pub event_id: Option<Uuid>,
    pub tag_id: Option<Uuid>,
    /// Case-insensitive substring over name, email, company and context.
    pub query: Option<String>,
}

/// Field-level update; outer `None` keeps the stored value.
#[derive(Debug, Default)]
pub struct UpdateContact {
    pub name: Option<String>,
    pub email: Option<Option<String>>,
    pub role_company: Option<Option<String>>,
    pub mobile: Option<Option<String>>,
    pub linkedin_url: Option<Option<String>>,
    pub contact_photo_url: Option<Option<String>>,
    pub meeting_context: Option<Option<String>>,
    pub meeting_location_name: Option<Option<String>>,
    pub event_id: Option<Option<Uuid>>,
}

pub async fn find_owned<C: ConnectionTrait>(
    db: &C,
    owner: Uuid,
    id: Uuid,
) -> Result<Option<Model>, DbErr> {
    Entity::find_by_id(id)
        .filter(Column::UserId.eq(owner))
        .one(db)
        .await
}

/// Newest-meeting-first listing with optional filters.
pub async fn list_owned<C: ConnectionTrait>(
    db: &C,
    owner: Uuid,
    filter: ContactFilter,
) -> Result<Vec<Model>, DbErr> {
    let mut select = Entity::find().filter(Column::UserId.eq(owner));

    if let Some(event_id) = filter.event_id {
        select = select.filter(Column::EventId.eq(event_id));
    }
    if let Some(tag_id) = filter.tag_id {
        select = select
            .inner_join(super::contact_tags::Entity)
            .filter(super::contact_tags::Column::TagId.eq(tag_id));
    }
    if let Some(query) = filter.query.filter(|q| !q.is_empty()) {
        select = select.filter(
            Condition::any()
                .add(Column::Name.contains(&query))
                .add(Column::Email.contains(&query))
                .add(Column::RoleCompany.contains(&query))
                .add(Column::MeetingContext.contains(&query)),
        );
    }

    select.order_by_desc(Column::MeetingDate).all(db).await
}

/// The owner's rows among the requested ids, newest meeting first. Ids
/// belonging to other users are simply not returned.
pub async fn list_owned_by_ids<C: ConnectionTrait>(
    db: &C,
    owner: Uuid,
    ids: &[Uuid],
) -> Result<Vec<Model>, DbErr> {
    Entity::find()
        .filter(Column::UserId.eq(owner))
        .filter(Column::Id.is_in(ids.iter().copied()))
        .order_by_desc(Column::MeetingDate)
        .all(db)
        .await
}

/// Insert the base contact row. Tags and media are attached separately in
/// the same transaction.
pub async fn create<C: ConnectionTrait>(
    db: &C,
    owner: Uuid,
    new_contact: &NewContact,
    event_id: Option<Uuid>,
) -> Result<Model, DbErr> {
    let now = Utc::now();
    let active_model = ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(owner),
        event_id: Set(event_id),
        name: Set(new_contact.name.clone()),
        email: Set(new_contact.email.clone()),
        role_company: Set(new_contact.role_company.clone()),
        mobile: Set(new_contact.mobile.clone()),
        linkedin_url: Set(new_contact.linkedin_url.clone()),
        contact_photo_url: Set(new_contact.contact_photo_url.clone()),
        meeting_context: Set(new_contact.meeting_context.clone()),
        meeting_latitude: Set(new_contact.meeting_latitude),
        meeting_longitude: Set(new_contact.meeting_longitude),
        meeting_location_name: Set(new_contact.meeting_location_name.clone()),
        meeting_date: Set(new_contact.meeting_date.unwrap_or(now)),
        created_at: Set(now),
        updated_at: Set(now),
    };
    active_model.insert(db).await
}

pub async fn update<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    changes: UpdateContact,
) -> Result<Model, DbErr> {
    let mut active_model = ActiveModel {
        id: Set(id),
        updated_at: Set(Utc::now()),
        ..Default::default()
    };

    if let Some(name) = changes.name {
        active_model.name = Set(name);
    }
    if let Some(email) = changes.email {
        active_model.email = Set(email);
    }
    if let Some(role_company) = changes.role_company {
        active_model.role_company = Set(role_company);
    }
    if let Some(mobile) = changes.mobile {
        active_model.mobile = Set(mobile);
    }
    if let Some(linkedin_url) = changes.linkedin_url {
        active_model.linkedin_url = Set(linkedin_url);
    }
    if let Some(contact_photo_url) = changes.contact_photo_url {
        active_model.contact_photo_url = Set(contact_photo_url);
    }
    if let Some(meeting_context) = changes.meeting_context {
        active_model.meeting_context = Set(meeting_context);
    }
    if let Some(meeting_location_name) = changes.meeting_location_name {
        active_model.meeting_location_name = Set(meeting_location_name);
    }
    if let Some(event_id) = changes.event_id {
        active_model.event_id = Set(event_id);
    }

    active_model.update(db).await
}

/// Append a line to the meeting context, starting it when empty.
pub async fn append_context<C: ConnectionTrait>(
    db: &C,
    current: &Model,
    note: &str,
) -> Result<Model, DbErr> {
    let merged = match current.meeting_context.as_deref() {
        Some(existing) if !existing.is_empty() => format!("{existing}\n{note}"),
        _ => note.to_string(),
    };
    let active_model = ActiveModel {
        id: Set(current.id),
        meeting_context: Set(Some(merged)),
        updated_at: Set(Utc::now()),
        ..Default::default()
    };
    active_model.update(db).await
}

pub async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<bool, DbErr> {
    let result = Entity::delete_by_id(id).exec(db).await?;
    Ok(result.rows_affected > 0)
}
