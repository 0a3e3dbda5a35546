use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::domain::model::{Event, NewEvent};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub location: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub description: Option<String>,
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
    #[sea_orm(has_many = "super::contacts::Entity")]
    Contacts,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::contacts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contacts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Event {
    fn from(m: Model) -> Self {
        Event {
            id: m.id,
            user_id: m.user_id,
            name: m.name,
            location: m.location,
            start_date: m.start_date,
            end_date: m.end_date,
            description: m.description,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Event fetch scoped to its owner; other users' events read as absent.
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

/// Newest-first listing of the owner's events.
pub async fn list_owned<C: ConnectionTrait>(db: &C, owner: Uuid) -> Result<Vec<Model>, DbErr> {
    Entity::find()
        .filter(Column::UserId.eq(owner))
        .order_by_desc(Column::StartDate)
        .all(db)
        .await
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    owner: Uuid,
    new_event: NewEvent,
) -> Result<Model, DbErr> {
    let now = Utc::now();
    let active_model = ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(owner),
        name: Set(new_event.name),
        location: Set(new_event.location),
        start_date: Set(new_event.start_date),
        end_date: Set(new_event.end_date),
        description: Set(new_event.description),
        created_at: Set(now),
        updated_at: Set(now),
    };
    active_model.insert(db).await
}

/// Full replace of the event payload.
pub async fn update<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    new_event: NewEvent,
) -> Result<Model, DbErr> {
    let active_model = ActiveModel {
        id: Set(id),
        name: Set(new_event.name),
        location: Set(new_event.location),
        start_date: Set(new_event.start_date),
        end_date: Set(new_event.end_date),
        description: Set(new_event.description),
        updated_at: Set(Utc::now()),
        ..Default::default()
    };
    active_model.update(db).await
}

pub async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<bool, DbErr> {
    let result = Entity::delete_by_id(id).exec(db).await?;
    Ok(result.rows_affected > 0)
}
