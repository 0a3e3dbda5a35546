use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::domain::model::{FollowUp, FollowUpStatus, NewFollowUp};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "follow_ups")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub contact_id: Uuid,
    pub user_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub message: String,
    pub follow_up_date: Option<NaiveDate>,
    pub status: String,
    pub sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::contacts::Entity",
        from = "Column::ContactId",
        to = "super::contacts::Column::Id",
        on_delete = "Cascade"
    )]
    Contact,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::contacts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contact.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for FollowUp {
    fn from(m: Model) -> Self {
        FollowUp {
            id: m.id,
            contact_id: m.contact_id,
            user_id: m.user_id,
            message: m.message,
            follow_up_date: m.follow_up_date,
            status: FollowUpStatus::parse(&m.status).unwrap_or(FollowUpStatus::Pending),
            sent_at: m.sent_at,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
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

/// All follow-ups of the owner, soonest due date first, undated last.
pub async fn list_owned<C: ConnectionTrait>(db: &C, owner: Uuid) -> Result<Vec<Model>, DbErr> {
    Entity::find()
        .filter(Column::UserId.eq(owner))
        .order_by_asc(Column::FollowUpDate)
        .order_by_asc(Column::CreatedAt)
        .all(db)
        .await
}

pub async fn list_for_contact<C: ConnectionTrait>(
    db: &C,
    contact_id: Uuid,
) -> Result<Vec<Model>, DbErr> {
    Entity::find()
        .filter(Column::ContactId.eq(contact_id))
        .order_by_asc(Column::CreatedAt)
        .all(db)
        .await
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    owner: Uuid,
    new_follow_up: NewFollowUp,
) -> Result<Model, DbErr> {
    let now = Utc::now();
    let active_model = ActiveModel {
        id: Set(Uuid::new_v4()),
        contact_id: Set(new_follow_up.contact_id),
        user_id: Set(owner),
        message: Set(new_follow_up.message),
        follow_up_date: Set(new_follow_up.follow_up_date),
        status: Set(FollowUpStatus::Pending.as_str().to_string()),
        sent_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };
    active_model.insert(db).await
}

pub async fn update_status<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    status: FollowUpStatus,
    sent_at: Option<DateTime<Utc>>,
) -> Result<Model, DbErr> {
    let mut active_model = ActiveModel {
        id: Set(id),
        status: Set(status.as_str().to_string()),
        updated_at: Set(Utc::now()),
        ..Default::default()
    };
    if sent_at.is_some() {
        active_model.sent_at = Set(sent_at);
    }
    active_model.update(db).await
}

pub async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<bool, DbErr> {
    let result = Entity::delete_by_id(id).exec(db).await?;
    Ok(result.rows_affected > 0)
}
