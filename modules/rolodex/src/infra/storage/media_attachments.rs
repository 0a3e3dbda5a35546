use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::domain::model::{MediaAttachment, MediaKind, NewMedia};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "media_attachments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub contact_id: Uuid,
    pub file_url: String,
    pub file_type: String,
    pub file_name: Option<String>,
    pub file_size: Option<i64>,
    pub created_at: DateTime<Utc>,
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
}

impl Related<super::contacts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contact.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for MediaAttachment {
    fn from(m: Model) -> Self {
        MediaAttachment {
            id: m.id,
            contact_id: m.contact_id,
            file_url: m.file_url,
            // Rows are only written through MediaKind, so an unknown stored
            // value can't occur outside manual edits; treat it as a document.
            file_type: MediaKind::parse(&m.file_type).unwrap_or(MediaKind::Document),
            file_name: m.file_name,
            file_size: m.file_size,
            created_at: m.created_at,
        }
    }
}

pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<Model>, DbErr> {
    Entity::find_by_id(id).one(db).await
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    contact_id: Uuid,
    media: &NewMedia,
) -> Result<Model, DbErr> {
    let active_model = ActiveModel {
        id: Set(Uuid::new_v4()),
        contact_id: Set(contact_id),
        file_url: Set(media.file_url.clone()),
        file_type: Set(media.file_type.as_str().to_string()),
        file_name: Set(media.file_name.clone()),
        file_size: Set(media.file_size),
        created_at: Set(Utc::now()),
    };
    active_model.insert(db).await
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

pub async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<bool, DbErr> {
    let result = Entity::delete_by_id(id).exec(db).await?;
    Ok(result.rows_affected > 0)
}
