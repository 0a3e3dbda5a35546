use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

/// Join table between contacts and tags.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "contact_tags")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub contact_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub tag_id: Uuid,
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
        belongs_to = "super::tags::Entity",
        from = "Column::TagId",
        to = "super::tags::Column::Id",
        on_delete = "Cascade"
    )]
    Tag,
}

impl Related<super::contacts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contact.def()
    }
}

impl Related<super::tags::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tag.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Attach a tag, ignoring an already-present link.
pub async fn attach<C: ConnectionTrait>(
    db: &C,
    contact_id: Uuid,
    tag_id: Uuid,
) -> Result<(), DbErr> {
    let exists = Entity::find_by_id((contact_id, tag_id)).one(db).await?;
    if exists.is_none() {
        let active_model = ActiveModel {
            contact_id: Set(contact_id),
            tag_id: Set(tag_id),
        };
        active_model.insert(db).await?;
    }
    Ok(())
}

/// Drop every tag link for a contact; used before a replace.
pub async fn detach_all<C: ConnectionTrait>(db: &C, contact_id: Uuid) -> Result<(), DbErr> {
    Entity::delete_many()
        .filter(Column::ContactId.eq(contact_id))
        .exec(db)
        .await?;
    Ok(())
}

/// The contact's tags, alphabetical.
pub async fn tags_for_contact<C: ConnectionTrait>(
    db: &C,
    contact_id: Uuid,
) -> Result<Vec<super::tags::Model>, DbErr> {
    super::tags::Entity::find()
        .inner_join(Entity)
        .filter(Column::ContactId.eq(contact_id))
        .order_by_asc(super::tags::Column::Name)
        .all(db)
        .await
}

/// How many of one user's contacts carry the tag. Other tenants' usage of a
/// shared system tag does not count.
pub async fn usage_by_owner<C: ConnectionTrait>(
    db: &C,
    owner: Uuid,
    tag_id: Uuid,
) -> Result<u64, DbErr> {
    Entity::find()
        .filter(Column::TagId.eq(tag_id))
        .inner_join(super::contacts::Entity)
        .filter(super::contacts::Column::UserId.eq(owner))
        .count(db)
        .await
}
