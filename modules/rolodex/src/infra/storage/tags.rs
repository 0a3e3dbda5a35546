use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::domain::model::{Tag, TagKey};

use super::is_unique_violation;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tags")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub user_id: Option<Uuid>,
    pub is_system_tag: bool,
    pub is_hidden: bool,
    pub created_at: DateTime<Utc>,
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
    #[sea_orm(has_many = "super::contact_tags::Entity")]
    ContactTags,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::contact_tags::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ContactTags.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Tag {
    fn from(m: Model) -> Self {
        Tag {
            id: m.id,
            name: m.name,
            user_id: m.user_id,
            is_system_tag: m.is_system_tag,
            is_hidden: m.is_hidden,
            created_at: m.created_at,
        }
    }
}

pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<Model>, DbErr> {
    Entity::find_by_id(id).one(db).await
}

/// Tags the user can see: every system tag plus their own custom tags,
/// system tags first, then alphabetical. Hidden tags are skipped unless
/// `include_hidden` is set (management views want them).
pub async fn list_visible<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
    include_hidden: bool,
) -> Result<Vec<Model>, DbErr> {
    let mut select = Entity::find().filter(
        Condition::any()
            .add(Column::IsSystemTag.eq(true))
            .add(Column::UserId.eq(user_id)),
    );
    if !include_hidden {
        select = select.filter(Column::IsHidden.eq(false));
    }
    select
        .order_by_desc(Column::IsSystemTag)
        .order_by_asc(Column::Name)
        .all(db)
        .await
}

pub async fn list_system<C: ConnectionTrait>(db: &C) -> Result<Vec<Model>, DbErr> {
    Entity::find()
        .filter(Column::IsSystemTag.eq(true))
        .filter(Column::IsHidden.eq(false))
        .order_by_asc(Column::Name)
        .all(db)
        .await
}

/// Exact lookup by composite key: the system bucket or one owner's bucket,
/// never both at once.
pub async fn find_by_key<C: ConnectionTrait>(
    db: &C,
    key: &TagKey,
) -> Result<Option<Model>, DbErr> {
    let select = Entity::find().filter(Column::Name.eq(key.name()));
    let select = match key.owner() {
        None => select.filter(Column::IsSystemTag.eq(true)),
        Some(owner) => select
            .filter(Column::IsSystemTag.eq(false))
            .filter(Column::UserId.eq(owner)),
    };
    select.one(db).await
}

/// Resolve a visible tag by exact name: system tag wins, then the user's
/// own custom tag.
pub async fn find_visible_by_name<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
    name: &str,
) -> Result<Option<Model>, DbErr> {
    if let Some(system) = find_by_key(db, &TagKey::System(name.to_string())).await? {
        return Ok(Some(system));
    }
    find_by_key(db, &TagKey::Owned(user_id, name.to_string())).await
}

async fn insert_custom<C: ConnectionTrait>(
    db: &C,
    owner: Uuid,
    name: &str,
) -> Result<Model, DbErr> {
    let active_model = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        user_id: Set(Some(owner)),
        is_system_tag: Set(false),
        is_hidden: Set(false),
        created_at: Set(Utc::now()),
    };
    active_model.insert(db).await
}

/// Resolve a tag name for a user, creating a custom tag when nothing
/// matches.
pub async fn find_or_create<C: ConnectionTrait>(
    db: &C,
    owner: Uuid,
    name: &str,
) -> Result<Model, DbErr> {
    if let Some(existing) = find_visible_by_name(db, owner, name).await? {
        return Ok(existing);
    }
    create_or_reuse(db, owner, name).await
}

/// Insert arm of find-or-create. When two requests race on the same new
/// name, the loser hits the unique index and re-reads the winner's row by
/// its key; one retry suffices because tags are never deleted mid-flight
/// inside a request.
pub async fn create_or_reuse<C: ConnectionTrait>(
    db: &C,
    owner: Uuid,
    name: &str,
) -> Result<Model, DbErr> {
    match insert_custom(db, owner, name).await {
        Ok(created) => Ok(created),
        Err(err) if is_unique_violation(&err) => {
            find_by_key(db, &TagKey::Owned(owner, name.to_string()))
                .await?
                .ok_or(err)
        }
        Err(err) => Err(err),
    }
}

/// Create a custom tag explicitly, failing on a visible duplicate name.
pub async fn create_custom<C: ConnectionTrait>(
    db: &C,
    owner: Uuid,
    name: &str,
) -> Result<Model, DbErr> {
    insert_custom(db, owner, name).await
}

pub async fn rename<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    name: Option<String>,
    is_hidden: Option<bool>,
) -> Result<Model, DbErr> {
    let mut active_model = ActiveModel {
        id: Set(id),
        ..Default::default()
    };
    if let Some(name) = name {
        active_model.name = Set(name);
    }
    if let Some(is_hidden) = is_hidden {
        active_model.is_hidden = Set(is_hidden);
    }
    active_model.update(db).await
}

pub async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<bool, DbErr> {
    let result = Entity::delete_by_id(id).exec(db).await?;
    Ok(result.rows_affected > 0)
}
