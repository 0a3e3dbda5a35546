use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::domain::model::{NewUser, User};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub name: String,
    pub password_hash: Option<String>,
    pub role_company: Option<String>,
    pub mobile: Option<String>,
    pub whatsapp: Option<String>,
    pub linkedin_url: Option<String>,
    pub about_me: Option<String>,
    pub profile_photo_url: Option<String>,
    pub oauth_provider: Option<String>,
    pub oauth_id: Option<String>,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::events::Entity")]
    Events,
    #[sea_orm(has_many = "super::contacts::Entity")]
    Contacts,
}

impl Related<super::events::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Events.def()
    }
}

impl Related<super::contacts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contacts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for User {
    fn from(m: Model) -> Self {
        User {
            id: m.id,
            email: m.email,
            name: m.name,
            password_hash: m.password_hash,
            role_company: m.role_company,
            mobile: m.mobile,
            whatsapp: m.whatsapp,
            linkedin_url: m.linkedin_url,
            about_me: m.about_me,
            profile_photo_url: m.profile_photo_url,
            oauth_provider: m.oauth_provider,
            oauth_id: m.oauth_id,
            is_admin: m.is_admin,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Field-level update; outer `None` keeps the stored value, inner options
/// write NULL.
#[derive(Debug, Default)]
pub struct UpdateUser {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password_hash: Option<Option<String>>,
    pub role_company: Option<Option<String>>,
    pub mobile: Option<Option<String>>,
    pub whatsapp: Option<Option<String>>,
    pub linkedin_url: Option<Option<String>>,
    pub about_me: Option<Option<String>>,
    pub profile_photo_url: Option<Option<String>>,
    pub oauth_provider: Option<Option<String>>,
    pub oauth_id: Option<Option<String>>,
    pub is_admin: Option<bool>,
}

pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<Model>, DbErr> {
    Entity::find_by_id(id).one(db).await
}

pub async fn find_by_email<C: ConnectionTrait>(
    db: &C,
    email: &str,
) -> Result<Option<Model>, DbErr> {
    Entity::find()
        .filter(Column::Email.eq(email))
        .one(db)
        .await
}

pub async fn list_all<C: ConnectionTrait>(db: &C) -> Result<Vec<Model>, DbErr> {
    Entity::find().order_by_asc(Column::CreatedAt).all(db).await
}

/// Insert a new user; id and timestamps are assigned here.
pub async fn create<C: ConnectionTrait>(db: &C, new_user: NewUser) -> Result<Model, DbErr> {
    let now = Utc::now();
    let active_model = ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(new_user.email),
        name: Set(new_user.name),
        password_hash: Set(new_user.password_hash),
        role_company: Set(None),
        mobile: Set(None),
        whatsapp: Set(None),
        linkedin_url: Set(None),
        about_me: Set(None),
        profile_photo_url: Set(new_user.profile_photo_url),
        oauth_provider: Set(new_user.oauth_provider),
        oauth_id: Set(new_user.oauth_id),
        is_admin: Set(new_user.is_admin),
        created_at: Set(now),
        updated_at: Set(now),
    };
    active_model.insert(db).await
}

pub async fn update<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    changes: UpdateUser,
) -> Result<Model, DbErr> {
    let mut active_model = ActiveModel {
        id: Set(id),
        updated_at: Set(Utc::now()),
        ..Default::default()
    };

    if let Some(email) = changes.email {
        active_model.email = Set(email);
    }
    if let Some(name) = changes.name {
        active_model.name = Set(name);
    }
    if let Some(password_hash) = changes.password_hash {
        active_model.password_hash = Set(password_hash);
    }
    if let Some(role_company) = changes.role_company {
        active_model.role_company = Set(role_company);
    }
    if let Some(mobile) = changes.mobile {
        active_model.mobile = Set(mobile);
    }
    if let Some(whatsapp) = changes.whatsapp {
        active_model.whatsapp = Set(whatsapp);
    }
    if let Some(linkedin_url) = changes.linkedin_url {
        active_model.linkedin_url = Set(linkedin_url);
    }
    if let Some(about_me) = changes.about_me {
        active_model.about_me = Set(about_me);
    }
    if let Some(profile_photo_url) = changes.profile_photo_url {
        active_model.profile_photo_url = Set(profile_photo_url);
    }
    if let Some(oauth_provider) = changes.oauth_provider {
        active_model.oauth_provider = Set(oauth_provider);
    }
    if let Some(oauth_id) = changes.oauth_id {
        active_model.oauth_id = Set(oauth_id);
    }
    if let Some(is_admin) = changes.is_admin {
        active_model.is_admin = Set(is_admin);
    }

    active_model.update(db).await
}

/// Delete a user; related events, contacts and custom tags go with it via
/// the foreign keys.
pub async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<bool, DbErr> {
    let result = Entity::delete_by_id(id).exec(db).await?;
    Ok(result.rows_affected > 0)
}
