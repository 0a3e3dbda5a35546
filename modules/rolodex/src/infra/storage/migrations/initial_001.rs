use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(ColumnDef::new(Users::PasswordHash).string())
                    .col(ColumnDef::new(Users::RoleCompany).string())
                    .col(ColumnDef::new(Users::Mobile).string())
                    .col(ColumnDef::new(Users::Whatsapp).string())
                    .col(ColumnDef::new(Users::LinkedinUrl).string())
                    .col(ColumnDef::new(Users::AboutMe).text())
                    .col(ColumnDef::new(Users::ProfilePhotoUrl).string())
                    .col(ColumnDef::new(Users::OauthProvider).string())
                    .col(ColumnDef::new(Users::OauthId).string())
                    .col(
                        ColumnDef::new(Users::IsAdmin)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Events::Table)
                    .col(ColumnDef::new(Events::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Events::UserId).uuid().not_null())
                    .col(ColumnDef::new(Events::Name).string().not_null())
                    .col(ColumnDef::new(Events::Location).string().not_null())
                    .col(ColumnDef::new(Events::StartDate).date().not_null())
                    .col(ColumnDef::new(Events::EndDate).date().not_null())
                    .col(ColumnDef::new(Events::Description).text())
                    .col(
                        ColumnDef::new(Events::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Events::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_events_user")
                            .from(Events::Table, Events::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Contacts::Table)
                    .col(ColumnDef::new(Contacts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Contacts::UserId).uuid().not_null())
                    .col(ColumnDef::new(Contacts::EventId).uuid())
                    .col(ColumnDef::new(Contacts::Name).string().not_null())
                    .col(ColumnDef::new(Contacts::Email).string())
                    .col(ColumnDef::new(Contacts::RoleCompany).string())
                    .col(ColumnDef::new(Contacts::Mobile).string())
                    .col(ColumnDef::new(Contacts::LinkedinUrl).string())
                    .col(ColumnDef::new(Contacts::ContactPhotoUrl).string())
                    .col(ColumnDef::new(Contacts::MeetingContext).text())
                    .col(ColumnDef::new(Contacts::MeetingLatitude).double())
                    .col(ColumnDef::new(Contacts::MeetingLongitude).double())
                    .col(ColumnDef::new(Contacts::MeetingLocationName).string())
                    .col(
                        ColumnDef::new(Contacts::MeetingDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Contacts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Contacts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contacts_user")
                            .from(Contacts::Table, Contacts::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contacts_event")
                            .from(Contacts::Table, Contacts::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Tags::Table)
                    .col(ColumnDef::new(Tags::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Tags::Name).string().not_null())
                    .col(ColumnDef::new(Tags::UserId).uuid())
                    .col(
                        ColumnDef::new(Tags::IsSystemTag)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Tags::IsHidden)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Tags::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tags_user")
                            .from(Tags::Table, Tags::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One custom tag name per owner. The COALESCE-over-text expression
        // keeps the statement valid on both sqlite and postgres; system tags
        // stay out of the index and rely on seed discipline for uniqueness.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX ux_tags_custom_name_owner \
                 ON tags (name, COALESCE(CAST(user_id AS TEXT), '')) \
                 WHERE is_system_tag = FALSE",
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ContactTags::Table)
                    .col(ColumnDef::new(ContactTags::ContactId).uuid().not_null())
                    .col(ColumnDef::new(ContactTags::TagId).uuid().not_null())
                    .primary_key(
                        Index::create()
                            .col(ContactTags::ContactId)
                            .col(ContactTags::TagId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contact_tags_contact")
                            .from(ContactTags::Table, ContactTags::ContactId)
                            .to(Contacts::Table, Contacts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contact_tags_tag")
                            .from(ContactTags::Table, ContactTags::TagId)
                            .to(Tags::Table, Tags::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MediaAttachments::Table)
                    .col(
                        ColumnDef::new(MediaAttachments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MediaAttachments::ContactId).uuid().not_null())
                    .col(ColumnDef::new(MediaAttachments::FileUrl).string().not_null())
                    .col(
                        ColumnDef::new(MediaAttachments::FileType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MediaAttachments::FileName).string())
                    .col(ColumnDef::new(MediaAttachments::FileSize).big_integer())
                    .col(
                        ColumnDef::new(MediaAttachments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_media_contact")
                            .from(MediaAttachments::Table, MediaAttachments::ContactId)
                            .to(Contacts::Table, Contacts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FollowUps::Table)
                    .col(
                        ColumnDef::new(FollowUps::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FollowUps::ContactId).uuid().not_null())
                    .col(ColumnDef::new(FollowUps::UserId).uuid().not_null())
                    .col(ColumnDef::new(FollowUps::Message).text().not_null())
                    .col(ColumnDef::new(FollowUps::FollowUpDate).date())
                    .col(
                        ColumnDef::new(FollowUps::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(FollowUps::SentAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(FollowUps::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FollowUps::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_follow_ups_contact")
                            .from(FollowUps::Table, FollowUps::ContactId)
                            .to(Contacts::Table, Contacts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_follow_ups_user")
                            .from(FollowUps::Table, FollowUps::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_events_user")
                    .table(Events::Table)
                    .col(Events::UserId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("ix_contacts_user")
                    .table(Contacts::Table)
                    .col(Contacts::UserId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("ix_contacts_event")
                    .table(Contacts::Table)
                    .col(Contacts::EventId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("ix_contact_tags_tag")
                    .table(ContactTags::Table)
                    .col(ContactTags::TagId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("ix_media_contact")
                    .table(MediaAttachments::Table)
                    .col(MediaAttachments::ContactId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("ix_follow_ups_user")
                    .table(FollowUps::Table)
                    .col(FollowUps::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FollowUps::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MediaAttachments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ContactTags::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tags::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Contacts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Events::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Email,
    Name,
    PasswordHash,
    RoleCompany,
    Mobile,
    Whatsapp,
    LinkedinUrl,
    AboutMe,
    ProfilePhotoUrl,
    OauthProvider,
    OauthId,
    IsAdmin,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Events {
    Table,
    Id,
    UserId,
    Name,
    Location,
    StartDate,
    EndDate,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Contacts {
    Table,
    Id,
    UserId,
    EventId,
    Name,
    Email,
    RoleCompany,
    Mobile,
    LinkedinUrl,
    ContactPhotoUrl,
    MeetingContext,
    MeetingLatitude,
    MeetingLongitude,
    MeetingLocationName,
    MeetingDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Tags {
    Table,
    Id,
    Name,
    UserId,
    IsSystemTag,
    IsHidden,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ContactTags {
    Table,
    ContactId,
    TagId,
}

#[derive(DeriveIden)]
enum MediaAttachments {
    Table,
    Id,
    ContactId,
    FileUrl,
    FileType,
    FileName,
    FileSize,
    CreatedAt,
}

#[derive(DeriveIden)]
enum FollowUps {
    Table,
    Id,
    ContactId,
    UserId,
    Message,
    FollowUpDate,
    Status,
    SentAt,
    CreatedAt,
    UpdatedAt,
}
