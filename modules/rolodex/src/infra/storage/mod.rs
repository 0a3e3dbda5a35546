//! sea-orm entities and owner-scoped query functions. Everything that knows
//! SQL lives here; services deal in `domain::model` types.

pub mod contact_tags;
pub mod contacts;
pub mod events;
pub mod follow_ups;
pub mod media_attachments;
pub mod migrations;
pub mod tags;
pub mod users;

use sea_orm::{DbErr, SqlErr};

/// True when the error is a unique-constraint violation, the backstop for
/// the tag find-or-create race.
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
