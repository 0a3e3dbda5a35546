//! Rolodex domain module: contacts, events, tags, follow-ups and the
//! supporting auth / cache / storage layers.

pub mod api;
pub mod auth;
pub mod cache;
pub mod domain;
pub mod infra;
