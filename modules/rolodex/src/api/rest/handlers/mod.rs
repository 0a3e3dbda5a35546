pub mod admin;
pub mod auth;
pub mod contacts;
pub mod events;
pub mod export;
pub mod follow_ups;
pub mod health;
pub mod profile;
pub mod tags;
