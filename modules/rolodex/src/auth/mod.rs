//! Token issuance, password hashing and the axum extractors that gate
//! authenticated and admin-only routes.

pub mod extract;
pub mod jwt;
pub mod password;

pub use extract::{CurrentAdmin, CurrentUser};
