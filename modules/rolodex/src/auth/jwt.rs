use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::error::DomainError;

/// Bearer token claims: subject is the user id, expiry is checked by the
/// library during decode.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub exp: i64,
}

/// Signs an HS256 token valid for `ttl_days` from now.
pub fn issue(secret: &str, user_id: Uuid, ttl_days: i64) -> Result<String, DomainError> {
    let claims = Claims {
        sub: user_id,
        exp: (Utc::now() + Duration::days(ttl_days)).timestamp(),
    };
    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|err| DomainError::database(format!("token signing failed: {err}")))
}

/// Verifies signature and expiry, returning the subject. Any decode failure
/// reads as an unauthenticated request.
pub fn verify(secret: &str, token: &str) -> Result<Uuid, DomainError> {
    let data = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| DomainError::Unauthorized)?;
    Ok(data.claims.sub)
}
