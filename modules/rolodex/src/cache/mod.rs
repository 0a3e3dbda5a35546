//! Optional read-through cache for hot profile lookups.
//!
//! The cache is strictly an accelerator: every operation degrades to a miss
//! on any backend failure, and callers never see a cache error. Keys are
//! namespaced strings like `profile:user:<id>`.

mod memory;
mod redis;

use std::time::Duration;

use async_trait::async_trait;

pub use memory::MemoryCache;
pub use redis::{op_timeout_from_millis, RedisCache, DEFAULT_OP_TIMEOUT};

/// TTL for a user's own profile payload.
pub const PRIVATE_PROFILE_TTL: Duration = Duration::from_secs(1800);
/// TTL for the public profile payload.
pub const PUBLIC_PROFILE_TTL: Duration = Duration::from_secs(3600);
/// TTL for rendered QR payloads.
pub const QR_TTL: Duration = Duration::from_secs(7200);

#[async_trait]
pub trait Cache: Send + Sync {
    /// Returns the cached value, or `None` on a miss or backend failure.
    async fn get(&self, key: &str) -> Option<String>;

    /// Stores a value with a TTL. Failures are logged, not surfaced.
    async fn set(&self, key: &str, value: &str, ttl: Duration);

    /// Removes a key, if present.
    async fn delete(&self, key: &str);
}

/// Cache backend that stores nothing; used when caching is not configured.
#[derive(Debug, Default)]
pub struct NoopCache;

#[async_trait]
impl Cache for NoopCache {
    async fn get(&self, _key: &str) -> Option<String> {
        None
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) {}

    async fn delete(&self, _key: &str) {}
}

pub fn private_profile_key(user_id: uuid::Uuid) -> String {
    format!("profile:user:{user_id}")
}

pub fn public_profile_key(user_id: uuid::Uuid) -> String {
    format!("profile:public:{user_id}")
}

pub fn qr_key(user_id: uuid::Uuid, mode: &str) -> String {
    format!("qr:{user_id}:{mode}")
}
