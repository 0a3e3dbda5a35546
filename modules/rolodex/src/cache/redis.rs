use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use super::Cache;

/// How long we wait for Redis before treating the operation as a miss,
/// unless the configuration says otherwise.
pub const DEFAULT_OP_TIMEOUT: Duration = Duration::from_secs(2);

/// Resolve the per-operation timeout from the configured milliseconds.
/// Zero is treated as unset; a cache that can never answer is just the
/// miss path with extra steps.
pub fn op_timeout_from_millis(ms: Option<u64>) -> Duration {
    match ms {
        Some(ms) if ms > 0 => Duration::from_millis(ms),
        _ => DEFAULT_OP_TIMEOUT,
    }
}

/// Redis-backed cache. The connection manager reconnects on its own; every
/// command is bounded by the operation timeout so a stalled server cannot
/// drag request latency with it.
pub struct RedisCache {
    conn: ConnectionManager,
    op_timeout: Duration,
}

impl RedisCache {
    pub async fn connect(url: &str, op_timeout: Duration) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self { conn, op_timeout })
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn get(&self, key: &str) -> Option<String> {
        let mut conn = self.conn.clone();
        match tokio::time::timeout(self.op_timeout, conn.get::<_, Option<String>>(key)).await {
            Ok(Ok(value)) => value,
            Ok(Err(err)) => {
                tracing::warn!(key, error = %err, "redis get failed");
                None
            }
            Err(_) => {
                tracing::warn!(key, "redis get timed out");
                None
            }
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) {
        let mut conn = self.conn.clone();
        let secs = ttl.as_secs().max(1);
        match tokio::time::timeout(self.op_timeout, conn.set_ex::<_, _, ()>(key, value, secs)).await
        {
            Ok(Ok(())) => {}
            Ok(Err(err)) => tracing::warn!(key, error = %err, "redis set failed"),
            Err(_) => tracing::warn!(key, "redis set timed out"),
        }
    }

    async fn delete(&self, key: &str) {
        let mut conn = self.conn.clone();
        match tokio::time::timeout(self.op_timeout, conn.del::<_, ()>(key)).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => tracing::warn!(key, error = %err, "redis del failed"),
            Err(_) => tracing::warn!(key, "redis del timed out"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn op_timeout_falls_back_to_the_default() {
        assert_eq!(op_timeout_from_millis(None), DEFAULT_OP_TIMEOUT);
        assert_eq!(op_timeout_from_millis(Some(0)), DEFAULT_OP_TIMEOUT);
        assert_eq!(op_timeout_from_millis(Some(250)), Duration::from_millis(250));
    }
}
