//! Redis license store implementation.

use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::{debug, error};

use licensehub_core::error::{AppError, ErrorKind};
use licensehub_core::result::AppResult;
use licensehub_core::traits::license_store::LicenseStore;

use super::client::RedisClient;

/// Lua script for atomic compare-and-swap.
///
/// KEYS[1] = license key
/// ARGV[1] = expected current value
/// ARGV[2] = replacement value
///
/// Returns:
///   1 = swapped
///   0 = value changed or key absent
const COMPARE_AND_SWAP_SCRIPT: &str = r#"
    local current = redis.call('GET', KEYS[1])
    if current == ARGV[1] then
        redis.call('SET', KEYS[1], ARGV[2])
        return 1
    end
    return 0
"#;

/// Redis-backed license store for multi-node deployments.
#[derive(Debug, Clone)]
pub struct RedisLicenseStore {
    /// Redis client.
    client: RedisClient,
}

impl RedisLicenseStore {
    /// Create a new Redis license store.
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    /// Map a Redis error to an AppError.
    fn map_err(e: redis::RedisError) -> AppError {
        AppError::with_source(ErrorKind::Store, format!("Redis error: {e}"), e)
    }
}

#[async_trait]
impl LicenseStore for RedisLicenseStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let result: Option<String> = conn.get(&full_key).await.map_err(Self::map_err)?;
        Ok(result)
    }

    async fn put(&self, key: &str, value: &str) -> AppResult<()> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let _: () = conn.set(&full_key, value).await.map_err(Self::map_err)?;
        Ok(())
    }

    async fn put_if_absent(&self, key: &str, value: &str) -> AppResult<bool> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let stored: bool = conn.set_nx(&full_key, value).await.map_err(Self::map_err)?;
        Ok(stored)
    }

    async fn compare_and_swap(&self, key: &str, expected: &str, value: &str) -> AppResult<bool> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();

        let result: i64 = redis::Script::new(COMPARE_AND_SWAP_SCRIPT)
            .key(&full_key)
            .arg(expected)
            .arg(value)
            .invoke_async(&mut conn)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Store, "Redis compare-and-swap script failed", e)
            })?;

        match result {
            1 => Ok(true),
            0 => {
                debug!(key = %full_key, "Compare-and-swap rejected, value changed");
                Ok(false)
            }
            other => {
                error!(result = other, "Unexpected Lua script result");
                Err(AppError::store(format!(
                    "Unexpected compare-and-swap result: {other}"
                )))
            }
        }
    }

    async fn health_check(&self) -> AppResult<bool> {
        let mut conn = self.client.conn_mut();
        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;
        Ok(pong == "PONG")
    }
}
