//! Store manager that dispatches to the configured backend.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use licensehub_core::config::StoreConfig;
use licensehub_core::error::AppError;
use licensehub_core::result::AppResult;
use licensehub_core::traits::license_store::LicenseStore;

/// Store manager that wraps the configured license store backend.
///
/// The backend is selected at construction time based on configuration.
#[derive(Debug, Clone)]
pub struct StoreManager {
    /// The inner store backend.
    inner: Arc<dyn LicenseStore>,
}

impl StoreManager {
    /// Create a new store manager from configuration.
    pub async fn new(config: &StoreConfig) -> AppResult<Self> {
        let inner: Arc<dyn LicenseStore> = match config.provider.as_str() {
            #[cfg(feature = "redis-backend")]
            "redis" => {
                info!("Initializing Redis license store");
                let client = crate::redis::RedisClient::connect(&config.redis).await?;
                Arc::new(crate::redis::RedisLicenseStore::new(client))
            }
            #[cfg(feature = "memory")]
            "memory" => {
                info!("Initializing in-memory license store");
                Arc::new(crate::memory::MemoryLicenseStore::new())
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown store provider: '{other}'. Supported: memory, redis"
                )));
            }
        };

        Ok(Self { inner })
    }

    /// Create a store manager from an existing backend (for testing).
    pub fn from_store(store: Arc<dyn LicenseStore>) -> Self {
        Self { inner: store }
    }
}

#[async_trait]
impl LicenseStore for StoreManager {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, value: &str) -> AppResult<()> {
        self.inner.put(key, value).await
    }

    async fn put_if_absent(&self, key: &str, value: &str) -> AppResult<bool> {
        self.inner.put_if_absent(key, value).await
    }

    async fn compare_and_swap(&self, key: &str, expected: &str, value: &str) -> AppResult<bool> {
        self.inner.compare_and_swap(key, expected, value).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }
}
