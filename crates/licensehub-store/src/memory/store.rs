//! In-memory license store using the dashmap crate.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

use licensehub_core::result::AppResult;
use licensehub_core::traits::license_store::LicenseStore;

/// In-memory license store.
///
/// Suitable for single-node deployments and tests. Compare-and-swap is
/// atomic because dashmap holds the shard lock for the duration of
/// `get_mut`.
#[derive(Debug, Clone, Default)]
pub struct MemoryLicenseStore {
    /// Canonical key -> serialized record.
    entries: Arc<DashMap<String, String>>,
}

impl MemoryLicenseStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored licenses.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no licenses.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl LicenseStore for MemoryLicenseStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    async fn put(&self, key: &str, value: &str) -> AppResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn put_if_absent(&self, key: &str, value: &str) -> AppResult<bool> {
        match self.entries.entry(key.to_string()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(value.to_string());
                Ok(true)
            }
        }
    }

    async fn compare_and_swap(&self, key: &str, expected: &str, value: &str) -> AppResult<bool> {
        match self.entries.get_mut(key) {
            Some(mut current) if current.value() == expected => {
                *current = value.to_string();
                Ok(true)
            }
            _ => {
                debug!(key, "Compare-and-swap rejected, value changed");
                Ok(false)
            }
        }
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
