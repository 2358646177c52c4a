//! Typed access to license records in the store.

use std::sync::Arc;

use licensehub_core::result::AppResult;
use licensehub_core::traits::license_store::LicenseStore;
use licensehub_entity::license::codec;
use licensehub_entity::license::{LicenseKey, LicenseRecord};

/// A decoded record together with the exact value it was read from.
///
/// The raw value is the compare-and-swap token for the next write.
#[derive(Debug, Clone)]
pub struct StoredLicense {
    /// The decoded record.
    pub record: LicenseRecord,
    raw: String,
}

/// License repository over a [`LicenseStore`] backend.
#[derive(Debug, Clone)]
pub struct LicenseRepository {
    store: Arc<dyn LicenseStore>,
}

impl LicenseRepository {
    /// Creates a new repository.
    pub fn new(store: Arc<dyn LicenseStore>) -> Self {
        Self { store }
    }

    /// Load the record for `key`, if one exists.
    pub async fn load(&self, key: &LicenseKey) -> AppResult<Option<StoredLicense>> {
        let Some(raw) = self.store.get(key.as_str()).await? else {
            return Ok(None);
        };
        let record = codec::decode_value(&raw)?;
        Ok(Some(StoredLicense { record, raw }))
    }

    /// Replace the record read as `previous` with `record`.
    ///
    /// Returns `false` if another writer changed the record in between.
    pub async fn replace(
        &self,
        key: &LicenseKey,
        previous: &StoredLicense,
        record: &LicenseRecord,
    ) -> AppResult<bool> {
        let encoded = codec::encode(record)?;
        self.store
            .compare_and_swap(key.as_str(), &previous.raw, &encoded)
            .await
    }

    /// Create a record. Returns `false` if the key already exists.
    pub async fn create(&self, key: &LicenseKey, record: &LicenseRecord) -> AppResult<bool> {
        let encoded = codec::encode(record)?;
        self.store.put_if_absent(key.as_str(), &encoded).await
    }

    /// Write a record unconditionally.
    pub async fn overwrite(&self, key: &LicenseKey, record: &LicenseRecord) -> AppResult<()> {
        let encoded = codec::encode(record)?;
        self.store.put(key.as_str(), &encoded).await
    }

    /// Check that the backend is reachable.
    pub async fn health_check(&self) -> AppResult<bool> {
        self.store.health_check().await
    }
}
