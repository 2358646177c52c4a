//! License store trait for pluggable key/value backends.

use async_trait::async_trait;

use crate::result::AppResult;

/// Trait for license store backends (Redis or in-memory).
///
/// Values are opaque serialized records keyed by the canonical license
/// key. The store offers no transactions; concurrent read-modify-write
/// cycles are serialized with [`LicenseStore::compare_and_swap`].
#[async_trait]
pub trait LicenseStore: Send + Sync + std::fmt::Debug + 'static {
    /// Get the stored value for a key. Returns `None` if the key is absent.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Store a value unconditionally, replacing any previous value.
    async fn put(&self, key: &str, value: &str) -> AppResult<()>;

    /// Store a value only if the key does not already exist (NX).
    /// Returns `true` if the value was stored.
    async fn put_if_absent(&self, key: &str, value: &str) -> AppResult<bool>;

    /// Replace the value only if the currently stored value equals
    /// `expected`. Returns `false` when the key is absent or was changed
    /// by another writer since `expected` was read.
    async fn compare_and_swap(&self, key: &str, expected: &str, value: &str) -> AppResult<bool>;

    /// Check that the store backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
