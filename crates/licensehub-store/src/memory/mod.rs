//! In-memory license store.

pub mod store;

pub use store::MemoryLicenseStore;
