//! Core traits defined in `licensehub-core` and implemented by other crates.

pub mod license_store;

pub use license_store::LicenseStore;
