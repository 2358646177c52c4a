//! # licensehub-entity
//!
//! Domain models for LicenseHub. The license record is the only persisted
//! entity; everything else in this crate is a value object describing it
//! (tier, key, denial reasons) or the codec that maps it to the store.

pub mod license;
