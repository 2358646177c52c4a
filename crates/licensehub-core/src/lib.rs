//! # licensehub-core
//!
//! Core crate for LicenseHub. Contains configuration schemas, the license
//! store trait, and the unified error system.
//!
//! This crate has **no** internal dependencies on other LicenseHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
