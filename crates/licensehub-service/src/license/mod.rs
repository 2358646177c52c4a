//! License verification, activation and deactivation.

pub mod machine;
pub mod outcome;
pub mod repository;
pub mod service;

pub use machine::{Decision, LicenseStateMachine};
pub use outcome::{Admission, Grant, Rejection, Release};
pub use repository::{LicenseRepository, StoredLicense};
pub use service::LicenseService;
