//! # licensehub-service
//!
//! Business logic for LicenseHub. The [`LicenseStateMachine`] holds every
//! licensing decision as a pure function of a record, a machine identifier
//! and the current time. The [`LicenseService`] wraps it in a
//! read-decide-write cycle against the license store.
//!
//! Services follow constructor injection; all dependencies are provided
//! at construction time.

pub mod license;

pub use license::{
    Admission, Decision, Grant, LicenseRepository, LicenseService, LicenseStateMachine, Rejection,
    Release,
};
