//! Data transfer objects for the HTTP API.

pub mod request;
pub mod response;

pub use request::LicenseRequest;
pub use response::{
    ActivateResponse, DeactivateResponse, HealthResponse, OperationDenied, VerifyDenied,
    VerifyResponse,
};
