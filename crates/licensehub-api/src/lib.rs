//! # licensehub-api
//!
//! HTTP API layer for LicenseHub built on Axum.
//!
//! Provides the verify, activate and deactivate endpoints, the health
//! probe, middleware (CORS, request logging), DTOs and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use state::AppState;
