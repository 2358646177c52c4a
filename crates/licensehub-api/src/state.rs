//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use licensehub_core::config::AppConfig;
use licensehub_service::LicenseService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// License verification, activation and deactivation
    pub license_service: Arc<LicenseService>,
}

impl AppState {
    /// Creates the application state.
    pub fn new(config: Arc<AppConfig>, license_service: Arc<LicenseService>) -> Self {
        Self {
            config,
            license_service,
        }
    }
}
