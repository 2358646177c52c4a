//! CLI command definitions and dispatch.

pub mod license;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use licensehub_core::config::AppConfig;
use licensehub_core::error::AppError;
use licensehub_service::LicenseService;
use licensehub_store::StoreManager;

use crate::output::{self, OutputFormat};

/// LicenseHub license provisioning
#[derive(Debug, Parser)]
#[command(name = "licensehub", version, about, long_about = None)]
pub struct Cli {
    /// Path to a configuration file. Without it, `config/default.toml`, the
    /// `LICENSEHUB_ENV` overlay and `LICENSEHUB__*` variables are merged.
    #[arg(short, long)]
    pub config: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a license record
    Seed(license::SeedArgs),
    /// Print a license record
    Show(license::ShowArgs),
    /// Revoke a license
    Revoke(license::RevokeArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = load_config(self.config.as_deref())?;
        let service = build_service(&config).await?;

        match &self.command {
            Commands::Seed(args) => license::seed(args, &service, self.format).await,
            Commands::Show(args) => license::show(args, &service, self.format).await,
            Commands::Revoke(args) => license::revoke(args, &service, self.format).await,
        }
    }
}

/// Helper: load configuration from an explicit file or the layered sources
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig, AppError> {
    match config_path {
        Some(path) => AppConfig::load_file(path),
        None => {
            let env = std::env::var("LICENSEHUB_ENV").unwrap_or_else(|_| "development".into());
            AppConfig::load(&env)
        }
    }
}

/// Helper: connect to the configured store and build the license service
pub async fn build_service(config: &AppConfig) -> Result<LicenseService, AppError> {
    if config.store.provider == "memory" {
        output::print_warning(
            "Store provider is 'memory'; changes are discarded when this command exits",
        );
    }

    let store = StoreManager::new(&config.store).await?;
    Ok(LicenseService::new(Arc::new(store), &config.license))
}
