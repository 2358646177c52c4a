//! License provisioning commands.

use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use licensehub_core::error::AppError;
use licensehub_entity::license::{LicenseKey, LicenseRecord, LicenseTier};
use licensehub_service::LicenseService;

use crate::output::{self, OutputFormat};

/// Arguments for `seed`
#[derive(Debug, Args)]
pub struct SeedArgs {
    /// License key (CS-PRO-XXXX-XXXX-XXXX-XXXX)
    #[arg(short, long)]
    pub key: String,
    /// Owner email
    #[arg(short, long)]
    pub email: String,
    /// License tier: pro or lifetime
    #[arg(short, long, default_value = "pro")]
    pub tier: String,
    /// Expiry as RFC 3339 (pro only)
    #[arg(long)]
    pub expires: Option<String>,
    /// Overwrite an existing record
    #[arg(long)]
    pub force: bool,
}

/// Arguments for `show`
#[derive(Debug, Args)]
pub struct ShowArgs {
    /// License key
    #[arg(short, long)]
    pub key: String,
}

/// Arguments for `revoke`
#[derive(Debug, Args)]
pub struct RevokeArgs {
    /// License key
    #[arg(short, long)]
    pub key: String,
    /// Skip confirmation
    #[arg(long)]
    pub force: bool,
}

/// One license, flattened for display.
#[derive(Debug, Serialize, Tabled)]
pub struct LicenseView {
    /// Canonical key.
    #[tabled(rename = "Key")]
    pub key: String,
    /// Tier.
    #[tabled(rename = "Tier")]
    pub tier: String,
    /// Expiry or "never".
    #[tabled(rename = "Expires")]
    pub expires: String,
    /// Registered machines, comma separated.
    #[tabled(rename = "Machines")]
    pub machines: String,
    /// Revocation flag.
    #[tabled(rename = "Revoked")]
    pub revoked: bool,
    /// Owner.
    #[tabled(rename = "Email")]
    pub email: String,
    /// Provisioning time.
    #[tabled(rename = "Created")]
    pub created_at: String,
}

impl LicenseView {
    fn new(key: &LicenseKey, record: &LicenseRecord) -> Self {
        Self {
            key: key.to_string(),
            tier: record.tier.to_string(),
            expires: record
                .expires
                .map(|e| e.to_rfc3339())
                .unwrap_or_else(|| "never".to_string()),
            machines: record.machines.join(", "),
            revoked: record.revoked,
            email: record.email.clone(),
            created_at: record.created_at.to_rfc3339(),
        }
    }
}

/// Create a license record with no machines.
pub async fn seed(
    args: &SeedArgs,
    service: &LicenseService,
    format: OutputFormat,
) -> Result<(), AppError> {
    let key = LicenseKey::parse(&args.key)?;
    let tier: LicenseTier = args.tier.parse()?;
    let expires = args.expires.as_deref().map(parse_expiry).transpose()?;

    let record = LicenseRecord::provision(tier, expires, args.email.trim(), Utc::now())?;

    if !service.provision(&key, &record, args.force).await? {
        return Err(AppError::conflict(format!(
            "License {key} already exists; pass --force to overwrite"
        )));
    }

    output::print_success(&format!("Seeded license {key}"));
    output::print_item(&LicenseView::new(&key, &record), format);
    Ok(())
}

/// Print a license record.
pub async fn show(
    args: &ShowArgs,
    service: &LicenseService,
    format: OutputFormat,
) -> Result<(), AppError> {
    let key = LicenseKey::parse(&args.key)?;
    let record = service
        .find(&key)
        .await?
        .ok_or_else(|| AppError::not_found(format!("License {key} not found")))?;

    output::print_item(&LicenseView::new(&key, &record), format);
    if format == OutputFormat::Table {
        output::print_kv(
            "Machines used",
            &format!(
                "{}/{}",
                record.machines_used(),
                service.state_machine().max_machines()
            ),
        );
    }
    Ok(())
}

/// Mark a license revoked after confirmation.
pub async fn revoke(
    args: &RevokeArgs,
    service: &LicenseService,
    format: OutputFormat,
) -> Result<(), AppError> {
    let key = LicenseKey::parse(&args.key)?;
    let current = service
        .find(&key)
        .await?
        .ok_or_else(|| AppError::not_found(format!("License {key} not found")))?;

    if current.revoked {
        output::print_warning(&format!("License {key} is already revoked"));
        return Ok(());
    }

    if !args.force {
        let confirm = dialoguer::Confirm::new()
            .with_prompt(format!(
                "Revoke {key} ({})? Every machine on it stops working.",
                current.email
            ))
            .default(false)
            .interact()
            .map_err(|e| AppError::internal(format!("Input error: {e}")))?;

        if !confirm {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let record = service
        .revoke(&key)
        .await?
        .ok_or_else(|| AppError::not_found(format!("License {key} not found")))?;

    output::print_success(&format!("Revoked license {key}"));
    output::print_item(&LicenseView::new(&key, &record), format);
    Ok(())
}

fn parse_expiry(raw: &str) -> Result<DateTime<Utc>, AppError> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::validation(format!("Invalid --expires '{raw}': {e}")))
}
