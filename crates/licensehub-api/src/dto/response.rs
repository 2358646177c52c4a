//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use licensehub_entity::license::{DenialReason, LicenseTier};
use licensehub_service::{Grant, Rejection};

/// Successful `/verify` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyResponse {
    /// Always `true`.
    pub valid: bool,
    /// License tier.
    pub tier: LicenseTier,
    /// Expiry, `null` for licenses that never expire.
    pub expires: Option<DateTime<Utc>>,
    /// Unlocked features.
    pub features: Vec<String>,
}

impl From<Grant> for VerifyResponse {
    fn from(grant: Grant) -> Self {
        Self {
            valid: true,
            tier: grant.tier,
            expires: grant.expires,
            features: grant.features,
        }
    }
}

/// Successful `/activate` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivateResponse {
    /// Always `true`.
    pub success: bool,
    /// License tier.
    pub tier: LicenseTier,
    /// Expiry, `null` for licenses that never expire.
    pub expires: Option<DateTime<Utc>>,
    /// Unlocked features.
    pub features: Vec<String>,
    /// Machines registered against the license.
    pub machines_used: u32,
    /// Machine limit.
    pub machines_max: u32,
}

impl From<Grant> for ActivateResponse {
    fn from(grant: Grant) -> Self {
        Self {
            success: true,
            tier: grant.tier,
            expires: grant.expires,
            features: grant.features,
            machines_used: grant.machines_used,
            machines_max: grant.machines_max,
        }
    }
}

/// Successful `/deactivate` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeactivateResponse {
    /// Always `true`.
    pub success: bool,
    /// Machines still registered.
    pub machines_used: u32,
}

/// Failed `/verify` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyDenied {
    /// Always `false`.
    pub valid: bool,
    /// Stable reason code.
    pub reason: DenialReason,
    /// Machine limit, only for `device_limit`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_devices: Option<u32>,
}

impl VerifyDenied {
    /// Denial with no extra detail.
    pub fn new(reason: DenialReason) -> Self {
        Self {
            valid: false,
            reason,
            max_devices: None,
        }
    }
}

impl From<Rejection> for VerifyDenied {
    fn from(rejection: Rejection) -> Self {
        Self {
            max_devices: rejection.max_devices(),
            ..Self::new(rejection.reason())
        }
    }
}

/// Failed `/activate` or `/deactivate` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationDenied {
    /// Always `false`.
    pub success: bool,
    /// Stable reason code.
    pub reason: DenialReason,
    /// Machine limit, only for `device_limit`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_devices: Option<u32>,
}

impl OperationDenied {
    /// Denial with no extra detail.
    pub fn new(reason: DenialReason) -> Self {
        Self {
            success: false,
            reason,
            max_devices: None,
        }
    }
}

impl From<Rejection> for OperationDenied {
    fn from(rejection: Rejection) -> Self {
        Self {
            max_devices: rejection.max_devices(),
            ..Self::new(rejection.reason())
        }
    }
}

/// `/health` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `"ok"` or `"degraded"`.
    pub status: String,
    /// Time of the probe.
    pub timestamp: DateTime<Utc>,
    /// `"connected"` or `"unavailable"`.
    pub store: String,
    /// Server version.
    pub version: String,
}
