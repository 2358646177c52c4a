//! Request DTOs.

use serde::{Deserialize, Serialize};

use licensehub_entity::license::{DenialReason, LicenseKey};

/// Body of `/verify`, `/activate` and `/deactivate`.
///
/// Both fields are optional at the serde level so that a missing field is
/// reported with its own reason code instead of a generic parse failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LicenseRequest {
    /// License key as typed by the user.
    #[serde(default)]
    pub key: Option<String>,
    /// Opaque machine identifier.
    #[serde(default)]
    pub machine_id: Option<String>,
}

impl LicenseRequest {
    /// Parse a raw request body.
    pub fn from_body(body: &[u8]) -> Result<Self, DenialReason> {
        serde_json::from_slice(body).map_err(|_| DenialReason::InvalidRequest)
    }

    /// Validate the target of a verify or activate request.
    ///
    /// Checks run in order: key present, machine present, key well formed.
    pub fn into_admission_target(self) -> Result<(LicenseKey, String), DenialReason> {
        let key = present(self.key).ok_or(DenialReason::MissingKey)?;
        let machine_id = present(self.machine_id).ok_or(DenialReason::MissingMachineId)?;
        let key = LicenseKey::parse(&key).map_err(|_| DenialReason::InvalidFormat)?;
        Ok((key, machine_id))
    }

    /// Validate the target of a deactivate request.
    ///
    /// A malformed key cannot name a stored license, so it reports
    /// `not_found` without a store lookup. `invalid_format` is not part of
    /// the deactivate reason set.
    pub fn into_release_target(self) -> Result<(LicenseKey, String), DenialReason> {
        let (Some(key), Some(machine_id)) = (present(self.key), present(self.machine_id)) else {
            return Err(DenialReason::MissingFields);
        };
        let key = LicenseKey::parse(&key).map_err(|_| DenialReason::NotFound)?;
        Ok((key, machine_id))
    }
}

fn present(field: Option<String>) -> Option<String> {
    field.filter(|v| !v.trim().is_empty())
}
