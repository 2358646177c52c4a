//! Client-facing denial reasons.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable reason code reported when an operation does not succeed.
///
/// These strings are part of the wire contract and never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    /// No license exists for the key.
    NotFound,
    /// The license was revoked.
    Revoked,
    /// The license expiry has passed.
    Expired,
    /// The machine limit is reached.
    DeviceLimit,
    /// The key does not match the structural pattern.
    InvalidFormat,
    /// The request carried no key.
    MissingKey,
    /// The request carried no machine identifier.
    MissingMachineId,
    /// A deactivation request lacked a key or machine identifier.
    MissingFields,
    /// The request body was not valid JSON.
    InvalidRequest,
}

impl DenialReason {
    /// The wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Revoked => "revoked",
            Self::Expired => "expired",
            Self::DeviceLimit => "device_limit",
            Self::InvalidFormat => "invalid_format",
            Self::MissingKey => "missing_key",
            Self::MissingMachineId => "missing_machine_id",
            Self::MissingFields => "missing_fields",
            Self::InvalidRequest => "invalid_request",
        }
    }

    /// Whether this reason stems from a malformed request rather than
    /// from license state.
    pub fn is_malformed_request(self) -> bool {
        matches!(
            self,
            Self::MissingKey | Self::MissingMachineId | Self::MissingFields | Self::InvalidRequest
        )
    }
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
