//! Outcomes produced by the license state machine.

use chrono::{DateTime, Utc};

use licensehub_entity::license::{DenialReason, LicenseTier};

/// Why a license cannot be used right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// No record exists for the key.
    NotFound,
    /// The license was revoked.
    Revoked,
    /// The license expiry has passed.
    Expired,
    /// All machine slots are taken by other machines.
    DeviceLimit {
        /// Configured machine limit, reported to the client.
        max_devices: u32,
    },
}

impl Rejection {
    /// The stable wire reason.
    pub fn reason(self) -> DenialReason {
        match self {
            Self::NotFound => DenialReason::NotFound,
            Self::Revoked => DenialReason::Revoked,
            Self::Expired => DenialReason::Expired,
            Self::DeviceLimit { .. } => DenialReason::DeviceLimit,
        }
    }

    /// The machine limit, only for [`Rejection::DeviceLimit`].
    pub fn max_devices(self) -> Option<u32> {
        match self {
            Self::DeviceLimit { max_devices } => Some(max_devices),
            _ => None,
        }
    }
}

/// Entitlement returned when a machine is admitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grant {
    /// License tier.
    pub tier: LicenseTier,
    /// License expiry, if any.
    pub expires: Option<DateTime<Utc>>,
    /// Features unlocked by the tier.
    pub features: Vec<String>,
    /// Machines registered after this admission.
    pub machines_used: u32,
    /// Configured machine limit.
    pub machines_max: u32,
    /// Whether this admission registered the machine for the first time.
    pub newly_registered: bool,
}

/// Result of a verify or activate request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// The machine may use the license.
    Granted(Grant),
    /// The license cannot be used from this machine.
    Rejected(Rejection),
}

impl Admission {
    /// Whether the machine was admitted.
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted(_))
    }
}

/// Result of a deactivate request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
    /// The machine no longer holds a slot.
    Released {
        /// Machines registered after the release.
        machines_used: u32,
        /// Whether the machine was registered before the request.
        removed: bool,
    },
    /// No record exists for the key.
    NotFound,
}
