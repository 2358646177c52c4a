//! License record entity model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use licensehub_core::error::AppError;

/// Capabilities unlocked by a paid license.
const PRO_FEATURES: &[&str] = &[
    "cost_tracking",
    "burn_rate",
    "cost_warnings",
    "model_suggestions",
    "historical_stats",
];

/// Commercial tier of a license.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LicenseTier {
    /// Subscription license, optionally time-limited.
    Pro,
    /// Perpetual license; never carries an expiry.
    Lifetime,
}

impl LicenseTier {
    /// Features granted by this tier.
    ///
    /// Both tiers currently grant the same set.
    pub fn features(self) -> &'static [&'static str] {
        match self {
            Self::Pro | Self::Lifetime => PRO_FEATURES,
        }
    }

    /// Features as owned strings, for response bodies.
    pub fn feature_list(self) -> Vec<String> {
        self.features().iter().map(|f| f.to_string()).collect()
    }
}

impl fmt::Display for LicenseTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pro => write!(f, "pro"),
            Self::Lifetime => write!(f, "lifetime"),
        }
    }
}

impl FromStr for LicenseTier {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pro" => Ok(Self::Pro),
            "lifetime" => Ok(Self::Lifetime),
            other => Err(AppError::validation(format!(
                "Unknown license tier: '{other}'. Supported: pro, lifetime"
            ))),
        }
    }
}

/// The persisted state of one license key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseRecord {
    /// Commercial tier.
    pub tier: LicenseTier,
    /// Expiry instant; always `None` for [`LicenseTier::Lifetime`].
    pub expires: Option<DateTime<Utc>>,
    /// Registered machine identifiers, in registration order, no duplicates.
    #[serde(default)]
    pub machines: Vec<String>,
    /// Revoked licenses are permanently inert.
    #[serde(default)]
    pub revoked: bool,
    /// When the license was provisioned.
    pub created_at: DateTime<Utc>,
    /// Owner contact.
    pub email: String,
}

impl LicenseRecord {
    /// Build a fresh record for provisioning.
    ///
    /// Fails if a lifetime license is given an expiry.
    pub fn provision(
        tier: LicenseTier,
        expires: Option<DateTime<Utc>>,
        email: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, AppError> {
        let record = Self {
            tier,
            expires,
            machines: Vec::new(),
            revoked: false,
            created_at,
            email: email.into(),
        };
        record.check_invariants()?;
        Ok(record)
    }

    /// Verify the structural invariants a stored record must satisfy.
    pub fn check_invariants(&self) -> Result<(), AppError> {
        if self.tier == LicenseTier::Lifetime && self.expires.is_some() {
            return Err(AppError::validation(
                "A lifetime license cannot carry an expiry",
            ));
        }
        Ok(())
    }

    /// Whether the license has lapsed at `now`. The expiry instant itself
    /// is still valid; lifetime licenses never lapse.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match (self.tier, self.expires) {
            (LicenseTier::Lifetime, _) => false,
            (LicenseTier::Pro, Some(expires)) => expires < now,
            (LicenseTier::Pro, None) => false,
        }
    }

    /// Whether `machine_id` is already registered.
    pub fn has_machine(&self, machine_id: &str) -> bool {
        self.machines.iter().any(|m| m == machine_id)
    }

    /// Number of registered machines.
    pub fn machines_used(&self) -> u32 {
        u32::try_from(self.machines.len()).unwrap_or(u32::MAX)
    }
}
