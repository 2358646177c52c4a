//! The license state machine.
//!
//! Every decision is a pure function of the stored record (or its absence),
//! the requesting machine and the current time. The caller persists
//! [`Decision::updated`] when present; nothing here touches the store.
//!
//! Standing is evaluated in a fixed order: absent, revoked, expired. Only a
//! license in good standing reaches machine admission. Deactivation skips the
//! standing checks so a slot can be freed on an inert license.

use chrono::{DateTime, Utc};

use licensehub_entity::license::LicenseRecord;

use super::outcome::{Admission, Grant, Rejection, Release};

/// An outcome plus the record to persist, if the decision changed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision<T> {
    /// What to report to the caller.
    pub outcome: T,
    /// Replacement record; `None` means no write.
    pub updated: Option<LicenseRecord>,
}

impl<T> Decision<T> {
    /// A decision that leaves the record untouched.
    pub fn unchanged(outcome: T) -> Self {
        Self {
            outcome,
            updated: None,
        }
    }

    /// A decision that replaces the record.
    pub fn write(outcome: T, updated: LicenseRecord) -> Self {
        Self {
            outcome,
            updated: Some(updated),
        }
    }
}

/// Pure licensing rules, parameterized by the machine limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LicenseStateMachine {
    max_machines: u32,
}

impl LicenseStateMachine {
    /// Create a state machine enforcing `max_machines` per license.
    pub fn new(max_machines: u32) -> Self {
        Self { max_machines }
    }

    /// The configured machine limit.
    pub fn max_machines(&self) -> u32 {
        self.max_machines
    }

    /// Check that a license exists, is not revoked and has not expired.
    pub fn check_standing<'a>(
        &self,
        record: Option<&'a LicenseRecord>,
        now: DateTime<Utc>,
    ) -> Result<&'a LicenseRecord, Rejection> {
        let record = record.ok_or(Rejection::NotFound)?;
        if record.revoked {
            return Err(Rejection::Revoked);
        }
        if record.is_expired_at(now) {
            return Err(Rejection::Expired);
        }
        Ok(record)
    }

    /// Admit `machine_id` to the license, registering it if there is room.
    ///
    /// Admission of an already-registered machine never writes.
    pub fn admit(
        &self,
        record: Option<&LicenseRecord>,
        machine_id: &str,
        now: DateTime<Utc>,
    ) -> Decision<Admission> {
        let record = match self.check_standing(record, now) {
            Ok(record) => record,
            Err(rejection) => return Decision::unchanged(Admission::Rejected(rejection)),
        };

        if record.has_machine(machine_id) {
            return Decision::unchanged(Admission::Granted(self.grant(record, false)));
        }

        if record.machines_used() >= self.max_machines {
            return Decision::unchanged(Admission::Rejected(Rejection::DeviceLimit {
                max_devices: self.max_machines,
            }));
        }

        let mut updated = record.clone();
        updated.machines.push(machine_id.to_string());
        let grant = self.grant(&updated, true);
        Decision::write(Admission::Granted(grant), updated)
    }

    /// Remove `machine_id` from the license.
    ///
    /// Revocation and expiry are ignored. Releasing an unregistered machine
    /// succeeds without a write.
    pub fn release(&self, record: Option<&LicenseRecord>, machine_id: &str) -> Decision<Release> {
        let Some(record) = record else {
            return Decision::unchanged(Release::NotFound);
        };

        if !record.has_machine(machine_id) {
            return Decision::unchanged(Release::Released {
                machines_used: record.machines_used(),
                removed: false,
            });
        }

        let mut updated = record.clone();
        updated.machines.retain(|m| m != machine_id);
        let outcome = Release::Released {
            machines_used: updated.machines_used(),
            removed: true,
        };
        Decision::write(outcome, updated)
    }

    fn grant(&self, record: &LicenseRecord, newly_registered: bool) -> Grant {
        Grant {
            tier: record.tier,
            expires: record.expires,
            features: record.tier.feature_list(),
            machines_used: record.machines_used(),
            machines_max: self.max_machines,
            newly_registered,
        }
    }
}
