//! License service: read, decide, conditionally write.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use licensehub_core::config::LicenseConfig;
use licensehub_core::error::AppError;
use licensehub_core::result::AppResult;
use licensehub_core::traits::license_store::LicenseStore;
use licensehub_entity::license::{LicenseKey, LicenseRecord};

use super::machine::{Decision, LicenseStateMachine};
use super::outcome::{Admission, Release};
use super::repository::LicenseRepository;

/// Verify/activate/deactivate use cases plus the provisioning operations
/// used by the admin CLI.
///
/// Writes go through compare-and-swap. When another request changed the
/// record between read and write, the record is re-read and the decision
/// re-made, up to `max_write_retries` times.
#[derive(Debug, Clone)]
pub struct LicenseService {
    /// License repository.
    repo: LicenseRepository,
    /// Licensing rules.
    machine: LicenseStateMachine,
    /// Retry budget for lost compare-and-swap races.
    max_write_retries: u32,
}

impl LicenseService {
    /// Creates a new license service.
    pub fn new(store: Arc<dyn LicenseStore>, config: &LicenseConfig) -> Self {
        Self {
            repo: LicenseRepository::new(store),
            machine: LicenseStateMachine::new(config.max_machines),
            max_write_retries: config.max_write_retries,
        }
    }

    /// The licensing rules in force.
    pub fn state_machine(&self) -> &LicenseStateMachine {
        &self.machine
    }

    /// Check the license and admit the machine, registering it on first use.
    pub async fn verify(&self, key: &LicenseKey, machine_id: &str) -> AppResult<Admission> {
        self.admit(key, machine_id, "verify").await
    }

    /// Same admission as [`LicenseService::verify`]; callers report slot usage.
    pub async fn activate(&self, key: &LicenseKey, machine_id: &str) -> AppResult<Admission> {
        self.admit(key, machine_id, "activate").await
    }

    /// Free the machine's slot, regardless of license standing.
    pub async fn deactivate(&self, key: &LicenseKey, machine_id: &str) -> AppResult<Release> {
        let release = self
            .apply(key, |record| self.machine.release(record, machine_id))
            .await?;

        match release {
            Release::Released {
                machines_used,
                removed: true,
            } => info!(key = %key, machine_id, machines_used, "Machine released"),
            Release::Released { removed: false, .. } => {
                debug!(key = %key, machine_id, "Machine was not registered")
            }
            Release::NotFound => debug!(key = %key, "Deactivation for unknown license"),
        }

        Ok(release)
    }

    /// Fetch the current record.
    pub async fn find(&self, key: &LicenseKey) -> AppResult<Option<LicenseRecord>> {
        Ok(self.repo.load(key).await?.map(|stored| stored.record))
    }

    /// Create a license record.
    ///
    /// Returns `false` if a record already exists and `overwrite` is not set.
    pub async fn provision(
        &self,
        key: &LicenseKey,
        record: &LicenseRecord,
        overwrite: bool,
    ) -> AppResult<bool> {
        record.check_invariants()?;

        if overwrite {
            self.repo.overwrite(key, record).await?;
            info!(key = %key, tier = %record.tier, "License provisioned (overwrite)");
            return Ok(true);
        }

        let created = self.repo.create(key, record).await?;
        if created {
            info!(key = %key, tier = %record.tier, "License provisioned");
        }
        Ok(created)
    }

    /// Mark a license revoked. Returns the resulting record, or `None` if
    /// the key is unknown.
    pub async fn revoke(&self, key: &LicenseKey) -> AppResult<Option<LicenseRecord>> {
        let result = self
            .apply(key, |record| match record {
                None => Decision::unchanged(None),
                Some(record) if record.revoked => Decision::unchanged(Some(record.clone())),
                Some(record) => {
                    let mut updated = record.clone();
                    updated.revoked = true;
                    Decision::write(Some(updated.clone()), updated)
                }
            })
            .await?;

        if result.is_some() {
            info!(key = %key, "License revoked");
        }
        Ok(result)
    }

    /// Check that the backend store is reachable.
    pub async fn health_check(&self) -> AppResult<bool> {
        self.repo.health_check().await
    }

    async fn admit(
        &self,
        key: &LicenseKey,
        machine_id: &str,
        operation: &'static str,
    ) -> AppResult<Admission> {
        let now = Utc::now();
        let admission = self
            .apply(key, |record| self.machine.admit(record, machine_id, now))
            .await?;

        match &admission {
            Admission::Granted(grant) if grant.newly_registered => info!(
                key = %key,
                machine_id,
                operation,
                machines_used = grant.machines_used,
                "Machine registered"
            ),
            Admission::Granted(_) => {}
            Admission::Rejected(rejection) => debug!(
                key = %key,
                machine_id,
                operation,
                reason = %rejection.reason(),
                "License rejected"
            ),
        }

        Ok(admission)
    }

    /// Run one read-decide-write cycle, retrying on lost races.
    async fn apply<T, F>(&self, key: &LicenseKey, mut decide: F) -> AppResult<T>
    where
        F: FnMut(Option<&LicenseRecord>) -> Decision<T>,
    {
        let mut attempt = 0;
        loop {
            let stored = self.repo.load(key).await?;
            let decision = decide(stored.as_ref().map(|s| &s.record));

            let Some(updated) = decision.updated else {
                return Ok(decision.outcome);
            };
            let Some(previous) = stored else {
                return Err(AppError::internal(
                    "License decision produced a record for an absent key",
                ));
            };

            if self.repo.replace(key, &previous, &updated).await? {
                return Ok(decision.outcome);
            }

            attempt += 1;
            if attempt > self.max_write_retries {
                warn!(key = %key, attempts = attempt, "Giving up on contended license record");
                return Err(AppError::conflict(
                    "License record was modified concurrently; please retry",
                ));
            }
            warn!(key = %key, attempt, "License record changed concurrently, retrying");
        }
    }
}
