//! License policy configuration.

use serde::{Deserialize, Serialize};

/// License policy configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenseConfig {
    /// Maximum number of machines registered against one license key.
    #[serde(default = "default_max_machines")]
    pub max_machines: u32,
    /// How many times a lost compare-and-swap is re-read and re-decided
    /// before the request fails with a conflict.
    #[serde(default = "default_max_write_retries")]
    pub max_write_retries: u32,
}

impl Default for LicenseConfig {
    fn default() -> Self {
        Self {
            max_machines: default_max_machines(),
            max_write_retries: default_max_write_retries(),
        }
    }
}

fn default_max_machines() -> u32 {
    3
}

fn default_max_write_retries() -> u32 {
    3
}
