//! License key value type.
//!
//! Keys have the shape `CS-PRO-XXXX-XXXX-XXXX-XXXX` where every `X` group
//! is four hexadecimal characters. Hex digits are accepted in any case and
//! canonicalized to uppercase, so a key typed in lowercase resolves to the
//! same store entry as the provisioned one.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use licensehub_core::error::AppError;

/// Fixed prefix of every license key.
pub const KEY_PREFIX: &str = "CS-PRO-";
const KEY_SEGMENT_LEN: usize = 4;
const KEY_SEGMENT_COUNT: usize = 4;

/// A structurally valid, canonicalized license key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LicenseKey(String);

impl LicenseKey {
    /// Parse and canonicalize a raw key.
    ///
    /// Surrounding whitespace is ignored. The prefix must match exactly;
    /// the hex groups are case-insensitive.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let trimmed = raw.trim();
        if !Self::is_well_formed(trimmed) {
            return Err(AppError::validation(format!(
                "Invalid license key format. Expected: {KEY_PREFIX}XXXX-XXXX-XXXX-XXXX (hex characters)"
            )));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// Check the structural pattern without allocating.
    pub fn is_well_formed(key: &str) -> bool {
        let Some(rest) = key.strip_prefix(KEY_PREFIX) else {
            return false;
        };

        let mut count = 0;
        for segment in rest.split('-') {
            count += 1;
            if segment.len() != KEY_SEGMENT_LEN
                || !segment.chars().all(|c| c.is_ascii_hexdigit())
            {
                return false;
            }
        }
        count == KEY_SEGMENT_COUNT
    }

    /// The canonical key string, used as the store index.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LicenseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for LicenseKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for LicenseKey {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<LicenseKey> for String {
    fn from(key: LicenseKey) -> Self {
        key.0
    }
}

impl AsRef<str> for LicenseKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
