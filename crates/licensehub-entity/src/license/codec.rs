//! Store value codec for [`LicenseRecord`].
//!
//! Records are stored as compact JSON. A missing entry decodes to `None`;
//! records written before machine tracking existed decode with an empty
//! machine list.

use licensehub_core::error::{AppError, ErrorKind};
use licensehub_core::result::AppResult;

use super::model::LicenseRecord;

/// Serialize a record for the store.
pub fn encode(record: &LicenseRecord) -> AppResult<String> {
    Ok(serde_json::to_string(record)?)
}

/// Deserialize a stored value. `None` in, `None` out.
pub fn decode(raw: Option<&str>) -> AppResult<Option<LicenseRecord>> {
    raw.map(decode_value).transpose()
}

/// Deserialize a value known to be present.
pub fn decode_value(raw: &str) -> AppResult<LicenseRecord> {
    let record: LicenseRecord = serde_json::from_str(raw)?;
    record.check_invariants().map_err(|e| {
        AppError::new(
            ErrorKind::Serialization,
            format!("Stored license record is inconsistent: {}", e.message),
        )
    })?;
    Ok(record)
}
