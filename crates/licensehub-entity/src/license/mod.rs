//! License domain entities.

pub mod codec;
pub mod key;
pub mod model;
pub mod reason;

pub use key::LicenseKey;
pub use model::{LicenseRecord, LicenseTier};
pub use reason::DenialReason;
