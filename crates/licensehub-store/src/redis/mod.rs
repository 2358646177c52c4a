//! Redis license store.

pub mod client;
pub mod store;

pub use client::RedisClient;
pub use store::RedisLicenseStore;
