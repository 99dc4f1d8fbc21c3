//! Common library for the capsule expedition client
//!
//! This crate provides shared functionality used across the client crates,
//! including durable session storage, configuration, error handling and
//! logging setup.

pub mod config;
pub mod error;
pub mod store;
pub mod telemetry;

pub use config::AppConfig;
pub use error::{StoreError, StoreResult};
pub use store::{BACKEND_USER_ID_KEY, FileStore, KeyValueStore, MemoryStore, SESSION_INFO_KEY};
