//! Capsule backend client
//!
//! Typed access to the capsule API namespace: invitation validation,
//! signup/signin, session info, trip listing and detail, and photo upload.
//! Authenticated calls carry `Authorization: Bearer <identity token>`.

pub mod client;
pub mod error;
pub mod models;
pub mod routes;

pub use client::{CapsuleApi, CapsuleClient};
pub use error::{ApiError, ApiResult};
pub use routes::Endpoint;
