//! Authentication models

pub mod session;
pub mod user;

// Re-export for convenience
pub use session::SessionPhase;
pub use user::{IdentityUser, SignupForm};
