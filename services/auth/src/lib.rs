//! Identity and session handling for the capsule client
//!
//! Bridges the external identity provider with the backend session: token
//! plausibility checks, the explicit session context, the sign-in and
//! registration flows, and route-level access control.

pub mod bridge;
pub mod error;
pub mod guard;
pub mod identity;
pub mod models;
pub mod session;
pub mod token;
pub mod validation;

pub use bridge::{SessionBridge, SignInOutcome};
pub use error::{AuthError, AuthResult};
pub use guard::{Access, Navigation, Route, check_access};
pub use identity::{IdentityProvider, TokenFileProvider};
pub use models::{IdentityUser, SessionPhase, SignupForm};
pub use session::SessionContext;
pub use token::{IdentityToken, fresh_token};
