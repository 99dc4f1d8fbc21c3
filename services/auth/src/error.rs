//! Error type for identity and session operations

use api::ApiError;
use common::StoreError;
use thiserror::Error;

/// Custom error type for authentication and session errors
#[derive(Error, Debug)]
pub enum AuthError {
    /// The identity provider returned no token
    #[error("Identity token is missing")]
    MissingToken,

    /// The token is too short to be a real identity token
    #[error("Identity token is invalid ({length} characters)")]
    InvalidToken { length: usize },

    /// No identity-provider user is signed in
    #[error("No user is signed in")]
    NotSignedIn,

    /// The identity provider failed
    #[error("Identity provider error: {0}")]
    Provider(String),

    /// User input was rejected before any network call
    #[error("{0}")]
    Validation(String),

    /// Backend call failed
    #[error(transparent)]
    Backend(#[from] ApiError),

    /// Identity login succeeded but the backend session was not established
    #[error("Could not establish backend session: {source}")]
    BackendSignin {
        #[source]
        source: ApiError,
        /// Whether the identity-provider session was closed automatically
        identity_signed_out: bool,
    },

    /// Durable storage failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The identity provider does not offer this operation
    #[error("{0} is not supported by this identity provider")]
    Unsupported(&'static str),
}

impl AuthError {
    /// Whether the user has to sign in again to recover
    pub fn requires_reauthentication(&self) -> bool {
        match self {
            AuthError::MissingToken
            | AuthError::InvalidToken { .. }
            | AuthError::NotSignedIn
            | AuthError::BackendSignin { .. } => true,
            AuthError::Backend(err) => err.is_unauthorized(),
            _ => false,
        }
    }
}

/// Type alias for authentication results
pub type AuthResult<T> = Result<T, AuthError>;
