//! Identity user and registration form

use serde::{Deserialize, Serialize};

/// User as known to the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityUser {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

/// Registration form submitted from the signup screen
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub collection_id: String,
    pub name: String,
    pub lastname: String,
}

impl SignupForm {
    /// Display name given to the identity provider: the part of the email
    /// before `@`
    pub fn display_name(&self) -> &str {
        let email = self.email.trim();
        email.split('@').next().unwrap_or(email)
    }
}
