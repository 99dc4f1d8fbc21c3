//! Capsule backend endpoints

use reqwest::Method;

/// Endpoints of the capsule API namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint<'a> {
    ValidateInvitation,
    Signup,
    Signin,
    SessionInfo,
    /// Trips of a user; without an id the backend identifies the user by token
    Trips { user_id: Option<&'a str> },
    Trip { id: &'a str },
    Photos,
}

impl Endpoint<'_> {
    /// Path relative to `{base}{version}`
    pub fn path(&self) -> String {
        match self {
            Endpoint::ValidateInvitation => "capsule/users/validateInvitation".to_string(),
            Endpoint::Signup => "capsule/users/signup".to_string(),
            Endpoint::Signin => "capsule/users/signin".to_string(),
            Endpoint::SessionInfo => "capsule/sessionInfo".to_string(),
            Endpoint::Trips { user_id: Some(id) } => format!("capsule/trips/{}", id),
            Endpoint::Trips { user_id: None } => "capsule/trips".to_string(),
            Endpoint::Trip { id } => format!("capsule/trip/{}", id),
            Endpoint::Photos => "capsule/photos/".to_string(),
        }
    }

    pub fn method(&self) -> Method {
        match self {
            Endpoint::ValidateInvitation
            | Endpoint::Signup
            | Endpoint::Signin
            | Endpoint::Photos => Method::POST,
            Endpoint::SessionInfo | Endpoint::Trips { .. } | Endpoint::Trip { .. } => Method::GET,
        }
    }

    /// Whether the endpoint rejects requests without a bearer token
    ///
    /// Invitation validation may run before the user has an identity, and
    /// signin carries the token only when the identity provider issued one.
    pub fn requires_token(&self) -> bool {
        !matches!(self, Endpoint::ValidateInvitation | Endpoint::Signin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(
            Endpoint::ValidateInvitation.path(),
            "capsule/users/validateInvitation"
        );
        assert_eq!(Endpoint::Signup.path(), "capsule/users/signup");
        assert_eq!(Endpoint::Signin.path(), "capsule/users/signin");
        assert_eq!(Endpoint::SessionInfo.path(), "capsule/sessionInfo");
        assert_eq!(Endpoint::Trips { user_id: None }.path(), "capsule/trips");
        assert_eq!(
            Endpoint::Trips {
                user_id: Some("u1")
            }
            .path(),
            "capsule/trips/u1"
        );
        assert_eq!(Endpoint::Trip { id: "c9" }.path(), "capsule/trip/c9");
        assert_eq!(Endpoint::Photos.path(), "capsule/photos/");
    }

    #[test]
    fn test_methods_and_token_requirements() {
        assert_eq!(Endpoint::Photos.method(), Method::POST);
        assert_eq!(Endpoint::Trip { id: "c9" }.method(), Method::GET);
        assert!(!Endpoint::ValidateInvitation.requires_token());
        assert!(!Endpoint::Signin.requires_token());
        assert!(Endpoint::Signup.requires_token());
        assert!(Endpoint::Photos.requires_token());
        assert!(Endpoint::SessionInfo.requires_token());
    }
}
