//! Identity token handling
//!
//! Identity tokens are short-lived bearer credentials minted by the external
//! identity provider. They are fetched with a forced refresh before every
//! backend call and never cached by this crate. Claims can be peeked at for
//! logging and for deriving the signed-in user, but signatures are never
//! checked here; the backend does that.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;
use std::fmt;
use tracing::{debug, warn};

use crate::{
    error::{AuthError, AuthResult},
    identity::IdentityProvider,
};

/// Shortest token accepted as plausible
pub const MIN_TOKEN_LENGTH: usize = 100;

/// A plausibility-checked identity token
#[derive(Clone, PartialEq, Eq)]
pub struct IdentityToken(String);

impl IdentityToken {
    /// Check a raw token from the identity provider
    ///
    /// Empty tokens are missing; tokens shorter than [`MIN_TOKEN_LENGTH`]
    /// characters are invalid.
    pub fn parse(raw: impl Into<String>) -> AuthResult<Self> {
        let raw = raw.into();
        let token = raw.trim();

        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }

        let length = token.chars().count();
        if length < MIN_TOKEN_LENGTH {
            warn!("Rejecting identity token of {} characters", length);
            return Err(AuthError::InvalidToken { length });
        }

        Ok(Self(token.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Unverified claims, if the token is a decodable JWT
    pub fn claims(&self) -> Option<IdentityClaims> {
        peek_claims(&self.0)
    }
}

// Tokens must not end up in logs
impl fmt::Debug for IdentityToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IdentityToken({} chars)", self.0.len())
    }
}

/// Claims of an identity-provider JWT
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IdentityClaims {
    /// Subject (provider user id)
    pub sub: String,
    /// Provider user id, when the provider sets it separately
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Expiration time (seconds since epoch)
    #[serde(default)]
    pub exp: Option<u64>,
    /// Issued at time
    #[serde(default)]
    pub iat: Option<u64>,
}

impl IdentityClaims {
    /// Provider user id, preferring `user_id` over `sub`
    pub fn uid(&self) -> &str {
        self.user_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .unwrap_or(&self.sub)
    }

    /// Whether the token had expired at `now` (seconds since epoch)
    pub fn is_expired_at(&self, now: u64) -> bool {
        self.exp.is_some_and(|exp| exp <= now)
    }
}

/// Decode JWT claims without verifying the signature
pub fn peek_claims(token: &str) -> Option<IdentityClaims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    decode::<IdentityClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .map_err(|e| debug!("Identity token is not a decodable JWT: {}", e))
        .ok()
}

/// Fetch a freshly minted token from the identity provider
///
/// Always forces a refresh.
pub async fn fresh_token<P>(provider: &P) -> AuthResult<IdentityToken>
where
    P: IdentityProvider + ?Sized,
{
    let raw = provider.id_token(true).await?;
    let token = IdentityToken::parse(raw)?;

    if let Some(claims) = token.claims() {
        debug!(uid = %claims.uid(), exp = ?claims.exp, "Fetched fresh identity token");
    }

    Ok(token)
}
