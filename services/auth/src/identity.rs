//! Identity provider seam
//!
//! The identity provider (account creation, password login, token minting) is
//! an external collaborator. [`IdentityProvider`] is the contract the session
//! bridge needs from it; [`TokenFileProvider`] is a provider for the command
//! line that reads a provider-minted token from a file.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::{debug, info, warn};

use crate::{
    error::{AuthError, AuthResult},
    models::IdentityUser,
    token::IdentityToken,
};

/// Operations required from the external identity provider
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Currently signed-in user, if any
    fn current_user(&self) -> Option<IdentityUser>;

    /// Sign in with email and password
    async fn sign_in(&self, email: &str, password: &str) -> AuthResult<IdentityUser>;

    /// Create a new account and sign it in
    async fn create_user(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> AuthResult<IdentityUser>;

    /// Identity token of the current user, minted anew when `force_refresh`
    async fn id_token(&self, force_refresh: bool) -> AuthResult<String>;

    /// Close the identity-provider session
    async fn sign_out(&self) -> AuthResult<()>;
}

#[derive(Debug, Default)]
struct ProviderState {
    user: Option<IdentityUser>,
    token: Option<String>,
}

/// Provider backed by a token file written by an external login tool
///
/// The file holds one identity token. It is read again on every forced
/// refresh so that an externally refreshed token is picked up. Password
/// checks happen in the external tool; account creation is not supported.
#[derive(Debug)]
pub struct TokenFileProvider {
    path: PathBuf,
    email_hint: Option<String>,
    state: RwLock<ProviderState>,
}

impl TokenFileProvider {
    /// Create a signed-out provider for the given token file
    pub fn new(path: impl Into<PathBuf>, email_hint: Option<String>) -> Self {
        Self {
            path: path.into(),
            email_hint,
            state: RwLock::new(ProviderState::default()),
        }
    }

    /// Create a provider, signed in when the token file holds a usable token
    pub async fn restore(path: impl Into<PathBuf>, email_hint: Option<String>) -> Self {
        let provider = Self::new(path, email_hint);

        match provider.load().await {
            Ok((user, token)) => {
                info!(uid = %user.uid, "Restored identity session from token file");
                provider.replace_state(Some(user), Some(token));
            }
            Err(e) => debug!("No identity session restored: {}", e),
        }

        provider
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> AuthResult<(IdentityUser, String)> {
        let raw = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            AuthError::Provider(format!(
                "Cannot read identity token from {}: {}",
                self.path.display(),
                e
            ))
        })?;

        let token = IdentityToken::parse(raw)?;
        let user = self.user_from_token(&token);
        Ok((user, token.as_str().to_string()))
    }

    fn user_from_token(&self, token: &IdentityToken) -> IdentityUser {
        match token.claims() {
            Some(claims) => IdentityUser {
                uid: claims.uid().to_string(),
                email: claims.email.clone().or_else(|| self.email_hint.clone()),
                display_name: None,
            },
            // Opaque tokens carry no subject; fall back to the configured email
            None => IdentityUser {
                uid: self.email_hint.clone().unwrap_or_default(),
                email: self.email_hint.clone(),
                display_name: None,
            },
        }
    }

    fn replace_state(&self, user: Option<IdentityUser>, token: Option<String>) {
        match self.state.write() {
            Ok(mut state) => {
                state.user = user;
                state.token = token;
            }
            Err(poisoned) => {
                warn!("Identity state lock was poisoned; resetting");
                let mut state = poisoned.into_inner();
                state.user = user;
                state.token = token;
            }
        }
    }
}

#[async_trait]
impl IdentityProvider for TokenFileProvider {
    fn current_user(&self) -> Option<IdentityUser> {
        self.state.read().ok().and_then(|state| state.user.clone())
    }

    async fn sign_in(&self, email: &str, _password: &str) -> AuthResult<IdentityUser> {
        let (mut user, token) = self.load().await?;

        if let Some(token_email) = user.email.as_deref() {
            if !token_email.eq_ignore_ascii_case(email) {
                return Err(AuthError::Provider(format!(
                    "Token file belongs to {}, not {}",
                    token_email, email
                )));
            }
        }
        user.email = Some(email.to_string());

        info!(uid = %user.uid, "Signed in with identity token file");
        self.replace_state(Some(user.clone()), Some(token));
        Ok(user)
    }

    async fn create_user(
        &self,
        _email: &str,
        _password: &str,
        _display_name: &str,
    ) -> AuthResult<IdentityUser> {
        Err(AuthError::Unsupported("Account creation"))
    }

    async fn id_token(&self, force_refresh: bool) -> AuthResult<String> {
        if self.current_user().is_none() {
            return Err(AuthError::NotSignedIn);
        }

        if force_refresh {
            let (user, token) = self.load().await?;
            self.replace_state(Some(user), Some(token.clone()));
            return Ok(token);
        }

        self.state
            .read()
            .ok()
            .and_then(|state| state.token.clone())
            .ok_or(AuthError::MissingToken)
    }

    async fn sign_out(&self) -> AuthResult<()> {
        info!("Signing out of identity token file session");
        self.replace_state(None, None);
        Ok(())
    }
}
