//! Identity-provider to backend session bridge
//!
//! After an identity login the backend session is established with a freshly
//! minted identity token, the backend user id is persisted, and session info
//! is fetched and persisted. Only the backend signin itself is fatal; the
//! steps after it degrade to a warning on the outcome.

use api::{
    ApiError, CapsuleApi,
    models::{InvitationResponse, SessionInfo, SigninResponse, SignupRequest, TripDetail, UserTrips},
};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use crate::{
    error::{AuthError, AuthResult},
    guard::{Navigation, Route},
    identity::IdentityProvider,
    models::SignupForm,
    session::SessionContext,
    token::{IdentityToken, fresh_token},
    validation::{validate_email, validate_required, validate_signup},
};

/// Result of a completed sign-in or registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInOutcome {
    pub navigation: Navigation,
    pub backend_user_id: Option<String>,
    /// Degraded-mode message when a step after backend signin failed
    pub warning: Option<String>,
}

/// Coordinates the identity provider, the backend and the session context
#[derive(Clone)]
pub struct SessionBridge {
    identity: Arc<dyn IdentityProvider>,
    api: Arc<dyn CapsuleApi>,
    context: Arc<SessionContext>,
}

impl SessionBridge {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        api: Arc<dyn CapsuleApi>,
        context: Arc<SessionContext>,
    ) -> Self {
        Self {
            identity,
            api,
            context,
        }
    }

    pub fn context(&self) -> &Arc<SessionContext> {
        &self.context
    }

    pub fn identity(&self) -> &Arc<dyn IdentityProvider> {
        &self.identity
    }

    /// Freshly minted token for the current identity user
    pub async fn token(&self) -> AuthResult<IdentityToken> {
        fresh_token(self.identity.as_ref()).await
    }

    /// Sign in with the identity provider, then establish the backend session
    #[instrument(skip(self, password))]
    pub async fn sign_in(&self, email: &str, password: &str) -> AuthResult<SignInOutcome> {
        let email = email.trim();
        validate_email(email).map_err(AuthError::Validation)?;
        validate_required("Password", password).map_err(AuthError::Validation)?;

        let user = self.identity.sign_in(email, password).await?;
        info!(uid = %user.uid, "Identity login succeeded");
        self.context.begin(user).await;

        let token = self.token_or_abandon().await?;

        // The backend trusts the identity token; the password is not forwarded
        let response = match self.api.signin(email, None, Some(token.as_str())).await {
            Ok(response) => response,
            Err(source) => return Err(self.strand(source).await),
        };

        Ok(self.complete(response).await)
    }

    /// Create the identity account and the backend user, then sign in
    #[instrument(skip(self, form), fields(email = %form.email))]
    pub async fn register(&self, form: &SignupForm) -> AuthResult<SignInOutcome> {
        validate_signup(form).map_err(AuthError::Validation)?;
        let email = form.email.trim();

        let user = self
            .identity
            .create_user(email, &form.password, form.display_name())
            .await?;
        info!(uid = %user.uid, "Identity account created");
        self.context.begin(user).await;

        let token = self.token_or_abandon().await?;
        let request = SignupRequest {
            firebase_token: token.as_str().to_string(),
            email: email.to_string(),
            collection_id: form.collection_id.trim().to_string(),
            name: form.name.trim().to_string(),
            lastname: form.lastname.trim().to_string(),
        };

        let response = match self.api.signup(&request, token.as_str()).await {
            Ok(response) => response,
            Err(source) => return Err(self.strand(source).await),
        };

        Ok(self.complete(response).await)
    }

    /// Check an invitation, authenticated only when an identity user exists
    pub async fn validate_invitation(&self, collection_id: &str) -> AuthResult<InvitationResponse> {
        let collection_id = collection_id.trim();
        validate_required("Collection id", collection_id).map_err(AuthError::Validation)?;

        let token = match self.identity.current_user() {
            Some(_) => Some(self.token().await?),
            None => None,
        };

        Ok(self
            .api
            .validate_invitation(collection_id, token.as_ref().map(IdentityToken::as_str))
            .await?)
    }

    /// Sign out of the identity provider and tear the session down
    ///
    /// The local session is cleared even when the provider sign-out fails.
    pub async fn sign_out(&self) -> AuthResult<Navigation> {
        let provider = self.identity.sign_out().await;
        self.context.teardown().await?;
        provider?;

        info!("Signed out");
        Ok(Navigation::to(Route::Login))
    }

    /// Trips of the signed-in backend user
    pub async fn trips(&self) -> AuthResult<UserTrips> {
        let token = self.token().await?;
        let user_id = self.context.backend_user_id().await;
        Ok(self
            .api
            .user_trips(user_id.as_deref(), token.as_str())
            .await?)
    }

    /// One trip with its photos
    pub async fn trip(&self, id: &str) -> AuthResult<TripDetail> {
        let token = self.token().await?;
        Ok(self.api.trip_details(id, token.as_str()).await?)
    }

    /// Fetch session info and persist it
    pub async fn refresh_session_info(&self) -> AuthResult<SessionInfo> {
        let token = self.token().await?;
        let session_info = self.api.session_info(token.as_str()).await?;
        self.context.store_session_info(&session_info).await?;
        Ok(session_info)
    }

    async fn complete(&self, response: SigninResponse) -> SignInOutcome {
        let mut warnings = Vec::new();

        let backend_user_id = response.user_id().map(str::to_string);
        if backend_user_id.is_none() {
            warn!("Backend signin returned no user id");
            warnings.push("Backend did not return a user id".to_string());
        }

        if let Err(e) = self.context.establish(backend_user_id.as_deref()).await {
            warn!("Failed to persist backend user id: {}", e);
            warnings.push(format!("Could not save backend user id: {}", e));
        }

        if let Err(e) = self.refresh_session_info().await {
            warn!("Session info unavailable after signin: {}", e);
            warnings.push(format!("Session info unavailable: {}", e));
        }

        info!(backend_user_id = ?backend_user_id, degraded = !warnings.is_empty(), "Backend session established");

        SignInOutcome {
            navigation: Navigation::to(Route::Trips).with_refresh(),
            backend_user_id,
            warning: (!warnings.is_empty()).then(|| warnings.join("; ")),
        }
    }

    async fn token_or_abandon(&self) -> AuthResult<IdentityToken> {
        match self.token().await {
            Ok(token) => Ok(token),
            Err(e) => {
                error!("No usable identity token after identity login: {}", e);
                self.abandon_identity().await;
                Err(e)
            }
        }
    }

    async fn strand(&self, source: ApiError) -> AuthError {
        error!(status = source.status, "Backend signin failed: {}", source.message);
        let identity_signed_out = self.abandon_identity().await;
        AuthError::BackendSignin {
            source,
            identity_signed_out,
        }
    }

    /// Close the identity session that has no backend counterpart
    async fn abandon_identity(&self) -> bool {
        self.context.mark_stranded().await;

        match self.identity.sign_out().await {
            Ok(()) => {
                self.context.on_auth_state_changed(None).await;
                true
            }
            Err(e) => {
                warn!("Automatic identity sign-out failed: {}", e);
                false
            }
        }
    }
}
