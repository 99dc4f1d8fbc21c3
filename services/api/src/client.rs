//! HTTP client for the capsule backend
//!
//! Stateless request builder over one base URL and version prefix. Calls are
//! never retried; failures are surfaced to the caller as [`ApiError`].

use async_trait::async_trait;
use reqwest::{Client, header};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, error, instrument, warn};

use crate::{
    error::{ApiError, ApiResult},
    models::{
        InvitationResponse, SessionInfo, SigninRequest, SigninResponse, SignupRequest, TripDetail,
        UploadPhotosRequest, UploadPhotosResponse, UserToken, UserTrips,
        ValidateInvitationRequest,
    },
    routes::Endpoint,
};

/// Operations offered by the capsule backend
#[async_trait]
pub trait CapsuleApi: Send + Sync {
    /// Check that the invitation to a collection is valid
    async fn validate_invitation(
        &self,
        collection_id: &str,
        token: Option<&str>,
    ) -> ApiResult<InvitationResponse>;

    /// Create the backend user after identity-provider registration
    async fn signup(&self, request: &SignupRequest, token: &str) -> ApiResult<SigninResponse>;

    /// Establish the backend session for an identity-provider user
    async fn signin(
        &self,
        email: &str,
        password: Option<&str>,
        token: Option<&str>,
    ) -> ApiResult<SigninResponse>;

    /// Fetch session information (ships, etc.)
    async fn session_info(&self, token: &str) -> ApiResult<SessionInfo>;

    /// List the trips of a user, or of the token's user when `user_id` is `None`
    async fn user_trips(&self, user_id: Option<&str>, token: &str) -> ApiResult<UserTrips>;

    /// Fetch one trip (collection) with its photos
    async fn trip_details(&self, id: &str, token: &str) -> ApiResult<TripDetail>;

    /// Upload a batch of photos to a collection
    async fn upload_photos(
        &self,
        request: &UploadPhotosRequest,
        token: &str,
    ) -> ApiResult<UploadPhotosResponse>;
}

/// Client for the capsule backend
#[derive(Debug, Clone)]
pub struct CapsuleClient {
    client: Client,
    base_url: String,
    api_version: String,
}

impl CapsuleClient {
    /// Create a new client
    ///
    /// URLs are built as `{base_url}{api_version}{endpoint}`; both prefixes
    /// are given a trailing slash if they lack one.
    pub fn new(base_url: impl Into<String>, api_version: impl Into<String>) -> Self {
        Self::with_http_client(Client::new(), base_url, api_version)
    }

    /// Create a client reusing an existing `reqwest::Client`
    pub fn with_http_client(
        client: Client,
        base_url: impl Into<String>,
        api_version: impl Into<String>,
    ) -> Self {
        let base_url = with_trailing_slash(base_url.into());
        let api_version = with_trailing_slash(api_version.into().trim_start_matches('/').to_string());
        debug!("Creating capsule client for {}{}", base_url, api_version);

        Self {
            client,
            base_url,
            api_version,
        }
    }

    /// Complete URL for an endpoint
    pub fn url(&self, endpoint: &Endpoint<'_>) -> String {
        format!("{}{}{}", self.base_url, self.api_version, endpoint.path())
    }

    #[instrument(skip(self, token, body), fields(path = %endpoint.path()))]
    async fn request<B, T>(
        &self,
        endpoint: Endpoint<'_>,
        token: Option<&str>,
        body: Option<&B>,
    ) -> ApiResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let token = token.filter(|t| !t.is_empty());
        if endpoint.requires_token() && token.is_none() {
            warn!("Refusing to call authenticated endpoint without a token");
            return Err(ApiError::new("Authorization token is required", 401));
        }

        let url = self.url(&endpoint);
        let method = endpoint.method();
        debug!(%method, %url, authenticated = token.is_some(), "Backend request");

        let mut request = self
            .client
            .request(method, &url)
            .header(header::CONTENT_TYPE, "application/json");

        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            error!("Backend request failed: {}", e);
            ApiError::transport(&e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = ApiError::from_response(status.as_u16(), &body);
            error!(status = err.status, message = %err.message, "Backend API error");
            return Err(err);
        }

        let bytes = response.bytes().await.map_err(|e| {
            error!("Failed to read backend response: {}", e);
            ApiError::transport(&e)
        })?;
        let payload: &[u8] = if bytes.is_empty() { b"{}" } else { &bytes };

        serde_json::from_slice(payload).map_err(|e| {
            error!("Failed to parse backend response: {}", e);
            ApiError::new(format!("Failed to parse response: {}", e), status.as_u16())
        })
    }
}

fn with_trailing_slash(mut value: String) -> String {
    if !value.is_empty() && !value.ends_with('/') {
        value.push('/');
    }
    value
}

#[async_trait]
impl CapsuleApi for CapsuleClient {
    async fn validate_invitation(
        &self,
        collection_id: &str,
        token: Option<&str>,
    ) -> ApiResult<InvitationResponse> {
        let body = ValidateInvitationRequest {
            collection_id: collection_id.to_string(),
        };
        self.request(Endpoint::ValidateInvitation, token, Some(&body))
            .await
    }

    async fn signup(&self, request: &SignupRequest, token: &str) -> ApiResult<SigninResponse> {
        self.request(Endpoint::Signup, Some(token), Some(request))
            .await
    }

    async fn signin(
        &self,
        email: &str,
        password: Option<&str>,
        token: Option<&str>,
    ) -> ApiResult<SigninResponse> {
        let body = SigninRequest {
            user_token: UserToken {
                email: email.to_string(),
                password: password.map(str::to_string),
            },
        };
        self.request(Endpoint::Signin, token, Some(&body)).await
    }

    async fn session_info(&self, token: &str) -> ApiResult<SessionInfo> {
        self.request(Endpoint::SessionInfo, Some(token), None::<&()>)
            .await
    }

    async fn user_trips(&self, user_id: Option<&str>, token: &str) -> ApiResult<UserTrips> {
        let user_id = user_id.filter(|id| !id.is_empty());
        self.request(Endpoint::Trips { user_id }, Some(token), None::<&()>)
            .await
    }

    async fn trip_details(&self, id: &str, token: &str) -> ApiResult<TripDetail> {
        if id.is_empty() {
            return Err(ApiError::new("Trip id is required", 400));
        }
        self.request(Endpoint::Trip { id }, Some(token), None::<&()>)
            .await
    }

    async fn upload_photos(
        &self,
        request: &UploadPhotosRequest,
        token: &str,
    ) -> ApiResult<UploadPhotosResponse> {
        debug!(
            collection_id = %request.collection_id,
            photos = request.photos.len(),
            "Uploading photos"
        );
        self.request(Endpoint::Photos, Some(token), Some(request))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_building() {
        let client = CapsuleClient::new("https://api.example.com/", "v1/");
        assert_eq!(
            client.url(&Endpoint::Trip { id: "c1" }),
            "https://api.example.com/v1/capsule/trip/c1"
        );
    }

    #[test]
    fn test_url_normalizes_missing_slashes() {
        let client = CapsuleClient::new("https://api.example.com", "/v2");
        assert_eq!(
            client.url(&Endpoint::Photos),
            "https://api.example.com/v2/capsule/photos/"
        );
    }

    #[test]
    fn test_empty_version_is_kept_empty() {
        let client = CapsuleClient::new("http://localhost:8080/", "");
        assert_eq!(
            client.url(&Endpoint::SessionInfo),
            "http://localhost:8080/capsule/sessionInfo"
        );
    }

    #[tokio::test]
    async fn test_missing_token_fails_before_sending() {
        // Nothing listens on this port; the error must come from the guard
        let client = CapsuleClient::new("http://127.0.0.1:9/", "v1/");
        let err = client
            .session_info("")
            .await
            .expect_err("empty token must be rejected");
        assert_eq!(err.status, 401);
    }

    #[tokio::test]
    async fn test_transport_failure_has_status_zero() {
        let client = CapsuleClient::new("http://127.0.0.1:9/", "v1/");
        let err = client
            .validate_invitation("c1", None)
            .await
            .expect_err("nothing listens on port 9");
        assert!(err.is_transport());
        assert!(!err.message.is_empty());
    }
}
