//! Sign-in, registration and sign-out flows against hand-written mocks

use api::{
    ApiError, ApiResult, CapsuleApi,
    models::{
        InvitationResponse, SessionDetails, SessionInfo, SigninResponse, SignupRequest,
        TripDetail, UploadPhotosRequest, UploadPhotosResponse, UserTrips,
    },
};
use async_trait::async_trait;
use auth::{
    Access, AuthError, IdentityProvider, IdentityUser, Route, SessionBridge, SessionContext,
    SessionPhase, SignupForm, check_access,
};
use common::{BACKEND_USER_ID_KEY, KeyValueStore, MemoryStore, SESSION_INFO_KEY};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

fn long_token(seed: char) -> String {
    std::iter::repeat_n(seed, 120).collect()
}

struct MockIdentity {
    user: Mutex<Option<IdentityUser>>,
    token: Mutex<String>,
    fail_sign_out: AtomicBool,
    token_requests: AtomicUsize,
    forced_refreshes: AtomicUsize,
    sign_outs: AtomicUsize,
}

impl MockIdentity {
    fn new() -> Self {
        Self {
            user: Mutex::new(None),
            token: Mutex::new(long_token('t')),
            fail_sign_out: AtomicBool::new(false),
            token_requests: AtomicUsize::new(0),
            forced_refreshes: AtomicUsize::new(0),
            sign_outs: AtomicUsize::new(0),
        }
    }

    fn signed_in() -> Self {
        let identity = Self::new();
        *identity.user.lock().unwrap() = Some(user("diver@example.com"));
        identity
    }
}

fn user(email: &str) -> IdentityUser {
    IdentityUser {
        uid: "uid-1".to_string(),
        email: Some(email.to_string()),
        display_name: None,
    }
}

#[async_trait]
impl IdentityProvider for MockIdentity {
    fn current_user(&self) -> Option<IdentityUser> {
        self.user.lock().unwrap().clone()
    }

    async fn sign_in(&self, email: &str, password: &str) -> auth::AuthResult<IdentityUser> {
        if password == "wrong-password" {
            return Err(AuthError::Provider("Wrong password".to_string()));
        }
        let signed_in = user(email);
        *self.user.lock().unwrap() = Some(signed_in.clone());
        Ok(signed_in)
    }

    async fn create_user(
        &self,
        email: &str,
        _password: &str,
        display_name: &str,
    ) -> auth::AuthResult<IdentityUser> {
        let created = IdentityUser {
            display_name: Some(display_name.to_string()),
            ..user(email)
        };
        *self.user.lock().unwrap() = Some(created.clone());
        Ok(created)
    }

    async fn id_token(&self, force_refresh: bool) -> auth::AuthResult<String> {
        self.token_requests.fetch_add(1, Ordering::SeqCst);
        if force_refresh {
            self.forced_refreshes.fetch_add(1, Ordering::SeqCst);
        }
        Ok(self.token.lock().unwrap().clone())
    }

    async fn sign_out(&self) -> auth::AuthResult<()> {
        self.sign_outs.fetch_add(1, Ordering::SeqCst);
        if self.fail_sign_out.load(Ordering::SeqCst) {
            return Err(AuthError::Provider("network down".to_string()));
        }
        *self.user.lock().unwrap() = None;
        Ok(())
    }
}

#[derive(Default)]
struct MockApi {
    signin_error: Mutex<Option<ApiError>>,
    session_info_error: Mutex<Option<ApiError>>,
    signin_calls: AtomicUsize,
    signup_calls: AtomicUsize,
    session_info_calls: AtomicUsize,
    invitation_tokens: Mutex<Vec<Option<String>>>,
    signup_requests: Mutex<Vec<SignupRequest>>,
    trips_user_ids: Mutex<Vec<Option<String>>>,
}

fn signin_response() -> SigninResponse {
    serde_json::from_value(serde_json::json!({"_id": "backend-42"})).unwrap()
}

#[async_trait]
impl CapsuleApi for MockApi {
    async fn validate_invitation(
        &self,
        _collection_id: &str,
        token: Option<&str>,
    ) -> ApiResult<InvitationResponse> {
        self.invitation_tokens
            .lock()
            .unwrap()
            .push(token.map(str::to_string));
        Ok(InvitationResponse {
            valid: Some(true),
            ..Default::default()
        })
    }

    async fn signup(&self, request: &SignupRequest, _token: &str) -> ApiResult<SigninResponse> {
        self.signup_calls.fetch_add(1, Ordering::SeqCst);
        self.signup_requests.lock().unwrap().push(request.clone());
        match self.signin_error.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(signin_response()),
        }
    }

    async fn signin(
        &self,
        _email: &str,
        password: Option<&str>,
        token: Option<&str>,
    ) -> ApiResult<SigninResponse> {
        self.signin_calls.fetch_add(1, Ordering::SeqCst);
        assert_eq!(password, None);
        assert!(token.is_some());
        match self.signin_error.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(signin_response()),
        }
    }

    async fn session_info(&self, _token: &str) -> ApiResult<SessionInfo> {
        self.session_info_calls.fetch_add(1, Ordering::SeqCst);
        match self.session_info_error.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(SessionInfo {
                session_info: SessionDetails { ships: vec![] },
            }),
        }
    }

    async fn user_trips(&self, user_id: Option<&str>, _token: &str) -> ApiResult<UserTrips> {
        self.trips_user_ids
            .lock()
            .unwrap()
            .push(user_id.map(str::to_string));
        Ok(UserTrips {
            user_id: user_id.unwrap_or_default().to_string(),
            collections: vec![],
        })
    }

    async fn trip_details(&self, _id: &str, _token: &str) -> ApiResult<TripDetail> {
        Err(ApiError::new("not used", 500))
    }

    async fn upload_photos(
        &self,
        _request: &UploadPhotosRequest,
        _token: &str,
    ) -> ApiResult<UploadPhotosResponse> {
        Err(ApiError::new("not used", 500))
    }
}

struct Harness {
    identity: Arc<MockIdentity>,
    api: Arc<MockApi>,
    store: Arc<MemoryStore>,
    context: Arc<SessionContext>,
    bridge: SessionBridge,
}

fn harness(identity: MockIdentity, api: MockApi) -> Harness {
    let identity = Arc::new(identity);
    let api = Arc::new(api);
    let store = Arc::new(MemoryStore::new());
    let context = Arc::new(SessionContext::new(store.clone()));
    let bridge = SessionBridge::new(identity.clone(), api.clone(), context.clone());
    Harness {
        identity,
        api,
        store,
        context,
        bridge,
    }
}

#[tokio::test]
async fn test_sign_in_establishes_and_persists_session() {
    let h = harness(MockIdentity::new(), MockApi::default());

    let outcome = h
        .bridge
        .sign_in("diver@example.com", "secret-pass")
        .await
        .expect("sign in succeeds");

    assert_eq!(outcome.navigation.route, Route::Trips);
    assert!(outcome.navigation.refresh);
    assert_eq!(outcome.backend_user_id.as_deref(), Some("backend-42"));
    assert_eq!(outcome.warning, None);

    assert_eq!(h.context.phase().await, SessionPhase::Established);
    assert_eq!(
        h.store.get(BACKEND_USER_ID_KEY).await.unwrap().as_deref(),
        Some("backend-42")
    );
    assert!(h.store.get(SESSION_INFO_KEY).await.unwrap().is_some());

    // One token for signin, one for session info; always forced
    assert_eq!(h.identity.token_requests.load(Ordering::SeqCst), 2);
    assert_eq!(h.identity.forced_refreshes.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_session_info_failure_is_a_warning() {
    let api = MockApi::default();
    *api.session_info_error.lock().unwrap() = Some(ApiError::new("Service unavailable", 503));
    let h = harness(MockIdentity::new(), api);

    let outcome = h
        .bridge
        .sign_in("diver@example.com", "secret-pass")
        .await
        .expect("session info failure must not fail sign in");

    assert_eq!(outcome.navigation.route, Route::Trips);
    let warning = outcome.warning.expect("warning is set");
    assert!(warning.contains("Service unavailable"), "{}", warning);
    assert_eq!(h.context.phase().await, SessionPhase::Established);
    assert_eq!(h.store.get(SESSION_INFO_KEY).await.unwrap(), None);
}

#[tokio::test]
async fn test_backend_signin_failure_signs_out_of_identity() {
    let api = MockApi::default();
    *api.signin_error.lock().unwrap() = Some(ApiError::new("User not found", 404));
    let h = harness(MockIdentity::new(), api);

    let err = h
        .bridge
        .sign_in("diver@example.com", "secret-pass")
        .await
        .expect_err("backend signin failure is fatal");

    match err {
        AuthError::BackendSignin {
            source,
            identity_signed_out,
        } => {
            assert_eq!(source.status, 404);
            assert!(identity_signed_out);
        }
        other => panic!("unexpected error: {:?}", other),
    }

    assert_eq!(h.identity.sign_outs.load(Ordering::SeqCst), 1);
    assert_eq!(h.identity.current_user(), None);
    assert_eq!(h.context.phase().await, SessionPhase::SignedOut);
    assert_eq!(h.api.session_info_calls.load(Ordering::SeqCst), 0);
    assert_eq!(h.store.get(BACKEND_USER_ID_KEY).await.unwrap(), None);
}

#[tokio::test]
async fn test_failed_automatic_sign_out_leaves_session_stranded() {
    let identity = MockIdentity::new();
    identity.fail_sign_out.store(true, Ordering::SeqCst);
    let api = MockApi::default();
    *api.signin_error.lock().unwrap() = Some(ApiError::new("Internal error", 500));
    let h = harness(identity, api);

    let err = h
        .bridge
        .sign_in("diver@example.com", "secret-pass")
        .await
        .expect_err("backend signin failure is fatal");

    assert!(matches!(
        err,
        AuthError::BackendSignin {
            identity_signed_out: false,
            ..
        }
    ));
    assert!(err.requires_reauthentication());
    assert_eq!(h.context.phase().await, SessionPhase::Stranded);
}

#[tokio::test]
async fn test_failed_signin_does_not_revive_previous_backend_session() {
    let store = Arc::new(MemoryStore::new());
    store.set(BACKEND_USER_ID_KEY, "old-user").await.unwrap();
    let context = Arc::new(SessionContext::restore(store.clone()).await.unwrap());

    let identity = Arc::new(MockIdentity::new());
    identity.fail_sign_out.store(true, Ordering::SeqCst);
    let api = MockApi::default();
    *api.signin_error.lock().unwrap() = Some(ApiError::new("User not found", 404));
    let bridge = SessionBridge::new(identity.clone(), Arc::new(api), context.clone());

    bridge
        .sign_in("diver@example.com", "secret-pass")
        .await
        .expect_err("backend signin failure is fatal");

    assert_eq!(context.backend_user_id().await, None);
    assert_eq!(store.get(BACKEND_USER_ID_KEY).await.unwrap(), None);

    // Next start: the identity provider still reports the user
    let restarted = SessionContext::restore(store).await.unwrap();
    restarted.on_auth_state_changed(identity.current_user()).await;
    assert_ne!(restarted.phase().await, SessionPhase::Established);
    assert_eq!(
        check_access(&restarted, &Route::Trips).await,
        Access::Redirect(Route::Login)
    );
}

#[tokio::test]
async fn test_implausible_token_abandons_identity_login() {
    let identity = MockIdentity::new();
    *identity.token.lock().unwrap() = "short".to_string();
    let h = harness(identity, MockApi::default());

    let err = h
        .bridge
        .sign_in("diver@example.com", "secret-pass")
        .await
        .expect_err("short token is rejected");

    assert!(matches!(err, AuthError::InvalidToken { length: 5 }));
    assert_eq!(h.api.signin_calls.load(Ordering::SeqCst), 0);
    assert_eq!(h.identity.sign_outs.load(Ordering::SeqCst), 1);
    assert_eq!(h.context.phase().await, SessionPhase::SignedOut);
}

#[tokio::test]
async fn test_identity_failure_makes_no_backend_call() {
    let h = harness(MockIdentity::new(), MockApi::default());

    let err = h
        .bridge
        .sign_in("diver@example.com", "wrong-password")
        .await
        .expect_err("identity login fails");

    assert!(matches!(err, AuthError::Provider(_)));
    assert_eq!(h.api.signin_calls.load(Ordering::SeqCst), 0);
    assert_eq!(h.context.phase().await, SessionPhase::SignedOut);
}

#[tokio::test]
async fn test_invalid_email_is_rejected_locally() {
    let h = harness(MockIdentity::new(), MockApi::default());

    let err = h
        .bridge
        .sign_in("not-an-email", "secret-pass")
        .await
        .expect_err("validation fails");

    assert!(matches!(err, AuthError::Validation(_)));
    assert_eq!(h.identity.token_requests.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_register_calls_signup_with_fresh_token() {
    let h = harness(MockIdentity::new(), MockApi::default());
    let form = SignupForm {
        email: "ana.silva@example.com".to_string(),
        password: "correct horse".to_string(),
        confirm_password: "correct horse".to_string(),
        collection_id: " c1 ".to_string(),
        name: "Ana".to_string(),
        lastname: "Silva".to_string(),
    };

    let outcome = h.bridge.register(&form).await.expect("registration");

    assert_eq!(outcome.backend_user_id.as_deref(), Some("backend-42"));
    assert_eq!(h.api.signup_calls.load(Ordering::SeqCst), 1);
    assert_eq!(h.api.signin_calls.load(Ordering::SeqCst), 0);

    let requests = h.api.signup_requests.lock().unwrap();
    assert_eq!(requests[0].firebase_token, long_token('t'));
    assert_eq!(requests[0].collection_id, "c1");
    assert_eq!(
        h.identity.current_user().and_then(|u| u.display_name),
        Some("ana.silva".to_string())
    );
}

#[tokio::test]
async fn test_register_rejects_mismatched_passwords() {
    let h = harness(MockIdentity::new(), MockApi::default());
    let form = SignupForm {
        email: "ana.silva@example.com".to_string(),
        password: "correct horse".to_string(),
        confirm_password: "battery staple".to_string(),
        collection_id: "c1".to_string(),
        name: "Ana".to_string(),
        lastname: "Silva".to_string(),
    };

    let err = h.bridge.register(&form).await.expect_err("validation");
    assert!(matches!(err, AuthError::Validation(ref m) if m == "Passwords do not match"));
    assert_eq!(h.api.signup_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_invitation_token_only_with_identity_user() {
    let anonymous = harness(MockIdentity::new(), MockApi::default());
    anonymous
        .bridge
        .validate_invitation("c1")
        .await
        .expect("anonymous invitation check");
    assert_eq!(*anonymous.api.invitation_tokens.lock().unwrap(), vec![None]);

    let signed_in = harness(MockIdentity::signed_in(), MockApi::default());
    signed_in
        .bridge
        .validate_invitation("c1")
        .await
        .expect("authenticated invitation check");
    assert_eq!(
        *signed_in.api.invitation_tokens.lock().unwrap(),
        vec![Some(long_token('t'))]
    );
}

#[tokio::test]
async fn test_trips_use_backend_user_id() {
    let h = harness(MockIdentity::new(), MockApi::default());
    h.bridge
        .sign_in("diver@example.com", "secret-pass")
        .await
        .expect("sign in");

    h.bridge.trips().await.expect("trips");
    assert_eq!(
        *h.api.trips_user_ids.lock().unwrap(),
        vec![Some("backend-42".to_string())]
    );
}

#[tokio::test]
async fn test_sign_out_tears_down_session() {
    let h = harness(MockIdentity::new(), MockApi::default());
    h.bridge
        .sign_in("diver@example.com", "secret-pass")
        .await
        .expect("sign in");

    let navigation = h.bridge.sign_out().await.expect("sign out");

    assert_eq!(navigation.route, Route::Login);
    assert_eq!(h.identity.current_user(), None);
    assert_eq!(h.context.phase().await, SessionPhase::SignedOut);
    assert_eq!(h.store.get(BACKEND_USER_ID_KEY).await.unwrap(), None);
    assert_eq!(h.store.get(SESSION_INFO_KEY).await.unwrap(), None);
}
