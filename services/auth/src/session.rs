//! Application session context
//!
//! One [`SessionContext`] is created at startup and shared by everything that
//! needs the current user. It is initialized from durable storage, updated by
//! the identity provider's auth-state callback, and torn down on logout.

use api::models::SessionInfo;
use common::{BACKEND_USER_ID_KEY, KeyValueStore, SESSION_INFO_KEY, StoreError};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use crate::{
    error::AuthResult,
    models::{IdentityUser, SessionPhase},
};

#[derive(Debug, Default)]
struct SessionState {
    user: Option<IdentityUser>,
    backend_user_id: Option<String>,
    session_info: Option<SessionInfo>,
    phase: SessionPhase,
}

/// Explicit session state shared across the application
pub struct SessionContext {
    store: Arc<dyn KeyValueStore>,
    state: RwLock<SessionState>,
}

impl SessionContext {
    /// Create an empty context over the given store
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            state: RwLock::new(SessionState::default()),
        }
    }

    /// Create a context with the persisted backend user id and session info
    ///
    /// The phase stays `SignedOut` until the identity provider reports a user.
    pub async fn restore(store: Arc<dyn KeyValueStore>) -> AuthResult<Self> {
        let backend_user_id = read_persisted(store.as_ref(), BACKEND_USER_ID_KEY)
            .await?
            .filter(|id| !id.is_empty());

        let session_info = match read_persisted(store.as_ref(), SESSION_INFO_KEY).await? {
            Some(raw) => match serde_json::from_str::<SessionInfo>(&raw) {
                Ok(info) => Some(info),
                Err(e) => {
                    warn!("Ignoring unreadable persisted session info: {}", e);
                    None
                }
            },
            None => None,
        };

        info!(
            has_backend_user = backend_user_id.is_some(),
            has_session_info = session_info.is_some(),
            "Session context restored"
        );

        Ok(Self {
            store,
            state: RwLock::new(SessionState {
                backend_user_id,
                session_info,
                ..Default::default()
            }),
        })
    }

    /// Identity provider auth-state callback
    pub async fn on_auth_state_changed(&self, user: Option<IdentityUser>) {
        let mut state = self.state.write().await;

        state.phase = match (&user, state.phase) {
            (None, _) => SessionPhase::SignedOut,
            (Some(_), SessionPhase::Stranded) => SessionPhase::Stranded,
            (Some(_), _) if state.backend_user_id.is_some() => SessionPhase::Established,
            (Some(_), _) => SessionPhase::Pending,
        };
        state.user = user;

        info!(phase = %state.phase, "Auth state changed");
    }

    /// Record a fresh identity login that has no backend session yet
    ///
    /// A backend session from an earlier login no longer counts.
    pub async fn begin(&self, user: IdentityUser) {
        let mut state = self.state.write().await;
        state.user = Some(user);
        state.backend_user_id = None;
        state.session_info = None;
        state.phase = SessionPhase::Pending;
    }

    /// Mark the backend session established and persist the backend user id
    ///
    /// The in-memory session is established even when persisting fails.
    pub async fn establish(&self, backend_user_id: Option<&str>) -> AuthResult<()> {
        {
            let mut state = self.state.write().await;
            state.backend_user_id = backend_user_id.map(str::to_string);
            state.phase = SessionPhase::Established;
        }

        match backend_user_id {
            Some(id) => self.store.set(BACKEND_USER_ID_KEY, id).await?,
            None => self.store.delete(BACKEND_USER_ID_KEY).await?,
        }

        info!("Backend session established");
        Ok(())
    }

    /// Keep session info in memory and persist it
    pub async fn store_session_info(&self, session_info: &SessionInfo) -> AuthResult<()> {
        self.state.write().await.session_info = Some(session_info.clone());

        let serialized = serde_json::to_string(session_info).map_err(common::StoreError::from)?;
        self.store.set(SESSION_INFO_KEY, &serialized).await?;
        Ok(())
    }

    /// Backend signin failed after identity login
    ///
    /// Any persisted backend session is dropped so a restart cannot revive it.
    pub async fn mark_stranded(&self) {
        {
            let mut state = self.state.write().await;
            state.backend_user_id = None;
            state.session_info = None;
            state.phase = SessionPhase::Stranded;
        }
        warn!("Session stranded: identity login without backend session");

        if let Err(e) = self.clear_persisted().await {
            error!("Failed to clear persisted session: {}", e);
        }
    }

    /// Clear the session from memory and durable storage
    pub async fn teardown(&self) -> AuthResult<()> {
        *self.state.write().await = SessionState::default();
        self.clear_persisted().await?;

        info!("Session torn down");
        Ok(())
    }

    async fn clear_persisted(&self) -> AuthResult<()> {
        let user_id = self.store.delete(BACKEND_USER_ID_KEY).await;
        let session_info = self.store.delete(SESSION_INFO_KEY).await;
        user_id?;
        session_info?;
        Ok(())
    }

    pub async fn phase(&self) -> SessionPhase {
        self.state.read().await.phase
    }

    pub async fn user(&self) -> Option<IdentityUser> {
        self.state.read().await.user.clone()
    }

    pub async fn backend_user_id(&self) -> Option<String> {
        self.state.read().await.backend_user_id.clone()
    }

    pub async fn session_info(&self) -> Option<SessionInfo> {
        self.state.read().await.session_info.clone()
    }
}

/// Read a persisted key, treating an unreadable store as empty
async fn read_persisted(store: &dyn KeyValueStore, key: &str) -> AuthResult<Option<String>> {
    match store.get(key).await {
        Ok(value) => Ok(value),
        Err(StoreError::Serialization(e)) => {
            warn!(key, "Ignoring unreadable session store: {}", e);
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}
