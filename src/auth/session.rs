// Session state machine
// Process-wide session identity, derived from the stored tokens.

use std::sync::Arc;
use tokio::sync::RwLock;

use super::types::UserProfile;
use crate::api::auth as auth_api;
use crate::error::ApiError;
use crate::store::CredentialStore;
use crate::transport::ApiClient;

/// Current session state.
///
/// Starts in `Loading` and only moves through the explicit operations on
/// [`SessionContext`].
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Identity check in flight or not yet run
    Loading,
    /// No usable credentials
    Anonymous,
    /// Logged in with the given identity
    Authenticated(UserProfile),
}

/// Owner of the session lifecycle: establish, refresh and tear down a
/// session across one or all devices.
pub struct SessionContext {
    api: Arc<ApiClient>,
    store: Arc<CredentialStore>,
    state: RwLock<SessionState>,
}

impl SessionContext {
    pub fn new(api: Arc<ApiClient>, store: Arc<CredentialStore>) -> Self {
        Self {
            api,
            store,
            state: RwLock::new(SessionState::Loading),
        }
    }

    /// Run the startup identity check.
    ///
    /// Without an access token the session is anonymous. Otherwise the
    /// identity endpoint decides: any failure there (after the transport's
    /// silent renewal attempt) means the stored credentials are not worth
    /// keeping, so they are cleared.
    pub async fn bootstrap(&self) {
        if self.store.access().is_none() {
            self.set_state(SessionState::Anonymous).await;
            return;
        }
        self.load_profile().await;
    }

    /// Log in and establish a session.
    ///
    /// An exchange failure propagates unchanged; nothing is stored and the
    /// state does not move.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), ApiError> {
        let pair = auth_api::login(&self.api, email, password).await?;
        self.store.save(&pair);
        self.load_profile().await;
        Ok(())
    }

    /// Register a new account and establish a session
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<(), ApiError> {
        let pair = auth_api::register(&self.api, name, email, password).await?;
        self.store.save(&pair);
        self.load_profile().await;
        Ok(())
    }

    /// Tear down the session on this device.
    ///
    /// The server is notified best-effort so it can invalidate the refresh
    /// token; local teardown proceeds regardless. A refresh exchange still
    /// in flight may re-populate the store after this returns; the next
    /// explicit logout clears it again.
    pub async fn logout(&self) {
        if let Some(refresh_token) = self.store.refresh() {
            if let Err(e) = auth_api::logout(&self.api, &refresh_token).await {
                tracing::warn!("Server-side logout failed, proceeding with local teardown: {}", e);
            }
        }
        self.store.clear();
        self.set_state(SessionState::Anonymous).await;
    }

    /// Tear down the session on every device.
    ///
    /// Requests server-side invalidation of all refresh tokens for the
    /// account; local teardown is unconditional so the client never keeps
    /// tokens it believes may be globally revoked.
    pub async fn logout_all(&self) {
        if let Err(e) = auth_api::logout_all(&self.api).await {
            tracing::warn!(
                "Global session invalidation failed, tearing down locally anyway: {}",
                e
            );
        }
        self.store.clear();
        self.set_state(SessionState::Anonymous).await;
    }

    /// Re-query the identity endpoint without touching tokens.
    ///
    /// Used to reconcile the local profile after an external mutation. On
    /// failure the previous state and the stored tokens are kept and the
    /// error is returned to the caller.
    pub async fn refresh_profile(&self) -> Result<(), ApiError> {
        let profile = auth_api::me(&self.api).await?;
        self.set_state(SessionState::Authenticated(profile)).await;
        Ok(())
    }

    /// Current state snapshot
    pub async fn state(&self) -> SessionState {
        self.state.read().await.clone()
    }

    /// Current user identity, if authenticated
    pub async fn user(&self) -> Option<UserProfile> {
        match &*self.state.read().await {
            SessionState::Authenticated(profile) => Some(profile.clone()),
            _ => None,
        }
    }

    /// Whether the identity check has not completed yet
    pub async fn is_loading(&self) -> bool {
        *self.state.read().await == SessionState::Loading
    }

    async fn load_profile(&self) {
        match auth_api::me(&self.api).await {
            Ok(profile) => {
                tracing::debug!(user_id = profile.id, "Identity loaded");
                self.set_state(SessionState::Authenticated(profile)).await;
            }
            Err(e) => {
                tracing::warn!("Identity fetch failed, tearing down session: {}", e);
                self.store.clear();
                self.set_state(SessionState::Anonymous).await;
            }
        }
    }

    async fn set_state(&self, next: SessionState) {
        let mut state = self.state.write().await;
        *state = next;
    }
}
