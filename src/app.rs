//! Application state container
//!
//! [`ChatClient`] owns the sign-in state and the session store behind a
//! single async mutex, plus the gateway used to answer messages. The
//! presentation layer receives a `ChatClient` and never touches global
//! state. The lock is never held across the gateway call, so the store
//! stays usable (switching, renaming, deleting) while a reply is pending.

use crate::auth::{AuthState, User};
use crate::error::{Result, VairamError};
use crate::gateway::Gateway;
use crate::session::{ReplyOutcome, SessionStore};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Everything the presentation layer renders
#[derive(Debug, Clone)]
pub struct AppState {
    auth: AuthState,
    store: SessionStore,
}

impl AppState {
    pub fn auth(&self) -> &AuthState {
        &self.auth
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }
}

/// Shared handle to the application state and the gateway
///
/// Cloning is cheap; all clones see the same state.
#[derive(Clone)]
pub struct ChatClient {
    state: Arc<Mutex<AppState>>,
    gateway: Arc<dyn Gateway>,
}

impl ChatClient {
    /// Create a signed-out client
    pub fn new(gateway: Arc<dyn Gateway>, identity: User) -> Self {
        Self {
            state: Arc::new(Mutex::new(AppState {
                auth: AuthState::new(identity),
                store: SessionStore::new(),
            })),
            gateway,
        }
    }

    pub fn gateway(&self) -> &Arc<dyn Gateway> {
        &self.gateway
    }

    /// Sign in and make sure there is a session to talk in
    pub async fn login(&self) -> User {
        let mut state = self.state.lock().await;
        let user = state.auth.login();
        state.store.ensure_session();
        user
    }

    /// Sign out and drop every session
    pub async fn logout(&self) -> Option<User> {
        let mut state = self.state.lock().await;
        state.store.clear();
        state.auth.logout()
    }

    /// Run `f` against a consistent view of the state
    pub async fn read<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        let state = self.state.lock().await;
        f(&state)
    }

    async fn mutate<R>(
        &self,
        f: impl FnOnce(&mut SessionStore) -> std::result::Result<R, VairamError>,
    ) -> Result<R> {
        let mut state = self.state.lock().await;
        if !state.auth.is_authenticated() {
            return Err(VairamError::NotAuthenticated.into());
        }
        Ok(f(&mut state.store)?)
    }

    /// Create a session and make it active; returns its id
    pub async fn create_session(&self) -> Result<String> {
        self.mutate(|store| Ok(store.create_session())).await
    }

    pub async fn rename_session(&self, id: &str, title: &str) -> Result<()> {
        self.mutate(|store| store.rename_session(id, title)).await
    }

    pub async fn delete_session(&self, id: &str) -> Result<()> {
        self.mutate(|store| store.delete_session(id)).await
    }

    pub async fn select_session(&self, id: &str) -> Result<()> {
        self.mutate(|store| store.select_session(id)).await
    }

    /// Clear and return the last gateway failure
    pub async fn acknowledge_error(&self) -> Option<String> {
        self.state.lock().await.store.acknowledge_error()
    }

    /// Send a message in the active session and wait for the reply
    ///
    /// The user message is appended before the gateway is called. The reply
    /// (or the apology, on failure) goes to the session the message was sent
    /// from, whichever session is active by then.
    ///
    /// # Errors
    ///
    /// Fails without calling the gateway when signed out, when the content
    /// is blank, when nothing is active, or when the session is already
    /// waiting for a reply. Gateway failures are not errors here; they
    /// produce [`ReplyOutcome::Apologized`].
    pub async fn send_message(&self, content: &str) -> Result<ReplyOutcome> {
        let pending = self.mutate(|store| store.begin_send(content)).await?;

        let reply = self
            .gateway
            .generate_reply(&pending.history, pending.text())
            .await;

        let mut state = self.state.lock().await;
        Ok(state.store.complete_send(pending, reply))
    }
}
