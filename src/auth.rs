//! Mock authentication
//!
//! There is no identity provider: signing in always yields the configured
//! identity. The state only tracks whether someone is signed in.

use serde::{Deserialize, Serialize};

/// Signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar_url: String,
}

/// Sign-in state
#[derive(Debug, Clone)]
pub struct AuthState {
    identity: User,
    current: Option<User>,
}

impl AuthState {
    /// Create a signed-out state that will hand out `identity` on login
    pub fn new(identity: User) -> Self {
        Self {
            identity,
            current: None,
        }
    }

    /// Sign in, returning the mock identity
    pub fn login(&mut self) -> User {
        let user = self.identity.clone();
        tracing::info!(user_id = %user.id, "Signed in");
        self.current = Some(user.clone());
        user
    }

    /// Sign out; returns the user that was signed in, if any
    pub fn logout(&mut self) -> Option<User> {
        let previous = self.current.take();
        if let Some(user) = &previous {
            tracing::info!(user_id = %user.id, "Signed out");
        }
        previous
    }

    pub fn user(&self) -> Option<&User> {
        self.current.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }
}
