//! In-memory session store
//!
//! Owns the ordered session list (newest first), the active session id and
//! the global loading flag. Every mutator reports failure explicitly instead
//! of silently doing nothing.
//!
//! Sending is split in two so the gateway call can run without holding the
//! store: [`SessionStore::begin_send`] performs the synchronous part and hands
//! back a [`PendingReply`]; [`SessionStore::complete_send`] folds the gateway
//! result back into the session it was started for.

use crate::error::VairamError;
use crate::gateway::FALLBACK_REPLY;
use crate::session::{ChatSession, LoadingState, Message};
use std::collections::HashSet;

/// Text appended as a model message when the gateway fails
pub const APOLOGY_MESSAGE: &str =
    "I apologize, but I encountered an error while processing your request. Please try again.";

type StoreResult<T> = std::result::Result<T, VairamError>;

/// A generation that has been started but not yet folded back
///
/// Carries the target session id so the reply lands in the session it was
/// asked from, even if the user switched sessions while waiting.
#[derive(Debug, Clone)]
pub struct PendingReply {
    /// Session the reply belongs to
    pub session_id: String,
    /// The user message appended by `begin_send`
    pub user_message: Message,
    /// Full ordered history, ending with `user_message`
    pub history: Vec<Message>,
}

impl PendingReply {
    /// Text of the new user turn
    pub fn text(&self) -> &str {
        &self.user_message.content
    }
}

/// What happened when a reply was folded back into the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyOutcome {
    /// The gateway answered; the model message was appended
    Delivered(Message),
    /// The gateway failed; the apology message was appended
    Apologized(Message),
    /// The target session no longer exists; nothing was applied
    Discarded,
}

impl ReplyOutcome {
    /// The appended message, if any
    pub fn message(&self) -> Option<&Message> {
        match self {
            Self::Delivered(message) | Self::Apologized(message) => Some(message),
            Self::Discarded => None,
        }
    }
}

/// Session collection plus active selection and loading flag
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Vec<ChatSession>,
    active_session_id: Option<String>,
    loading: LoadingState,
    in_flight: HashSet<String>,
    last_error: Option<String>,
}

impl SessionStore {
    /// Create an empty store (the signed-out state)
    pub fn new() -> Self {
        Self::default()
    }

    /// Sessions, newest first
    pub fn sessions(&self) -> &[ChatSession] {
        &self.sessions
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn session(&self, id: &str) -> Option<&ChatSession> {
        self.sessions.iter().find(|s| s.id() == id)
    }

    fn session_mut(&mut self, id: &str) -> Option<&mut ChatSession> {
        self.sessions.iter_mut().find(|s| s.id() == id)
    }

    pub fn active_session_id(&self) -> Option<&str> {
        self.active_session_id.as_deref()
    }

    pub fn active_session(&self) -> Option<&ChatSession> {
        self.active_session_id
            .as_deref()
            .and_then(|id| self.session(id))
    }

    pub fn loading_state(&self) -> LoadingState {
        self.loading
    }

    /// Whether a reply is currently being generated for `session_id`
    pub fn is_in_flight(&self, session_id: &str) -> bool {
        self.in_flight.contains(session_id)
    }

    /// Reason of the most recent gateway failure, until acknowledged
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Clear and return the last gateway failure
    pub fn acknowledge_error(&mut self) -> Option<String> {
        self.last_error.take()
    }

    /// Insert a fresh session at the front and make it active
    ///
    /// Returns the new session id.
    pub fn create_session(&mut self) -> String {
        let session = ChatSession::new();
        let id = session.id().to_string();
        self.sessions.insert(0, session);
        self.active_session_id = Some(id.clone());
        tracing::debug!(session_id = %id, "Created session");
        id
    }

    /// Create a session only if there are none (used on sign-in)
    pub fn ensure_session(&mut self) -> String {
        if let Some(active) = self.active_session() {
            return active.id().to_string();
        }
        match self.sessions.first().map(|s| s.id().to_string()) {
            Some(id) => {
                self.active_session_id = Some(id.clone());
                id
            }
            None => self.create_session(),
        }
    }

    /// Replace the title of a session
    ///
    /// # Errors
    ///
    /// `InvalidTitle` if the title is blank, `SessionNotFound` if no session
    /// has the given id.
    pub fn rename_session(&mut self, id: &str, title: &str) -> StoreResult<()> {
        let title = title.trim();
        if title.is_empty() {
            return Err(VairamError::InvalidTitle);
        }
        let session = self
            .session_mut(id)
            .ok_or_else(|| VairamError::SessionNotFound(id.to_string()))?;
        session.set_title(title);
        tracing::debug!(session_id = %id, title = %title, "Renamed session");
        Ok(())
    }

    /// Remove a session
    ///
    /// Deleting the last session immediately creates and activates a
    /// replacement. Deleting the active session otherwise activates the first
    /// remaining one. A generation still in flight for the deleted session is
    /// forgotten; its reply will be discarded.
    ///
    /// # Errors
    ///
    /// `SessionNotFound` if no session has the given id.
    pub fn delete_session(&mut self, id: &str) -> StoreResult<()> {
        let index = self
            .sessions
            .iter()
            .position(|s| s.id() == id)
            .ok_or_else(|| VairamError::SessionNotFound(id.to_string()))?;
        self.sessions.remove(index);
        self.in_flight.remove(id);
        tracing::debug!(session_id = %id, remaining = self.sessions.len(), "Deleted session");

        if self.sessions.is_empty() {
            self.create_session();
        } else if self.active_session_id.as_deref() == Some(id)
            || self.active_session().is_none()
        {
            self.active_session_id = Some(self.sessions[0].id().to_string());
        }
        self.settle_loading();
        Ok(())
    }

    /// Make a session the active one
    ///
    /// # Errors
    ///
    /// `SessionNotFound` if no session has the given id.
    pub fn select_session(&mut self, id: &str) -> StoreResult<()> {
        if self.session(id).is_none() {
            return Err(VairamError::SessionNotFound(id.to_string()));
        }
        self.active_session_id = Some(id.to_string());
        tracing::debug!(session_id = %id, "Selected session");
        Ok(())
    }

    /// Synchronous half of sending a message
    ///
    /// Appends the user message to the active session (setting the title if
    /// it is the first one), marks the session in flight, switches the
    /// loading flag to `Thinking` and returns the history to send.
    ///
    /// # Errors
    ///
    /// `EmptyMessage` for blank content, `NoActiveSession` when nothing is
    /// active, `GenerationInFlight` when the active session is already
    /// waiting for a reply.
    pub fn begin_send(&mut self, content: &str) -> StoreResult<PendingReply> {
        if content.trim().is_empty() {
            return Err(VairamError::EmptyMessage);
        }
        let session_id = self
            .active_session_id
            .clone()
            .ok_or(VairamError::NoActiveSession)?;
        if self.in_flight.contains(&session_id) {
            return Err(VairamError::GenerationInFlight(session_id));
        }

        let user_message = Message::user(content);
        let session = self
            .session_mut(&session_id)
            .ok_or(VairamError::NoActiveSession)?;
        session.push_message(user_message.clone());
        let history = session.messages().to_vec();

        self.in_flight.insert(session_id.clone());
        self.last_error = None;
        self.loading = LoadingState::Thinking;
        tracing::info!(
            session_id = %session_id,
            history_len = history.len(),
            "Sending message"
        );

        Ok(PendingReply {
            session_id,
            user_message,
            history,
        })
    }

    /// Asynchronous half of sending a message
    ///
    /// Appends the model reply (or the apology on failure) to the session
    /// the request was made from. If that session was deleted meanwhile the
    /// result is dropped. The loading flag returns to `Idle` once no session
    /// is waiting.
    pub fn complete_send(
        &mut self,
        pending: PendingReply,
        reply: crate::error::Result<String>,
    ) -> ReplyOutcome {
        let session_id = pending.session_id;
        let was_pending = self.in_flight.remove(&session_id);

        if !was_pending || self.session(&session_id).is_none() {
            tracing::info!(session_id = %session_id, "Discarding reply for removed session");
            self.settle_loading();
            return ReplyOutcome::Discarded;
        }

        let outcome = match reply {
            Ok(text) => {
                let text = if text.is_empty() {
                    FALLBACK_REPLY.to_string()
                } else {
                    text
                };
                ReplyOutcome::Delivered(Message::model(text))
            }
            Err(err) => {
                tracing::error!(session_id = %session_id, error = %err, "Gateway call failed");
                self.last_error = Some(err.to_string());
                self.loading = LoadingState::Error;
                ReplyOutcome::Apologized(Message::apology(APOLOGY_MESSAGE))
            }
        };

        if let (Some(session), Some(message)) = (self.session_mut(&session_id), outcome.message())
        {
            session.push_message(message.clone());
        }
        self.settle_loading();
        outcome
    }

    /// Drop every session (sign-out)
    pub fn clear(&mut self) {
        self.sessions.clear();
        self.active_session_id = None;
        self.in_flight.clear();
        self.last_error = None;
        self.loading = LoadingState::Idle;
    }

    fn settle_loading(&mut self) {
        self.loading = if self.in_flight.is_empty() {
            LoadingState::Idle
        } else {
            LoadingState::Thinking
        };
    }
}
