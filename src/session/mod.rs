//! Conversation data model
//!
//! Messages, sessions and the store-wide loading flag. Sessions and messages
//! are plain data; the only behavior here is construction, id generation and
//! the first-message title rule.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Mutex;
use ulid::{Generator, Ulid};

pub mod store;

pub use store::{PendingReply, ReplyOutcome, SessionStore, APOLOGY_MESSAGE};

/// Title given to every freshly created session
pub const DEFAULT_SESSION_TITLE: &str = "New Conversation";

/// Maximum number of characters taken from the first message for a title
pub const TITLE_MAX_CHARS: usize = 30;

/// Marker appended to a title that was truncated
pub const TITLE_ELLIPSIS: &str = "...";

static ID_GENERATOR: Mutex<Option<Generator>> = Mutex::new(None);

/// Produce a process-unique, time-ordered identifier
///
/// Uses a monotonic ULID generator so two ids created in the same
/// millisecond still differ and still sort in creation order.
fn next_ulid() -> Ulid {
    let mut guard = ID_GENERATOR
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    let generator = guard.get_or_insert_with(Generator::new);
    generator.generate().unwrap_or_else(|_| Ulid::new())
}

/// Author of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Typed by the signed-in user
    User,
    /// Produced by the language model (including fallback and apology text)
    Model,
}

impl Role {
    /// Wire name used by the provider ("user" or "model")
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Model => "model",
        }
    }

    fn id_suffix(&self) -> &'static str {
        match self {
            Self::User => "u",
            Self::Model => "b",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single chat message
///
/// Content is fixed at creation; sessions only ever append messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unique identifier, never reused
    pub id: String,
    /// Who wrote the message
    pub role: Role,
    /// Message text
    pub content: String,
    /// Creation instant
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a message stamped with the current time
    ///
    /// # Examples
    ///
    /// ```
    /// use vairam::session::{Message, Role};
    ///
    /// let msg = Message::new(Role::User, "Hello");
    /// assert_eq!(msg.role, Role::User);
    /// assert!(msg.id.ends_with("_u"));
    /// ```
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self::with_suffix(role, role.id_suffix(), content)
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create a model message
    pub fn model(content: impl Into<String>) -> Self {
        Self::new(Role::Model, content)
    }

    /// Create the model-role apology appended after a failed generation
    pub fn apology(content: impl Into<String>) -> Self {
        Self::with_suffix(Role::Model, "err", content)
    }

    fn with_suffix(role: Role, suffix: &str, content: impl Into<String>) -> Self {
        Self {
            id: format!("msg_{}_{}", next_ulid(), suffix),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// A conversation thread with its own history and title
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    id: String,
    title: String,
    messages: Vec<Message>,
    created_at: DateTime<Utc>,
}

impl ChatSession {
    /// Create an empty session titled "New Conversation"
    pub fn new() -> Self {
        Self {
            id: format!("chat_{}", next_ulid()),
            title: DEFAULT_SESSION_TITLE.to_string(),
            messages: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub(crate) fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Append a message to the end of the history
    ///
    /// The first user message of a session also becomes its title (see
    /// [`title_from_content`]). Timestamps are clamped so they never go
    /// backwards within one session.
    pub(crate) fn push_message(&mut self, mut message: Message) {
        if let Some(last) = self.messages.last() {
            if message.timestamp < last.timestamp {
                message.timestamp = last.timestamp;
            }
        } else if message.role == Role::User {
            self.title = title_from_content(&message.content);
        }
        self.messages.push(message);
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Derive a session title from the first message
///
/// Takes the first 30 characters and appends "..." only when something was
/// cut off.
///
/// # Examples
///
/// ```
/// use vairam::session::title_from_content;
///
/// assert_eq!(title_from_content("Hi"), "Hi");
/// assert_eq!(
///     title_from_content("Explain the theory of relativity like I'm 5"),
///     "Explain the theory of relativi..."
/// );
/// ```
pub fn title_from_content(content: &str) -> String {
    let mut chars = content.chars();
    let prefix: String = chars.by_ref().take(TITLE_MAX_CHARS).collect();
    if chars.next().is_some() {
        format!("{}{}", prefix, TITLE_ELLIPSIS)
    } else {
        prefix
    }
}

/// Store-wide generation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoadingState {
    /// No generation in flight
    #[default]
    Idle,
    /// Waiting for the gateway to answer
    Thinking,
    /// Reserved for token streaming; never entered
    Streaming,
    /// A generation just failed
    Error,
}

impl fmt::Display for LoadingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "IDLE"),
            Self::Thinking => write!(f, "THINKING"),
            Self::Streaming => write!(f, "STREAMING"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}
