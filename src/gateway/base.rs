//! Gateway trait and shared helpers
//!
//! A gateway turns a conversation history plus the newest user text into a
//! single generated reply. Implementations make exactly one request per call:
//! no retries, no partial tokens handed back to the caller.

use crate::error::Result;
use crate::session::{Message, Role};
use async_trait::async_trait;

/// Reply used when the provider answers successfully but with no text
pub const FALLBACK_REPLY: &str = "I couldn't generate a response.";

/// Boundary to an external language-model provider
///
/// # Examples
///
/// ```no_run
/// use vairam::gateway::Gateway;
/// use vairam::session::Message;
/// use vairam::error::Result;
/// use async_trait::async_trait;
///
/// struct Echo;
///
/// #[async_trait]
/// impl Gateway for Echo {
///     async fn generate_reply(&self, _history: &[Message], new_message: &str) -> Result<String> {
///         Ok(new_message.to_string())
///     }
/// }
/// ```
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Generate a reply to `new_message` given the ordered `history`
    ///
    /// # Arguments
    ///
    /// * `history` - Ordered messages of the session (usually ending with the
    ///   new user message)
    /// * `new_message` - Text of the newest user turn
    ///
    /// # Errors
    ///
    /// Returns `VairamError::Gateway` on any transport or provider failure
    async fn generate_reply(&self, history: &[Message], new_message: &str) -> Result<String>;

    /// Name of the model answering requests
    fn model(&self) -> String {
        "unknown".to_string()
    }
}

/// Build the ordered (role, text) turns sent to a provider
///
/// One turn per history message, role preserved. `new_message` is appended
/// as a final user turn unless the history already ends with exactly that
/// user message, so the newest turn is never sent twice.
///
/// # Examples
///
/// ```
/// use vairam::gateway::conversation_turns;
/// use vairam::session::{Message, Role};
///
/// let history = vec![Message::user("Hi")];
/// let turns = conversation_turns(&history, "Hi");
/// assert_eq!(turns, vec![(Role::User, "Hi")]);
/// ```
pub fn conversation_turns<'a>(history: &'a [Message], new_message: &'a str) -> Vec<(Role, &'a str)> {
    let mut turns: Vec<(Role, &str)> = history
        .iter()
        .map(|m| (m.role, m.content.as_str()))
        .collect();

    let already_last = matches!(
        history.last(),
        Some(last) if last.role == Role::User && last.content == new_message
    );
    if !already_last {
        turns.push((Role::User, new_message));
    }
    turns
}
