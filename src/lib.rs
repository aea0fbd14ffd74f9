//! VAIRAM - terminal chat client library
//!
//! This library provides the pieces of the VAIRAM chat client: an in-memory
//! multi-session conversation store, a gateway to a hosted language model
//! and a mock sign-in, tied together by a shared client handle.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `session`: Messages, sessions and the session store state machine
//! - `gateway`: Gateway abstraction and the Gemini implementation
//! - `auth`: Mock identity and sign-in state
//! - `app`: `ChatClient`, the shared state container
//! - `commands`: Interactive REPL, one-shot ask and terminal rendering
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use vairam::{ChatClient, Config};
//! use vairam::gateway::create_gateway;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     let client = ChatClient::new(create_gateway(&config.provider)?, config.user.identity());
//!     client.login().await;
//!     let outcome = client.send_message("Hello!").await?;
//!     println!("{:?}", outcome.message().map(|m| &m.content));
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod auth;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod gateway;
pub mod session;

// Re-export commonly used types
pub use app::{AppState, ChatClient};
pub use auth::User;
pub use config::Config;
pub use error::{Result, VairamError};
pub use gateway::{create_gateway, Gateway};
pub use session::{ChatSession, LoadingState, Message, ReplyOutcome, Role, SessionStore};

#[cfg(test)]
pub mod test_utils;
