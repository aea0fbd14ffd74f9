//! Special commands parser for interactive chat mode
//!
//! This module parses the slash commands that can be entered during an
//! interactive chat session. Special commands allow users to:
//! - Create, list, switch, rename and delete sessions
//! - Show the active session history and client status
//! - Ask one of the sample questions
//! - Sign in and out
//! - Display help information and exit
//!
//! Command keywords are case-insensitive; arguments keep their case.

use crate::commands::render::SUGGESTIONS;
use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command was given an unsupported argument
    #[error("Unsupported argument for {command}: {arg}\n\nType '/help' to see valid usage")]
    UnsupportedArgument { command: String, arg: String },

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },
}

/// Reference to a session typed by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionRef {
    /// 1-based position in the session list, as printed by `/list`
    Index(usize),
    /// Full session id
    Id(String),
}

impl SessionRef {
    /// Resolve against the ordered session ids
    ///
    /// Ids are returned as typed even if unknown; the store reports those.
    /// Returns `None` for an out-of-range index.
    pub fn resolve(&self, ids: &[&str]) -> Option<String> {
        match self {
            Self::Index(n) => ids.get(n.checked_sub(1)?).map(|id| id.to_string()),
            Self::Id(id) => Some(id.clone()),
        }
    }
}

/// Special commands that can be executed during interactive chat
///
/// These commands act on the client state or print information rather than
/// being sent to the assistant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Start a new conversation and make it active
    NewSession,

    /// Show all sessions, newest first
    ListSessions,

    /// Make another session active
    Switch(SessionRef),

    /// Rename the active session
    Rename(String),

    /// Delete a session (the active one when no argument is given)
    Delete(Option<SessionRef>),

    /// Send one of the numbered sample questions (1-based)
    Suggest(usize),

    /// Reprint every message of the active session
    History,

    /// Show model, session and loading status
    ShowStatus,

    /// Show the signed-in user
    WhoAmI,

    /// Sign in with the configured identity
    Login,

    /// Sign out; all sessions are discarded
    Logout,

    /// Display help information
    Help,

    /// Exit the interactive session
    Exit,

    /// Not a special command
    ///
    /// The input should be sent as a chat message.
    None,
}

fn parse_session_ref(command: &str, arg: &str) -> Result<SessionRef, CommandError> {
    match arg.parse::<usize>() {
        Ok(0) => Err(CommandError::UnsupportedArgument {
            command: command.to_string(),
            arg: arg.to_string(),
        }),
        Ok(n) => Ok(SessionRef::Index(n)),
        Err(_) => Ok(SessionRef::Id(arg.to_string())),
    }
}

fn parse_suggestion(arg: &str) -> Result<SpecialCommand, CommandError> {
    match arg.parse::<usize>() {
        Ok(n) if (1..=SUGGESTIONS.len()).contains(&n) => Ok(SpecialCommand::Suggest(n)),
        _ => Err(CommandError::UnsupportedArgument {
            command: "/suggest".to_string(),
            arg: arg.to_string(),
        }),
    }
}

fn no_argument(
    command: &str,
    arg: &str,
    cmd: SpecialCommand,
) -> Result<SpecialCommand, CommandError> {
    if arg.is_empty() {
        Ok(cmd)
    } else {
        Err(CommandError::UnsupportedArgument {
            command: command.to_string(),
            arg: arg.to_string(),
        })
    }
}

/// Parse a user input string into a special command
///
/// # Returns
///
/// Returns Ok(SpecialCommand) for valid commands or SpecialCommand::None for
/// regular chat text.
///
/// # Errors
///
/// Returns CommandError::UnknownCommand if input starts with "/" but is not a valid command.
/// Returns CommandError::UnsupportedArgument if a command receives an invalid argument.
/// Returns CommandError::MissingArgument if a command requires an argument but none was provided.
///
/// # Examples
///
/// ```
/// use vairam::commands::special_commands::{parse_special_command, SessionRef, SpecialCommand};
///
/// assert_eq!(parse_special_command("/NEW").unwrap(), SpecialCommand::NewSession);
/// assert_eq!(
///     parse_special_command("/switch 2").unwrap(),
///     SpecialCommand::Switch(SessionRef::Index(2))
/// );
/// assert_eq!(parse_special_command("hello").unwrap(), SpecialCommand::None);
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let (keyword, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((keyword, rest)) => (keyword, rest.trim()),
        None => (trimmed, ""),
    };
    let keyword = keyword.to_lowercase();

    // Bare exit/quit also work without the slash
    if !trimmed.starts_with('/') {
        return match keyword.as_str() {
            "exit" | "quit" if arg.is_empty() => Ok(SpecialCommand::Exit),
            _ => Ok(SpecialCommand::None),
        };
    }

    match keyword.as_str() {
        "/new" => no_argument("/new", arg, SpecialCommand::NewSession),
        "/list" | "/sessions" => no_argument("/list", arg, SpecialCommand::ListSessions),

        "/switch" if arg.is_empty() => Err(CommandError::MissingArgument {
            command: "/switch".to_string(),
            usage: "/switch <number|id>".to_string(),
        }),
        "/switch" => parse_session_ref("/switch", arg).map(SpecialCommand::Switch),

        "/rename" if arg.is_empty() => Err(CommandError::MissingArgument {
            command: "/rename".to_string(),
            usage: "/rename <title>".to_string(),
        }),
        "/rename" => Ok(SpecialCommand::Rename(arg.to_string())),

        "/delete" if arg.is_empty() => Ok(SpecialCommand::Delete(None)),
        "/delete" => parse_session_ref("/delete", arg).map(|r| SpecialCommand::Delete(Some(r))),

        "/suggest" if arg.is_empty() => Err(CommandError::MissingArgument {
            command: "/suggest".to_string(),
            usage: format!("/suggest <1-{}>", SUGGESTIONS.len()),
        }),
        "/suggest" => parse_suggestion(arg),

        "/history" => no_argument("/history", arg, SpecialCommand::History),
        "/status" => no_argument("/status", arg, SpecialCommand::ShowStatus),
        "/whoami" => no_argument("/whoami", arg, SpecialCommand::WhoAmI),
        "/login" => no_argument("/login", arg, SpecialCommand::Login),
        "/logout" => no_argument("/logout", arg, SpecialCommand::Logout),
        "/help" | "/?" => Ok(SpecialCommand::Help),
        "/exit" | "/quit" => Ok(SpecialCommand::Exit),

        _ => Err(CommandError::UnknownCommand(keyword)),
    }
}

/// Help text for special commands
pub const HELP_TEXT: &str = r#"
Special Commands for Interactive Chat Mode
===========================================

SESSIONS:
  /new              - Start a new conversation
  /list             - List conversations, newest first
  /sessions         - Same as /list
  /switch <n|id>    - Switch to conversation number n (from /list) or by id
  /rename <title>   - Rename the current conversation
  /delete [n|id]    - Delete a conversation (default: the current one)
  /history          - Show every message of the current conversation
  /suggest <n>      - Ask sample question n (listed in an empty conversation)

ACCOUNT:
  /whoami           - Show the signed-in user
  /login            - Sign in
  /logout           - Sign out (all conversations are discarded)

SESSION INFORMATION:
  /status           - Show model, conversation and loading status
  /help             - Show this help message
  /?                - Same as /help

SESSION CONTROL:
  exit              - Exit interactive mode
  quit              - Same as exit

NOTES:
  - Commands are case-insensitive
  - Regular text (not starting with /) is sent to the assistant
  - Conversations live in memory only and are lost on exit
"#;

/// Display help text for special commands
pub fn print_help() {
    println!("{}", HELP_TEXT);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_new_session() {
        assert_eq!(
            parse_special_command("/new").unwrap(),
            SpecialCommand::NewSession
        );
    }

    #[test]
    fn test_parse_list_aliases() {
        assert_eq!(
            parse_special_command("/list").unwrap(),
            SpecialCommand::ListSessions
        );
        assert_eq!(
            parse_special_command("/sessions").unwrap(),
            SpecialCommand::ListSessions
        );
    }

    #[test]
    fn test_parse_switch_by_index() {
        assert_eq!(
            parse_special_command("/switch 3").unwrap(),
            SpecialCommand::Switch(SessionRef::Index(3))
        );
    }

    #[test]
    fn test_parse_switch_by_id_keeps_case() {
        assert_eq!(
            parse_special_command("/SWITCH chat_01HABCdef").unwrap(),
            SpecialCommand::Switch(SessionRef::Id("chat_01HABCdef".to_string()))
        );
    }

    #[test]
    fn test_parse_switch_without_argument() {
        let result = parse_special_command("/switch");
        assert!(matches!(
            result,
            Err(CommandError::MissingArgument { command, .. }) if command == "/switch"
        ));
    }

    #[test]
    fn test_parse_switch_zero_is_unsupported() {
        let result = parse_special_command("/switch 0");
        assert!(matches!(
            result,
            Err(CommandError::UnsupportedArgument { arg, .. }) if arg == "0"
        ));
    }

    #[test]
    fn test_parse_rename_keeps_full_title() {
        assert_eq!(
            parse_special_command("/rename   Trip to Paris  ").unwrap(),
            SpecialCommand::Rename("Trip to Paris".to_string())
        );
    }

    #[test]
    fn test_parse_rename_without_title() {
        assert!(matches!(
            parse_special_command("/rename"),
            Err(CommandError::MissingArgument { .. })
        ));
    }

    #[test]
    fn test_parse_delete_defaults_to_active() {
        assert_eq!(
            parse_special_command("/delete").unwrap(),
            SpecialCommand::Delete(None)
        );
        assert_eq!(
            parse_special_command("/delete 2").unwrap(),
            SpecialCommand::Delete(Some(SessionRef::Index(2)))
        );
    }

    #[test]
    fn test_parse_suggest() {
        assert_eq!(
            parse_special_command("/suggest 2").unwrap(),
            SpecialCommand::Suggest(2)
        );
        assert_eq!(
            parse_special_command("/Suggest 4").unwrap(),
            SpecialCommand::Suggest(4)
        );
    }

    #[test]
    fn test_parse_suggest_without_number() {
        assert!(matches!(
            parse_special_command("/suggest"),
            Err(CommandError::MissingArgument { command, usage }) if command == "/suggest" && usage == "/suggest <1-4>"
        ));
    }

    #[test]
    fn test_parse_suggest_out_of_range_or_not_a_number() {
        for arg in ["0", "5", "two"] {
            let result = parse_special_command(&format!("/suggest {}", arg));
            assert_eq!(
                result,
                Err(CommandError::UnsupportedArgument {
                    command: "/suggest".to_string(),
                    arg: arg.to_string(),
                })
            );
        }
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(
            parse_special_command("/history").unwrap(),
            SpecialCommand::History
        );
        assert_eq!(
            parse_special_command("/status").unwrap(),
            SpecialCommand::ShowStatus
        );
        assert_eq!(
            parse_special_command("/whoami").unwrap(),
            SpecialCommand::WhoAmI
        );
        assert_eq!(
            parse_special_command("/login").unwrap(),
            SpecialCommand::Login
        );
        assert_eq!(
            parse_special_command("/logout").unwrap(),
            SpecialCommand::Logout
        );
    }

    #[test]
    fn test_parse_help_aliases() {
        assert_eq!(parse_special_command("/help").unwrap(), SpecialCommand::Help);
        assert_eq!(parse_special_command("/?").unwrap(), SpecialCommand::Help);
    }

    #[test]
    fn test_parse_exit_forms() {
        for input in ["exit", "quit", "/exit", "/quit", "EXIT"] {
            assert_eq!(parse_special_command(input).unwrap(), SpecialCommand::Exit);
        }
    }

    #[test]
    fn test_sentence_starting_with_exit_is_a_message() {
        assert_eq!(
            parse_special_command("exit strategies for startups").unwrap(),
            SpecialCommand::None
        );
    }

    #[test]
    fn test_parse_regular_text_returns_none() {
        assert_eq!(
            parse_special_command("Explain quantum computing").unwrap(),
            SpecialCommand::None
        );
    }

    #[test]
    fn test_parse_argument_on_bare_command_is_unsupported() {
        assert!(matches!(
            parse_special_command("/new now"),
            Err(CommandError::UnsupportedArgument { command, arg }) if command == "/new" && arg == "now"
        ));
    }

    #[test]
    fn test_parse_unknown_command_returns_error() {
        let result = parse_special_command("/frobnicate please");
        assert_eq!(
            result,
            Err(CommandError::UnknownCommand("/frobnicate".to_string()))
        );
    }

    #[test]
    fn test_session_ref_resolve() {
        let ids = ["chat_c", "chat_b", "chat_a"];
        assert_eq!(
            SessionRef::Index(2).resolve(&ids),
            Some("chat_b".to_string())
        );
        assert_eq!(SessionRef::Index(4).resolve(&ids), None);
        assert_eq!(SessionRef::Index(0).resolve(&ids), None);
        assert_eq!(
            SessionRef::Id("chat_zz".to_string()).resolve(&ids),
            Some("chat_zz".to_string())
        );
    }

    #[test]
    fn test_help_text_lists_commands() {
        for cmd in ["/new", "/list", "/switch", "/rename", "/delete", "/suggest", "/logout"] {
            assert!(HELP_TEXT.contains(cmd), "help is missing {}", cmd);
        }
    }
}
