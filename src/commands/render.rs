//! Terminal rendering for the chat client
//!
//! Everything here builds a `String`; printing is left to the caller so the
//! output can be tested without a terminal.

use crate::app::AppState;
use crate::auth::User;
use crate::config::ChatConfig;
use crate::session::{ChatSession, LoadingState, Message, Role};
use chrono::{DateTime, Local, Utc};
use colored::Colorize;
use prettytable::{format, row, Table};

/// Sample questions offered while a conversation is empty
pub const SUGGESTIONS: [&str; 4] = [
    "Plan a 3-day itinerary for Paris",
    "Explain the theory of relativity like I'm 5",
    "Write a React component for a Todo List",
    "Draft a professional email to a recruiter",
];

/// Numbered sample questions with a hint on how to pick one
pub fn suggestion_list() -> String {
    let mut out = String::from("Try asking:\n");
    for (index, suggestion) in SUGGESTIONS.iter().enumerate() {
        out.push_str(&format!("  {}. {}\n", index + 1, suggestion));
    }
    out.push_str(&format!("{}\n", "Type '/suggest <n>' to ask one.".dimmed()));
    out
}

/// Local wall-clock time of a message, `HH:MM`
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.with_timezone(&Local).format("%H:%M").to_string()
}

/// Render one message as a labelled, indented bubble
///
/// # Examples
///
/// ```
/// use vairam::commands::render::message_bubble;
/// use vairam::config::ChatConfig;
/// use vairam::session::Message;
///
/// let bubble = message_bubble(&Message::model("Hello!"), "Alex", &ChatConfig::default());
/// assert!(bubble.contains("VAIRAM AI"));
/// assert!(bubble.contains("Hello!"));
/// ```
pub fn message_bubble(message: &Message, user_name: &str, chat: &ChatConfig) -> String {
    let label = match message.role {
        Role::User => user_name.green().bold(),
        Role::Model => chat.assistant_name.cyan().bold(),
    };

    let mut out = format!("{}", label);
    if chat.show_timestamps {
        out.push_str(&format!(" {}", format_timestamp(message.timestamp).dimmed()));
    }
    out.push('\n');
    for line in message.content.lines() {
        out.push_str("    ");
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Render a whole session, or a placeholder when it has no messages yet
pub fn session_transcript(session: &ChatSession, user_name: &str, chat: &ChatConfig) -> String {
    if session.is_empty() {
        return format!(
            "{}\n\n{}",
            "No messages yet. How can I help you today?".yellow(),
            suggestion_list()
        );
    }
    session
        .messages()
        .iter()
        .map(|m| message_bubble(m, user_name, chat))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Session list as a table: number, active marker, title, size, creation time
pub fn session_table(sessions: &[ChatSession], active_id: Option<&str>) -> String {
    if sessions.is_empty() {
        return format!("{}\n", "No conversations.".yellow());
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.set_titles(row!["#", "", "Title", "Messages", "Created"]);

    for (index, session) in sessions.iter().enumerate() {
        let marker = if Some(session.id()) == active_id {
            "*"
        } else {
            ""
        };
        let created = session
            .created_at()
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
            .to_string();
        table.add_row(row![
            index + 1,
            marker,
            session.title(),
            session.messages().len(),
            created
        ]);
    }

    table.to_string()
}

/// REPL prompt showing the active session title
pub fn prompt(title: Option<&str>) -> String {
    match title {
        Some(title) => format!("{} >> ", format!("[{}]", title).cyan()),
        None => format!("{} >> ", "[signed out]".red()),
    }
}

pub fn thinking_indicator(assistant_name: &str) -> String {
    format!("{}", format!("{} is thinking...", assistant_name).dimmed())
}

/// Banner shown when the interactive client starts
pub fn welcome_banner(user: &User, assistant_name: &str, model: &str) -> String {
    let mut out = String::new();
    out.push_str("\n╔══════════════════════════════════════════════════════════════╗\n");
    out.push_str("║                 VAIRAM Chat - Welcome!                       ║\n");
    out.push_str("╚══════════════════════════════════════════════════════════════╝\n\n");
    out.push_str(&format!("Signed in as: {} <{}>\n", user.name.green(), user.email));
    out.push_str(&format!("Assistant:    {} ({})\n", assistant_name.cyan(), model));
    out.push_str("Type '/help' for available commands, 'exit' to quit\n\n");
    out.push_str(&suggestion_list());
    out
}

/// Status block for `/status`
pub fn status_text(state: &AppState, model: &str) -> String {
    let store = state.store();
    let user = state
        .auth()
        .user()
        .map(|u| u.name.clone())
        .unwrap_or_else(|| "(signed out)".to_string());
    let active = store
        .active_session()
        .map(|s| format!("{} ({} messages)", s.title(), s.messages().len()))
        .unwrap_or_else(|| "(none)".to_string());
    let loading = match store.loading_state() {
        LoadingState::Idle => store.loading_state().to_string().green(),
        LoadingState::Error => store.loading_state().to_string().red(),
        _ => store.loading_state().to_string().yellow(),
    };

    let mut out = String::new();
    out.push_str("\n╔══════════════════════════════════════════════════════════════╗\n");
    out.push_str("║                     VAIRAM Session Status                    ║\n");
    out.push_str("╚══════════════════════════════════════════════════════════════╝\n\n");
    out.push_str(&format!("User:          {}\n", user));
    out.push_str(&format!("Model:         {}\n", model));
    out.push_str(&format!("Conversations: {}\n", store.len()));
    out.push_str(&format!("Active:        {}\n", active));
    out.push_str(&format!("Loading:       {}\n", loading));
    if let Some(reason) = store.last_error() {
        out.push_str(&format!("Last error:    {}\n", reason.red()));
    }
    out
}

/// Identity block for `/whoami`
pub fn whoami_text(user: Option<&User>) -> String {
    match user {
        Some(user) => format!(
            "{}\n  id:     {}\n  email:  {}\n  avatar: {}\n",
            user.name.green().bold(),
            user.id,
            user.email,
            user.avatar_url
        ),
        None => format!("{}\n", "Not signed in. Type '/login' to sign in.".yellow()),
    }
}
