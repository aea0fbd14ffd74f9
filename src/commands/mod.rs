/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

It exposes two top-level command modules:

- `chat` — Interactive chat client
- `ask`  — Send a single message and print the reply

Both build a gateway from the configuration, wrap it in a `ChatClient`
and sign in with the configured identity before doing anything else.
*/

use crate::app::ChatClient;
use crate::commands::special_commands::{print_help, CommandError, SessionRef, SpecialCommand};
use crate::config::{ChatConfig, Config};
use crate::error::{Result, VairamError};
use crate::gateway::create_gateway;
use crate::session::ReplyOutcome;
use colored::Colorize;

// Terminal rendering helpers
pub mod render;

// Slash command parser
pub mod special_commands;

/// Build a signed-in client from configuration
async fn signed_in_client(config: &Config) -> Result<ChatClient> {
    let gateway = create_gateway(&config.provider)?;
    let client = ChatClient::new(gateway, config.user.identity());
    client.login().await;
    Ok(client)
}

/// Turn a typed session reference into a session id
async fn resolve_session(client: &ChatClient, reference: &SessionRef) -> Result<String> {
    let resolved = client
        .read(|state| {
            let ids: Vec<&str> = state.store().sessions().iter().map(|s| s.id()).collect();
            reference.resolve(&ids)
        })
        .await;
    let id = resolved.ok_or_else(|| match reference {
        SessionRef::Index(n) => VairamError::SessionNotFound(format!("#{}", n)),
        SessionRef::Id(id) => VairamError::SessionNotFound(id.clone()),
    })?;
    Ok(id)
}

async fn active_session_id(client: &ChatClient) -> Result<String> {
    let active = client
        .read(|state| state.store().active_session_id().map(str::to_string))
        .await;
    Ok(active.ok_or(VairamError::NoActiveSession)?)
}

async fn active_transcript(client: &ChatClient, chat: &ChatConfig) -> String {
    client
        .read(|state| {
            let user_name = state.auth().user().map(|u| u.name.as_str()).unwrap_or("");
            match state.store().active_session() {
                Some(session) => format!(
                    "{}\n\n{}",
                    session.title().bold(),
                    render::session_transcript(session, user_name, chat)
                ),
                None => render::whoami_text(None),
            }
        })
        .await
}

/// Execute a special command and return the text to show
///
/// `Exit` and `None` are handled by the caller and produce no output here.
///
/// # Errors
///
/// Propagates store failures (unknown session, blank title, signed out) so
/// the REPL can report them.
pub async fn execute_special_command(
    client: &ChatClient,
    chat: &ChatConfig,
    command: SpecialCommand,
) -> Result<String> {
    match command {
        SpecialCommand::NewSession => {
            client.create_session().await?;
            Ok(format!("{}\n", "Started a new conversation.".green()))
        }
        SpecialCommand::ListSessions => Ok(client
            .read(|state| {
                render::session_table(state.store().sessions(), state.store().active_session_id())
            })
            .await),
        SpecialCommand::Switch(reference) => {
            let id = resolve_session(client, &reference).await?;
            client.select_session(&id).await?;
            Ok(active_transcript(client, chat).await)
        }
        SpecialCommand::Rename(title) => {
            let id = active_session_id(client).await?;
            client.rename_session(&id, &title).await?;
            Ok(format!(
                "{}\n",
                format!("Renamed conversation to '{}'.", title.trim()).green()
            ))
        }
        SpecialCommand::Delete(reference) => {
            let id = match reference {
                Some(reference) => resolve_session(client, &reference).await?,
                None => active_session_id(client).await?,
            };
            client.delete_session(&id).await?;
            Ok(format!("{}\n", "Conversation deleted.".green()))
        }
        SpecialCommand::Suggest(n) => {
            let prompt = n
                .checked_sub(1)
                .and_then(|i| render::SUGGESTIONS.get(i))
                .ok_or_else(|| CommandError::UnsupportedArgument {
                    command: "/suggest".to_string(),
                    arg: n.to_string(),
                })?;
            let mut out = format!("{} {}\n", "You asked:".dimmed(), prompt);
            match client.send_message(prompt).await? {
                ReplyOutcome::Delivered(message) => {
                    out.push_str(&format!("\n{}", render::message_bubble(&message, "", chat)));
                }
                ReplyOutcome::Apologized(message) => {
                    out.push_str(&format!("\n{}", render::message_bubble(&message, "", chat)));
                    if let Some(reason) = client.acknowledge_error().await {
                        out.push_str(&format!("{}\n", reason.red()));
                    }
                }
                ReplyOutcome::Discarded => tracing::debug!("Reply discarded"),
            }
            Ok(out)
        }
        SpecialCommand::History => Ok(active_transcript(client, chat).await),
        SpecialCommand::ShowStatus => {
            let model = client.gateway().model();
            Ok(client
                .read(|state| render::status_text(state, &model))
                .await)
        }
        SpecialCommand::WhoAmI => Ok(client
            .read(|state| render::whoami_text(state.auth().user()))
            .await),
        SpecialCommand::Login => {
            if client.read(|state| state.auth().is_authenticated()).await {
                return Ok(format!("{}\n", "Already signed in.".yellow()));
            }
            let user = client.login().await;
            Ok(render::welcome_banner(
                &user,
                &chat.assistant_name,
                &client.gateway().model(),
            ))
        }
        SpecialCommand::Logout => match client.logout().await {
            Some(user) => Ok(format!(
                "{}\n",
                format!("Signed out {}. All conversations were discarded.", user.name).green()
            )),
            None => Ok(format!("{}\n", "Not signed in.".yellow())),
        },
        SpecialCommand::Help => {
            print_help();
            Ok(String::new())
        }
        SpecialCommand::Exit | SpecialCommand::None => Ok(String::new()),
    }
}

// Chat command handler
pub mod chat {
    //! Interactive chat client.
    //!
    //! Signs in, creates the first conversation and runs a readline loop.
    //! Plain text is sent to the assistant; slash commands manage
    //! conversations. Each reply is awaited before the next prompt, so at
    //! most one message is in flight.

    use super::*;
    use crate::commands::special_commands::parse_special_command;
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;

    /// Start the interactive chat client
    ///
    /// # Errors
    ///
    /// Fails before the loop starts if the gateway cannot be built (unknown
    /// provider, missing API key) or the terminal cannot be opened.
    pub async fn run_chat(config: Config) -> Result<()> {
        tracing::info!("Starting interactive chat client");

        let client = signed_in_client(&config).await?;
        let mut rl = DefaultEditor::new()?;

        if let Some(user) = client.read(|s| s.auth().user().cloned()).await {
            println!(
                "{}",
                render::welcome_banner(&user, &config.chat.assistant_name, &client.gateway().model())
            );
        }

        loop {
            let title = client
                .read(|s| s.store().active_session().map(|x| x.title().to_string()))
                .await;
            match rl.readline(&render::prompt(title.as_deref())) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        let _ = rl.add_history_entry(line.trim());
                    }
                    if handle_line(&client, &config.chat, &line).await == Flow::Exit {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("CTRL-C");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    println!("CTRL-D");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {:?}", err);
                    break;
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    /// What the loop does after a line has been handled
    #[derive(Debug, PartialEq, Eq)]
    enum Flow {
        Continue,
        Exit,
    }

    /// Handle one input line, either a slash command or a message
    ///
    /// Messages are sent exactly as typed. Only the blank check and command
    /// parsing look at the trimmed line.
    async fn handle_line(client: &ChatClient, chat: &ChatConfig, line: &str) -> Flow {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Flow::Continue;
        }

        match parse_special_command(trimmed) {
            Ok(SpecialCommand::Exit) => return Flow::Exit,
            Ok(SpecialCommand::None) => send_and_render(client, chat, line).await,
            Ok(command) => {
                if matches!(command, SpecialCommand::Suggest(_)) {
                    println!("{}", render::thinking_indicator(&chat.assistant_name));
                }
                match execute_special_command(client, chat, command).await {
                    Ok(output) if output.is_empty() => {}
                    Ok(output) => println!("{}", output),
                    Err(e) => eprintln!("{}\n", format!("Error: {}", e).red()),
                }
            }
            Err(e) => eprintln!("{}\n", e.to_string().red()),
        }
        Flow::Continue
    }

    async fn send_and_render(client: &ChatClient, chat: &ChatConfig, text: &str) {
        println!("{}", render::thinking_indicator(&chat.assistant_name));

        match client.send_message(text).await {
            Ok(ReplyOutcome::Delivered(message)) => {
                println!("\n{}", render::message_bubble(&message, "", chat));
            }
            Ok(ReplyOutcome::Apologized(message)) => {
                println!("\n{}", render::message_bubble(&message, "", chat));
                if let Some(reason) = client.acknowledge_error().await {
                    eprintln!("{}\n", reason.red());
                }
            }
            Ok(ReplyOutcome::Discarded) => {
                tracing::debug!("Reply discarded");
            }
            Err(e) => {
                let hint = match e.downcast_ref::<VairamError>() {
                    Some(VairamError::NotAuthenticated) => " Type '/login' to sign in.",
                    _ => "",
                };
                eprintln!("{}\n", format!("Error: {}.{}", e, hint).red());
            }
        }
    }

}

// One-shot ask command handler
pub mod ask {
    //! Send one message to a fresh conversation and print the reply.

    use super::*;

    /// Ask a single question
    ///
    /// # Errors
    ///
    /// Fails if the gateway cannot be built or the message is rejected. A
    /// gateway failure prints the apology and then returns the failure.
    pub async fn run_ask(config: Config, prompt: String) -> Result<()> {
        tracing::info!("Sending one-shot message");

        let client = signed_in_client(&config).await?;
        match client.send_message(&prompt).await? {
            ReplyOutcome::Delivered(message) => {
                println!("{}", message.content);
                Ok(())
            }
            ReplyOutcome::Apologized(message) => {
                println!("{}", message.content);
                let reason = client
                    .acknowledge_error()
                    .await
                    .unwrap_or_else(|| "gateway call failed".to_string());
                Err(anyhow::anyhow!(reason))
            }
            ReplyOutcome::Discarded => {
                Err(VairamError::Gateway("reply was discarded".to_string()).into())
            }
        }
    }

}
