//! Command-line interface definition for VAIRAM
//!
//! This module defines the CLI structure using clap's derive API,
//! providing the interactive chat client and a one-shot ask command.

use clap::{Parser, Subcommand};

/// VAIRAM - terminal chat client for the VAIRAM AI assistant
#[derive(Parser, Debug, Clone)]
#[command(name = "vairam")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for VAIRAM
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the interactive chat client
    Chat {
        /// Override the configured model
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Send a single message and print the reply
    Ask {
        /// Message to send
        prompt: String,

        /// Override the configured model
        #[arg(short, long)]
        model: Option<String>,
    },
}

impl Commands {
    /// Model override supplied on the command line, if any
    pub fn model_override(&self) -> Option<&str> {
        match self {
            Self::Chat { model } | Self::Ask { model, .. } => model.as_deref(),
        }
    }
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            command: Commands::Chat { model: None },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default() {
        let cli = Cli::default();
        assert_eq!(cli.config, Some("config/config.yaml".to_string()));
        assert!(!cli.verbose);
        assert!(matches!(cli.command, Commands::Chat { model: None }));
    }

    #[test]
    fn test_cli_parse_chat_command() {
        let cli = Cli::try_parse_from(["vairam", "chat"]).unwrap();
        assert!(matches!(cli.command, Commands::Chat { .. }));
        assert_eq!(cli.command.model_override(), None);
    }

    #[test]
    fn test_cli_parse_chat_with_model() {
        let cli = Cli::try_parse_from(["vairam", "chat", "--model", "gemini-2.5-pro"]).unwrap();
        assert_eq!(cli.command.model_override(), Some("gemini-2.5-pro"));
    }

    #[test]
    fn test_cli_parse_ask() {
        let cli = Cli::try_parse_from(["vairam", "ask", "What is Rust?", "-m", "m1"]).unwrap();
        if let Commands::Ask { prompt, model } = cli.command {
            assert_eq!(prompt, "What is Rust?");
            assert_eq!(model, Some("m1".to_string()));
        } else {
            panic!("Expected Ask command");
        }
    }

    #[test]
    fn test_cli_ask_requires_prompt() {
        assert!(Cli::try_parse_from(["vairam", "ask"]).is_err());
    }

    #[test]
    fn test_cli_global_flags() {
        let cli = Cli::try_parse_from(["vairam", "-v", "-c", "custom.yaml", "chat"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some("custom.yaml".to_string()));
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["vairam"]).is_err());
    }
}
