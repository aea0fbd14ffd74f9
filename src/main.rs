//! VAIRAM - terminal chat client
//!
#![doc = "VAIRAM - terminal chat client"]
#![doc = "Main entry point for the VAIRAM chat application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use vairam::cli::{Cli, Commands};
use vairam::commands;
use vairam::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Chat { .. } => {
            tracing::info!("Starting interactive chat mode");
            commands::chat::run_chat(config).await?;
            Ok(())
        }
        Commands::Ask { prompt, .. } => {
            tracing::info!("Starting one-shot ask");
            commands::ask::run_ask(config, prompt).await?;
            Ok(())
        }
    }
}

/// Initialize tracing; logs go to stderr so replies on stdout stay clean
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "vairam=debug" } else { "vairam=warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
