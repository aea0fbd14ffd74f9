//! Configuration management for VAIRAM
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::auth::User;
use crate::error::{Result, VairamError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for VAIRAM
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Gateway provider configuration
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Chat presentation settings
    #[serde(default)]
    pub chat: ChatConfig,

    /// Identity returned by the mock sign-in
    #[serde(default)]
    pub user: UserConfig,
}

/// Provider configuration
///
/// Specifies which provider answers messages and its settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Type of provider to use
    #[serde(rename = "type", default = "default_provider_type")]
    pub provider_type: String,

    /// Gemini configuration
    #[serde(default)]
    pub gemini: GeminiConfig,
}

fn default_provider_type() -> String {
    "gemini".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider_type: default_provider_type(),
            gemini: GeminiConfig::default(),
        }
    }
}

/// Gemini provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Model to use
    #[serde(default = "default_gemini_model")]
    pub model: String,

    /// Base URL of the Generative Language API (overridable for tests and mocks)
    #[serde(default = "default_gemini_api_base")]
    pub api_base: String,

    /// API key; usually supplied through `GEMINI_API_KEY`
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Fixed persona instruction sent with every request
    #[serde(default = "default_system_instruction")]
    pub system_instruction: String,
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_gemini_api_base() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_timeout_seconds() -> u64 {
    120
}

fn default_system_instruction() -> String {
    "You are VAIRAM AI, a helpful, intelligent, and premium AI assistant. \
     Keep your answers concise, professional, yet friendly."
        .to_string()
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: default_gemini_model(),
            api_base: default_gemini_api_base(),
            api_key: None,
            timeout_seconds: default_timeout_seconds(),
            system_instruction: default_system_instruction(),
        }
    }
}

/// Chat presentation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Label shown on model messages
    #[serde(default = "default_assistant_name")]
    pub assistant_name: String,

    /// Show a local HH:MM timestamp on each message
    #[serde(default = "default_show_timestamps")]
    pub show_timestamps: bool,
}

fn default_assistant_name() -> String {
    "VAIRAM AI".to_string()
}

fn default_show_timestamps() -> bool {
    true
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            assistant_name: default_assistant_name(),
            show_timestamps: default_show_timestamps(),
        }
    }
}

/// Mock identity configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(default = "default_user_id")]
    pub id: String,
    #[serde(default = "default_user_name")]
    pub name: String,
    #[serde(default = "default_user_email")]
    pub email: String,
    #[serde(default = "default_user_avatar")]
    pub avatar_url: String,
}

fn default_user_id() -> String {
    "user_123".to_string()
}

fn default_user_name() -> String {
    "Alex Morgan".to_string()
}

fn default_user_email() -> String {
    "alex.morgan@vairam.ai".to_string()
}

fn default_user_avatar() -> String {
    "https://api.dicebear.com/7.x/avataaars/svg?seed=Alex".to_string()
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            id: default_user_id(),
            name: default_user_name(),
            email: default_user_email(),
            avatar_url: default_user_avatar(),
        }
    }
}

impl UserConfig {
    /// The identity handed out by sign-in
    pub fn identity(&self) -> User {
        User {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            avatar_url: self.avatar_url.clone(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| VairamError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| VairamError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(provider_type) = std::env::var("VAIRAM_PROVIDER") {
            self.provider.provider_type = provider_type;
        }

        if let Ok(model) = std::env::var("VAIRAM_GEMINI_MODEL") {
            self.provider.gemini.model = model;
        }

        if let Ok(api_base) = std::env::var("VAIRAM_GEMINI_API_BASE") {
            tracing::debug!(api_base = %api_base, "Env override: VAIRAM_GEMINI_API_BASE");
            self.provider.gemini.api_base = api_base;
        }

        if let Ok(timeout) = std::env::var("VAIRAM_GEMINI_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.provider.gemini.timeout_seconds = value;
            } else {
                tracing::warn!("Invalid VAIRAM_GEMINI_TIMEOUT_SECONDS: {}", timeout);
            }
        }

        // GEMINI_API_KEY wins over the legacy API_KEY name
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .ok()
            .filter(|key| !key.trim().is_empty());
        if let Some(key) = api_key {
            self.provider.gemini.api_key = Some(key);
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }
        if let Some(model) = cli.command.model_override() {
            tracing::debug!("Using model override: {}", model);
            self.provider.gemini.model = model.to_string();
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        let valid_providers = ["gemini"];
        if !valid_providers.contains(&self.provider.provider_type.as_str()) {
            return Err(VairamError::Config(format!(
                "Invalid provider type: {}. Must be one of: {}",
                self.provider.provider_type,
                valid_providers.join(", ")
            ))
            .into());
        }

        let gemini = &self.provider.gemini;
        if gemini.model.trim().is_empty() {
            return Err(VairamError::Config("gemini.model cannot be empty".to_string()).into());
        }

        if gemini.api_base.trim().is_empty() {
            return Err(
                VairamError::Config("gemini.api_base cannot be empty".to_string()).into(),
            );
        }

        if gemini.timeout_seconds == 0 {
            return Err(VairamError::Config(
                "gemini.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if gemini.system_instruction.trim().is_empty() {
            return Err(VairamError::Config(
                "gemini.system_instruction cannot be empty".to_string(),
            )
            .into());
        }

        if self.chat.assistant_name.trim().is_empty() {
            return Err(
                VairamError::Config("chat.assistant_name cannot be empty".to_string()).into(),
            );
        }

        Ok(())
    }
}
