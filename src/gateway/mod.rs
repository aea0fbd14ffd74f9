//! LLM gateway module for VAIRAM
//!
//! This module contains the gateway abstraction and the Gemini
//! implementation used to generate replies.

pub mod base;
pub mod gemini;

pub use base::{conversation_turns, Gateway, FALLBACK_REPLY};
pub use gemini::GeminiGateway;

use crate::config::ProviderConfig;
use crate::error::{Result, VairamError};
use std::sync::Arc;

/// Create a gateway instance based on configuration
///
/// # Arguments
///
/// * `config` - Provider configuration
///
/// # Returns
///
/// Returns a shared gateway instance
///
/// # Errors
///
/// Returns error if the provider type is unknown or the gateway cannot be
/// initialized (for example, a missing API key)
pub fn create_gateway(config: &ProviderConfig) -> Result<Arc<dyn Gateway>> {
    match config.provider_type.as_str() {
        "gemini" => Ok(Arc::new(GeminiGateway::new(config.gemini.clone())?)),
        other => Err(VairamError::Config(format!("Unknown provider type: {}", other)).into()),
    }
}
