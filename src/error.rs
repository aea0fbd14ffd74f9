//! Error types for VAIRAM
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for VAIRAM operations
///
/// Covers configuration loading, gateway calls, authentication and the
/// session store's explicit failure signaling.
#[derive(Error, Debug)]
pub enum VairamError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Gateway failures (transport errors, provider errors, bad responses)
    #[error("Gateway error: {0}")]
    Gateway(String),

    /// Missing credentials for provider
    #[error("Missing credentials for provider: {0}")]
    MissingCredentials(String),

    /// An operation that needs a signed-in user was attempted while signed out
    #[error("Not signed in")]
    NotAuthenticated,

    /// A message was sent while no session is active
    #[error("No active session")]
    NoActiveSession,

    /// No session exists with the given id
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// Message content was empty or whitespace only
    #[error("Message content cannot be empty")]
    EmptyMessage,

    /// Session title was empty or whitespace only
    #[error("Session title cannot be empty")]
    InvalidTitle,

    /// A reply is already being generated for the session
    #[error("A reply is already being generated for session {0}")]
    GenerationInFlight(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for VAIRAM operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let error = VairamError::Config("invalid format".to_string());
        assert_eq!(error.to_string(), "Configuration error: invalid format");
    }

    #[test]
    fn test_gateway_error_display() {
        let error = VairamError::Gateway("connection reset".to_string());
        assert_eq!(error.to_string(), "Gateway error: connection reset");
    }

    #[test]
    fn test_session_not_found_display() {
        let error = VairamError::SessionNotFound("chat_42".to_string());
        assert_eq!(error.to_string(), "Session not found: chat_42");
    }

    #[test]
    fn test_generation_in_flight_display() {
        let error = VairamError::GenerationInFlight("chat_1".to_string());
        assert!(error.to_string().contains("chat_1"));
    }

    #[test]
    fn test_missing_credentials_error_display() {
        let error = VairamError::MissingCredentials("gemini".to_string());
        assert_eq!(error.to_string(), "Missing credentials for provider: gemini");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: VairamError = io_error.into();
        assert!(matches!(error, VairamError::Io(_)));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>("invalid: : yaml").unwrap_err();
        let error: VairamError = yaml_error.into();
        assert!(matches!(error, VairamError::Yaml(_)));
    }

    #[test]
    fn test_downcast_through_anyhow() {
        let result: Result<()> = Err(VairamError::NoActiveSession.into());
        let err = result.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<VairamError>(),
            Some(VairamError::NoActiveSession)
        ));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<VairamError>();
    }
}
