//! Test utilities for VAIRAM
//!
//! Scripted gateways for driving the session store without a network, plus
//! an error assertion helper.

use crate::config::Config;
use crate::error::{Result, VairamError};
use crate::gateway::Gateway;
use crate::session::Message;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Assert that an error contains the expected message
///
/// # Panics
///
/// Panics if the result is Ok or if the error doesn't contain the expected message
pub fn assert_error_contains<T>(result: Result<T>, expected: &str) {
    match result {
        Ok(_) => panic!("Expected error containing '{}' but got Ok", expected),
        Err(e) => {
            let error_msg = e.to_string();
            assert!(
                error_msg.contains(expected),
                "Error message '{}' does not contain '{}'",
                error_msg,
                expected
            );
        }
    }
}

/// Configuration with an API key set, ready for building a gateway
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.provider.gemini.api_key = Some("test-key".to_string());
    config
}

type RecordedCall = (Vec<Message>, String);

/// Gateway answering from a fixed script
///
/// Each call pops the next scripted result; once the script runs out every
/// call fails. Calls are recorded for inspection.
pub struct ScriptedGateway {
    script: Mutex<VecDeque<std::result::Result<String, String>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl ScriptedGateway {
    pub fn replying(replies: Vec<&str>) -> Self {
        Self {
            script: Mutex::new(replies.into_iter().map(|r| Ok(r.to_string())).collect()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            script: Mutex::new(VecDeque::from(vec![Err(reason.to_string())])),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Recorded (history, new_message) pairs, oldest first
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Gateway for ScriptedGateway {
    async fn generate_reply(&self, history: &[Message], new_message: &str) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((history.to_vec(), new_message.to_string()));
        match self.script.lock().unwrap().pop_front() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(reason)) => Err(VairamError::Gateway(reason).into()),
            None => Err(VairamError::Gateway("script exhausted".to_string()).into()),
        }
    }

    fn model(&self) -> String {
        "scripted".to_string()
    }
}

/// Gateway that blocks until the test releases it
///
/// Lets a test act on the store while a generation is in flight.
pub struct GatedGateway {
    reply: String,
    started: Notify,
    release: Notify,
}

impl GatedGateway {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            started: Notify::new(),
            release: Notify::new(),
        }
    }

    /// Wait until a call has reached the gateway
    pub async fn wait_started(&self) {
        self.started.notified().await;
    }

    /// Let the pending call return its reply
    pub fn release(&self) {
        self.release.notify_one();
    }
}

#[async_trait]
impl Gateway for GatedGateway {
    async fn generate_reply(&self, _history: &[Message], _new_message: &str) -> Result<String> {
        self.started.notify_one();
        self.release.notified().await;
        Ok(self.reply.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "Expected error containing")]
    fn test_assert_error_contains_ok() {
        assert_error_contains(Ok(()), "error");
    }

    #[test]
    fn test_test_config_is_valid() {
        let config = test_config();
        assert!(config.validate().is_ok());
        assert_eq!(config.provider.gemini.api_key.as_deref(), Some("test-key"));
    }

    #[tokio::test]
    async fn test_scripted_gateway_runs_out() {
        let gateway = ScriptedGateway::replying(vec!["only"]);
        assert_eq!(gateway.generate_reply(&[], "a").await.unwrap(), "only");
        assert_error_contains(gateway.generate_reply(&[], "b").await, "script exhausted");
        assert_eq!(gateway.calls().len(), 2);
    }
}
