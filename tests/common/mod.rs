use std::collections::VecDeque;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;

use vairam::config::UserConfig;
use vairam::error::{Result, VairamError};
use vairam::gateway::Gateway;
use vairam::session::Message;
use vairam::ChatClient;

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

/// Gateway that answers from a script and records every call
#[allow(dead_code)]
pub struct ScriptedGateway {
    script: Mutex<VecDeque<std::result::Result<String, String>>>,
    pub calls: Arc<Mutex<Vec<(Vec<Message>, String)>>>,
}

#[allow(dead_code)]
impl ScriptedGateway {
    pub fn new(script: Vec<std::result::Result<&str, &str>>) -> Self {
        Self {
            script: Mutex::new(
                script
                    .into_iter()
                    .map(|r| r.map(str::to_string).map_err(str::to_string))
                    .collect(),
            ),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
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
}

/// Signed-in client backed by the given gateway
#[allow(dead_code)]
pub async fn signed_in_client(gateway: Arc<dyn Gateway>) -> ChatClient {
    let client = ChatClient::new(gateway, UserConfig::default().identity());
    client.login().await;
    client
}
