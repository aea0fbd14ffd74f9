//! Gemini gateway implementation
//!
//! Calls the Generative Language REST API (`models/{model}:generateContent`)
//! with the session history, a fixed system instruction and the newest user
//! text. The call is stateless: the full history is resent every turn.

use crate::config::GeminiConfig;
use crate::error::{Result, VairamError};
use crate::gateway::{conversation_turns, Gateway, FALLBACK_REPLY};
use crate::session::Message;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Gemini API gateway
///
/// # Examples
///
/// ```no_run
/// use vairam::config::GeminiConfig;
/// use vairam::gateway::{Gateway, GeminiGateway};
/// use vairam::session::Message;
///
/// # async fn example() -> vairam::error::Result<()> {
/// let config = GeminiConfig {
///     api_key: Some("my-key".to_string()),
///     ..GeminiConfig::default()
/// };
/// let gateway = GeminiGateway::new(config)?;
/// let history = vec![Message::user("Hello!")];
/// let reply = gateway.generate_reply(&history, "Hello!").await?;
/// # Ok(())
/// # }
/// ```
pub struct GeminiGateway {
    client: Client,
    config: GeminiConfig,
    api_key: String,
}

/// Request body for `generateContent`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    contents: Vec<GeminiContent>,
}

/// One conversation turn in Gemini format
#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

/// Response body from `generateContent`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: usize,
    #[serde(default)]
    candidates_token_count: usize,
}

impl GeminiGateway {
    /// Create a new Gemini gateway
    ///
    /// # Errors
    ///
    /// Returns `MissingCredentials` if no API key is configured, or a
    /// gateway error if the HTTP client cannot be built
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| VairamError::MissingCredentials("gemini".to_string()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("vairam/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| VairamError::Gateway(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!(
            "Initialized Gemini gateway: api_base={}, model={}",
            config.api_base,
            config.model
        );

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.api_base.trim_end_matches('/'),
            self.config.model
        )
    }

    fn build_request(&self, history: &[Message], new_message: &str) -> GenerateContentRequest {
        let contents = conversation_turns(history, new_message)
            .into_iter()
            .map(|(role, text)| GeminiContent {
                role: Some(role.as_str().to_string()),
                parts: vec![GeminiPart {
                    text: Some(text.to_string()),
                }],
            })
            .collect();

        let system_instruction = if self.config.system_instruction.trim().is_empty() {
            None
        } else {
            Some(GeminiContent {
                role: None,
                parts: vec![GeminiPart {
                    text: Some(self.config.system_instruction.clone()),
                }],
            })
        };

        GenerateContentRequest {
            system_instruction,
            contents,
        }
    }
}

/// Concatenate the text parts of the first candidate
fn extract_text(response: GenerateContentResponse) -> String {
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .unwrap_or_default()
}

#[async_trait]
impl Gateway for GeminiGateway {
    async fn generate_reply(&self, history: &[Message], new_message: &str) -> Result<String> {
        let request = self.build_request(history, new_message);
        tracing::debug!(
            "Sending Gemini request: model={}, {} turns",
            self.config.model,
            request.contents.len()
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Gemini request failed: {}", e);
                VairamError::Gateway(format!("Gemini request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Gemini returned error {}: {}", status, error_text);
            return Err(VairamError::Gateway(format!(
                "Gemini returned error {}: {}",
                status, error_text
            ))
            .into());
        }

        let body: GenerateContentResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Gemini response: {}", e);
            VairamError::Gateway(format!("Failed to parse Gemini response: {}", e))
        })?;

        if let Some(usage) = &body.usage_metadata {
            tracing::debug!(
                "Gemini usage: prompt_tokens={}, completion_tokens={}",
                usage.prompt_token_count,
                usage.candidates_token_count
            );
        }
        if let Some(reason) = body
            .candidates
            .first()
            .and_then(|c| c.finish_reason.as_deref())
        {
            tracing::debug!("Gemini finish reason: {}", reason);
        }

        let text = extract_text(body);
        if text.is_empty() {
            tracing::warn!("Gemini returned an empty reply, using fallback text");
            return Ok(FALLBACK_REPLY.to_string());
        }
        Ok(text)
    }

    fn model(&self) -> String {
        self.config.model.clone()
    }
}
