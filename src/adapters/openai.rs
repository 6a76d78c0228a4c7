//! OpenAI 相容的 chat completion 客戶端

use crate::core::interpretation::{sanitize_completion, SYSTEM_INSTRUCTION};
use crate::domain::ports::{AiSettings, Interpreter};
use crate::utils::error::{OracleError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub format_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub response_format: ResponseFormat,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
struct ErrorDetail {
    message: Option<String>,
    code: Option<serde_json::Value>,
}

pub struct ChatCompletionClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    permits: Arc<Semaphore>,
}

impl ChatCompletionClient {
    pub fn new<S: AiSettings + ?Sized>(settings: &S) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds()))
            .build()?;

        Ok(Self {
            client,
            endpoint: chat_completions_url(settings.base_url()),
            api_key: settings.api_key().to_string(),
            model: settings.model().to_string(),
            temperature: settings.temperature(),
            max_tokens: settings.max_tokens(),
            permits: Arc::new(Semaphore::new(settings.max_concurrent_requests())),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request_for(&self, prompt: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::system(SYSTEM_INSTRUCTION), ChatMessage::user(prompt)],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            response_format: ResponseFormat {
                format_type: "text".to_string(),
            },
        }
    }
}

pub fn chat_completions_url(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim_end_matches('/'))
}

fn upstream_error(status: u16, body: &str) -> OracleError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => OracleError::UpstreamError {
            status,
            code: envelope.error.code.map(|code| match code {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            }),
            message: envelope
                .error
                .message
                .unwrap_or_else(|| "no error message".to_string()),
        },
        Err(_) => OracleError::UpstreamError {
            status,
            code: None,
            message: body.chars().take(200).collect(),
        },
    }
}

#[async_trait]
impl Interpreter for ChatCompletionClient {
    async fn interpret(&self, prompt: &str) -> Result<String> {
        // 同一時間的上游請求數受限，多餘的請求排隊等候
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| OracleError::ConfigError {
                message: "AI request limiter was closed".to_string(),
            })?;

        let request = self.request_for(prompt);
        tracing::debug!("Making chat completion request to: {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Chat completion response status: {}", status);
        let body = response.text().await?;

        if !status.is_success() {
            let err = upstream_error(status.as_u16(), &body);
            tracing::error!("AI request failed: {}", err);
            return Err(err);
        }

        let parsed: ChatCompletionResponse =
            serde_json::from_str(&body).map_err(|e| OracleError::MalformedResponse {
                message: format!("cannot parse completion: {}", e),
            })?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| OracleError::MalformedResponse {
                message: "completion has no message content".to_string(),
            })?;

        Ok(sanitize_completion(&content))
    }
}
