use crate::domain::ports::AiSettings;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_range, validate_resolved_secret,
    validate_url, Validate,
};
use serde::{Deserialize, Serialize};

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const BASE_URL_VAR: &str = "OPENAI_BASE_URL";
pub const MODEL_VAR: &str = "OPENAI_MODEL";

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// 上游語言模型 API 設定
#[derive(Clone, Serialize, Deserialize)]
pub struct AiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_seconds: u64,
    pub max_concurrent_requests: usize,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.8,
            max_tokens: 50,
            timeout_seconds: 30,
            max_concurrent_requests: 1,
        }
    }
}

// 不把金鑰寫進日誌
impl std::fmt::Debug for AiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiConfig")
            .field("api_key", &if self.api_key.is_empty() { "<missing>" } else { "<redacted>" })
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("max_concurrent_requests", &self.max_concurrent_requests)
            .finish()
    }
}

impl AiConfig {
    /// 從行程環境變數讀取
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 金鑰缺少時留空，由 `validate` 回報
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        Self {
            api_key: read(API_KEY_VAR).unwrap_or_default(),
            base_url: read(BASE_URL_VAR).unwrap_or(defaults.base_url),
            model: read(MODEL_VAR).unwrap_or(defaults.model),
            ..defaults
        }
    }
}

impl AiSettings for AiConfig {
    fn api_key(&self) -> &str {
        &self.api_key
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn temperature(&self) -> f32 {
        self.temperature
    }

    fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    fn max_concurrent_requests(&self) -> usize {
        self.max_concurrent_requests
    }
}

impl Validate for AiConfig {
    fn validate(&self) -> Result<()> {
        validate_resolved_secret("ai.api_key", &self.api_key)?;
        validate_url("ai.base_url", &self.base_url)?;
        validate_non_empty_string("ai.model", &self.model)?;
        validate_range("ai.temperature", self.temperature, 0.0, 2.0)?;
        validate_range("ai.max_tokens", self.max_tokens, 1, 4096)?;
        validate_range("ai.timeout_seconds", self.timeout_seconds, 1, 300)?;
        validate_positive_number("ai.max_concurrent_requests", self.max_concurrent_requests, 1)?;
        Ok(())
    }
}
