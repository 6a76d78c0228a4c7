use crate::config::env::AiConfig;
use crate::utils::error::{OracleError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_range, Validate};
use chrono::{FixedOffset, Local, NaiveDateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OracleConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub ai: AiSection,
    #[serde(default)]
    pub divination: DivinationConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// 檔案中的值覆蓋環境變數
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AiSection {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub timeout_seconds: Option<u64>,
    pub max_concurrent_requests: Option<usize>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DivinationConfig {
    /// 未設定時使用主機的本地時間
    pub utc_offset_hours: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("server.host", &self.host)?;
        validate_range("server.port", self.port, 1, u16::MAX)?;
        Ok(())
    }
}

impl DivinationConfig {
    pub fn offset(&self) -> Result<Option<FixedOffset>> {
        self.utc_offset_hours
            .map(|hours| {
                FixedOffset::east_opt(hours * 3600).ok_or_else(|| {
                    OracleError::InvalidConfigValueError {
                        field: "divination.utc_offset_hours".to_string(),
                        value: hours.to_string(),
                        reason: "Offset is not a valid time zone".to_string(),
                    }
                })
            })
            .transpose()
    }

    /// 起卦所用的當下時間
    pub fn now(&self) -> Result<NaiveDateTime> {
        Ok(match self.offset()? {
            Some(offset) => Utc::now().with_timezone(&offset).naive_local(),
            None => Local::now().naive_local(),
        })
    }
}

impl Validate for DivinationConfig {
    fn validate(&self) -> Result<()> {
        if let Some(hours) = self.utc_offset_hours {
            validate_range("divination.utc_offset_hours", hours, -12, 14)?;
        }
        Ok(())
    }
}

impl OracleConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置，`${VAR}` 由行程環境變數替換
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::from_toml_str_with(content, |name| std::env::var(name).ok())
    }

    pub fn from_toml_str_with<F>(content: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let processed_content = Self::substitute_vars(content, lookup)?;

        toml::from_str(&processed_content).map_err(|e| OracleError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換變數 (例如 ${OPENAI_API_KEY})，查不到的保持原樣
    fn substitute_vars<F>(content: &str, lookup: F) -> Result<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").map_err(|e| {
            OracleError::ConfigError {
                message: format!("env var pattern: {}", e),
            }
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            lookup(var_name).unwrap_or_else(|| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            host: self
                .server
                .host
                .clone()
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: self.server.port.unwrap_or(DEFAULT_PORT),
        }
    }

    /// 以檔案內容覆蓋由環境變數得到的設定
    pub fn merge_ai(&self, mut base: AiConfig) -> AiConfig {
        let ai = &self.ai;
        if let Some(api_key) = &ai.api_key {
            base.api_key = api_key.clone();
        }
        if let Some(base_url) = &ai.base_url {
            base.base_url = base_url.clone();
        }
        if let Some(model) = &ai.model {
            base.model = model.clone();
        }
        if let Some(temperature) = ai.temperature {
            base.temperature = temperature;
        }
        if let Some(max_tokens) = ai.max_tokens {
            base.max_tokens = max_tokens;
        }
        if let Some(timeout) = ai.timeout_seconds {
            base.timeout_seconds = timeout;
        }
        if let Some(concurrent) = ai.max_concurrent_requests {
            base.max_concurrent_requests = concurrent;
        }
        base
    }
}

impl Validate for OracleConfig {
    fn validate(&self) -> Result<()> {
        self.server_config().validate()?;
        self.divination.validate()
    }
}
