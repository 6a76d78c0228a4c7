use thiserror::Error;

#[derive(Error, Debug)]
pub enum OracleError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Upstream returned {status}: {message}")]
    UpstreamError {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("Malformed upstream response: {message}")]
    MalformedResponse { message: String },

    #[error("Calendar error: {message}")]
    CalendarError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Upstream,
    Data,
    Input,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl OracleError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            OracleError::ConfigError { .. }
            | OracleError::MissingConfigError { .. }
            | OracleError::InvalidConfigValueError { .. }
            | OracleError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            OracleError::ApiError(_) => ErrorCategory::Network,
            OracleError::UpstreamError { .. } | OracleError::MalformedResponse { .. } => {
                ErrorCategory::Upstream
            }
            OracleError::SerializationError(_) | OracleError::CalendarError { .. } => {
                ErrorCategory::Data
            }
            OracleError::ValidationError { .. } => ErrorCategory::Input,
            OracleError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network | ErrorCategory::Upstream => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 上游回傳的錯誤代碼 (若有)
    pub fn upstream_code(&self) -> Option<&str> {
        match self {
            OracleError::UpstreamError { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            OracleError::MissingConfigError { .. } => {
                "Set OPENAI_API_KEY (and optionally OPENAI_BASE_URL / OPENAI_MODEL) or provide them in the [ai] table of the config file"
            }
            OracleError::ConfigError { .. }
            | OracleError::InvalidConfigValueError { .. }
            | OracleError::ConfigValidationError { .. } => {
                "Check the configuration file and environment variables"
            }
            OracleError::ApiError(e) if e.is_timeout() => {
                "The AI service did not answer in time; try again or raise ai.timeout_seconds"
            }
            OracleError::ApiError(_) => "Check network connectivity and the AI base URL",
            OracleError::UpstreamError { status, .. } if *status == 401 || *status == 403 => {
                "Verify that the API key is valid for the configured base URL"
            }
            OracleError::UpstreamError { .. } | OracleError::MalformedResponse { .. } => {
                "The AI service is unavailable; try again later"
            }
            OracleError::CalendarError { .. } => {
                "Use a date between 1900-01-31 and 2100-12-31"
            }
            OracleError::ValidationError { .. } => "Check the command arguments",
            OracleError::SerializationError(_) => "Report this response format to the maintainers",
            OracleError::IoError(_) => "Check file permissions and paths",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network | ErrorCategory::Upstream => "AI服务暂时不可用".to_string(),
            ErrorCategory::Configuration => format!("配置错误: {}", self),
            ErrorCategory::Input | ErrorCategory::Data => format!("输入有误: {}", self),
            ErrorCategory::System => format!("系统错误: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, OracleError>;
