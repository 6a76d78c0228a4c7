#[cfg(feature = "cli")]
pub mod cli;
pub mod env;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{CastArgs, CliConfig, Command, ServeArgs};
pub use env::AiConfig;
pub use toml_config::{DivinationConfig, OracleConfig, ServerConfig};

use crate::utils::error::Result;
use crate::utils::validation::Validate;
use std::path::Path;

/// 環境變數與設定檔合併後的結果
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub ai: AiConfig,
    pub divination: DivinationConfig,
}

impl Settings {
    /// 金鑰是否存在留給呼叫端決定何時檢查
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let file = match config_path {
            Some(path) => {
                tracing::info!("📄 Loading configuration from {}", path.display());
                OracleConfig::from_file(path)?
            }
            None => OracleConfig::default(),
        };
        file.validate()?;

        Ok(Self {
            server: file.server_config(),
            ai: file.merge_ai(AiConfig::from_env()),
            divination: file.divination,
        })
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        self.server.validate()?;
        self.ai.validate()?;
        self.divination.validate()
    }
}
