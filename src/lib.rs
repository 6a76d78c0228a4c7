pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
#[cfg(feature = "server")]
pub mod server;
pub mod utils;

pub use adapters::ChatCompletionClient;
#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{AiConfig, OracleConfig, Settings};
pub use core::oracle::Oracle;
pub use domain::model::{Draw, Hexagram, Reading, Trigram};
pub use utils::error::{OracleError, Result};
