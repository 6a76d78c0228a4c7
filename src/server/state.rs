use crate::config::DivinationConfig;
use crate::core::oracle::Oracle;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub oracle: Oracle,
    pub divination: DivinationConfig,
}

impl AppState {
    pub fn new(oracle: Oracle, divination: DivinationConfig) -> Self {
        Self { oracle, divination }
    }
}
