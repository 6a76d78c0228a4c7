use crate::utils::error::Result;
use async_trait::async_trait;

/// 將提示詞交給語言模型並取回解讀文字
#[async_trait]
pub trait Interpreter: Send + Sync {
    async fn interpret(&self, prompt: &str) -> Result<String>;
}

pub trait AiSettings: Send + Sync {
    fn api_key(&self) -> &str;
    fn base_url(&self) -> &str;
    fn model(&self) -> &str;
    fn temperature(&self) -> f32;
    fn max_tokens(&self) -> u32;
    fn timeout_seconds(&self) -> u64;
    fn max_concurrent_requests(&self) -> usize;
}
