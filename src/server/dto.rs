use serde::{Deserialize, Serialize};

/// `prompt` 缺少時由處理函式回 400，而不是交給 JSON 解析器
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptResponse {
    pub result: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HexagramQuery {
    pub at: Option<String>,
    pub draw: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
