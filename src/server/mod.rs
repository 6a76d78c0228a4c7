//! axum HTTP 服務
//!
//! - `POST /api/ai`、`POST /api/openai`：把提示詞交給語言模型
//! - `GET /api/hexagram`：依時間與隨機數起卦並附上解讀
//! - `GET /health`

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
