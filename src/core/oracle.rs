use crate::core::derivation::cast_reading;
use crate::core::interpretation::{prompt_for, INTERPRETATION_UNAVAILABLE};
use crate::domain::model::{Draw, Reading};
use crate::domain::ports::Interpreter;
use crate::utils::error::Result;
use chrono::NaiveDateTime;
use std::sync::Arc;

/// 起卦並請語言模型解讀
#[derive(Clone)]
pub struct Oracle {
    interpreter: Arc<dyn Interpreter>,
}

impl Oracle {
    pub fn new(interpreter: Arc<dyn Interpreter>) -> Self {
        Self { interpreter }
    }

    pub fn cast(&self, at: NaiveDateTime, draw: Draw) -> Result<Reading> {
        cast_reading(at, draw)
    }

    /// 解讀失敗不會中斷流程，改以固定訊息代替
    pub async fn consult(&self, at: NaiveDateTime, draw: Draw) -> Result<Reading> {
        let mut reading = self.cast(at, draw)?;
        tracing::info!(
            "🔮 Cast {} ({}{}) moving line {} at {}",
            reading.hexagram.name,
            reading.upper,
            reading.lower,
            reading.moving_line,
            reading.lunar_date
        );

        let prompt = prompt_for(&reading);
        let interpretation = match self.interpreter.interpret(&prompt).await {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => {
                tracing::warn!("AI interpretation came back empty");
                INTERPRETATION_UNAVAILABLE.to_string()
            }
            Err(e) => {
                tracing::warn!(
                    "AI interpretation failed: {} (Category: {:?})",
                    e,
                    e.category()
                );
                INTERPRETATION_UNAVAILABLE.to_string()
            }
        };

        reading.interpretation = Some(interpretation);
        Ok(reading)
    }

    pub async fn interpret(&self, prompt: &str) -> Result<String> {
        self.interpreter.interpret(prompt).await
    }
}
