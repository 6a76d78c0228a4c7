use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};

use super::dto::{HealthResponse, HexagramQuery, PromptRequest, PromptResponse};
use super::error::AppError;
use super::state::AppState;
use crate::domain::model::{Draw, Reading};
use crate::utils::error::OracleError;
use crate::utils::validation::parse_datetime;

pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// POST /api/ai
pub async fn interpret_prompt(
    State(state): State<AppState>,
    payload: Result<Json<PromptRequest>, JsonRejection>,
) -> HandlerResult<PromptResponse> {
    let Json(request) = payload.map_err(|e| AppError::InvalidBody(e.body_text()))?;
    let prompt = request
        .prompt
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::BadRequest("prompt is required".to_string()))?;

    tracing::debug!("Forwarding prompt ({} chars)", prompt.chars().count());
    let result = state.oracle.interpret(prompt).await?;

    Ok(Json(PromptResponse { result }))
}

/// GET /api/hexagram?at=&draw=
pub async fn get_hexagram(
    State(state): State<AppState>,
    query: Result<Query<HexagramQuery>, QueryRejection>,
) -> HandlerResult<Reading> {
    let Query(query) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let at = match query.at.as_deref() {
        Some(raw) => parse_datetime("at", raw)?,
        None => state.divination.now()?,
    };
    let draw = match query.draw.as_deref() {
        Some(raw) => parse_draw(raw)?,
        None => {
            // ThreadRng 不能跨越 await
            let mut rng = rand::rng();
            Draw::random(&mut rng)
        }
    };

    let reading = state.oracle.consult(at, draw).await?;
    Ok(Json(reading))
}

fn parse_draw(raw: &str) -> Result<Draw, OracleError> {
    let value = raw
        .trim()
        .parse::<u16>()
        .map_err(|_| OracleError::ValidationError {
            message: format!("draw '{}' must be a number between {} and {}", raw, Draw::MIN, Draw::MAX),
        })?;
    Draw::new(value)
}
