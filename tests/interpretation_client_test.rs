use anyhow::Result;
use httpmock::prelude::*;
use serde_json::json;
use std::sync::Arc;
use std::time::{Duration, Instant};
use yijing_oracle::core::interpretation::INTERPRETATION_UNAVAILABLE;
use yijing_oracle::domain::ports::Interpreter;
use yijing_oracle::{AiConfig, ChatCompletionClient, Draw, Oracle, OracleError};

fn config_for(server: &MockServer) -> AiConfig {
    AiConfig {
        api_key: "sk-test".to_string(),
        base_url: format!("{}/v1/", server.base_url()),
        ..AiConfig::default()
    }
}

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "model": "gpt-4o",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

#[tokio::test]
async fn test_interpret_sends_chat_completion() -> Result<()> {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/chat/completions")
                .header("authorization", "Bearer sk-test")
                .json_body_partial(
                    r#"{"model":"gpt-4o","max_tokens":50,"response_format":{"type":"text"}}"#,
                )
                .body_contains("周易解卦大师")
                .body_contains("请解析此卦象");
            then.status(200).json_body(completion("  “稳中求进，静待时机”\n"));
        })
        .await;

    let client = ChatCompletionClient::new(&config_for(&server))?;
    let text = client.interpret("请解析此卦象：\n- 本卦：山泽损").await?;

    mock.assert_async().await;
    assert_eq!(text, "稳中求进，静待时机");
    Ok(())
}

#[tokio::test]
async fn test_upstream_error_keeps_code() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(429).json_body(json!({
                "error": {
                    "message": "Rate limit reached",
                    "type": "requests",
                    "code": "rate_limit_exceeded"
                }
            }));
        })
        .await;

    let client = ChatCompletionClient::new(&config_for(&server))?;
    let err = client.interpret("hi").await.unwrap_err();

    match &err {
        OracleError::UpstreamError { status, .. } => assert_eq!(*status, 429),
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(err.upstream_code(), Some("rate_limit_exceeded"));
    assert_eq!(err.user_friendly_message(), "AI服务暂时不可用");
    Ok(())
}

#[tokio::test]
async fn test_completion_without_choices_is_malformed() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200).json_body(json!({ "choices": [] }));
        })
        .await;

    let client = ChatCompletionClient::new(&config_for(&server))?;
    let err = client.interpret("hi").await.unwrap_err();

    assert!(matches!(err, OracleError::MalformedResponse { .. }));
    Ok(())
}

#[tokio::test]
async fn test_slow_upstream_times_out() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200)
                .delay(Duration::from_secs(3))
                .json_body(completion("太迟了"));
        })
        .await;

    let config = AiConfig {
        timeout_seconds: 1,
        ..config_for(&server)
    };
    let client = ChatCompletionClient::new(&config)?;
    let err = client.interpret("hi").await.unwrap_err();

    match err {
        OracleError::ApiError(e) => assert!(e.is_timeout()),
        other => panic!("expected timeout, got {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn test_requests_are_serialized_by_default() -> Result<()> {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200)
                .delay(Duration::from_millis(300))
                .json_body(completion("好"));
        })
        .await;

    let client = Arc::new(ChatCompletionClient::new(&config_for(&server))?);
    let started = Instant::now();
    let (first, second) = tokio::join!(client.interpret("a"), client.interpret("b"));

    assert_eq!(first?, "好");
    assert_eq!(second?, "好");
    assert!(started.elapsed() >= Duration::from_millis(550));
    mock.assert_hits_async(2).await;
    Ok(())
}

#[tokio::test]
async fn test_consult_falls_back_when_upstream_fails() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(500).body("internal error");
        })
        .await;

    let oracle = Oracle::new(Arc::new(ChatCompletionClient::new(&config_for(&server))?));
    let at = chrono::NaiveDate::from_ymd_opt(2024, 9, 17)
        .unwrap()
        .and_hms_opt(10, 30, 0)
        .unwrap();
    let reading = oracle.consult(at, Draw::new(382)?).await?;

    assert_eq!(reading.hexagram.name, "山泽损");
    assert_eq!(reading.interpretation.as_deref(), Some(INTERPRETATION_UNAVAILABLE));
    Ok(())
}
