use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use switchboard_core::optimize::{OptimizeAction, OptimizeError, OptimizeRequest, PromptOptimizer};

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "cmpl-1",
        "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]
    })
}

#[tokio::test]
async fn optimize_returns_rewrite() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer gw-key"))
        .and(body_partial_json(json!({"model": "test-model", "stream": false})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion("You are a precise assistant.")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let optimizer = PromptOptimizer::new(server.uri(), "test-model", "gw-key").unwrap();
    let request = OptimizeRequest::new(OptimizeAction::Optimize, "be helpful");
    let outcome = optimizer.run(&request).await.unwrap();

    assert_eq!(outcome.result, "You are a precise assistant.");
    assert_eq!(outcome.analysis, None);
}

#[tokio::test]
async fn evaluate_returns_analysis() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("Score: 6/10")))
        .mount(&server)
        .await;

    let optimizer = PromptOptimizer::new(server.uri(), "test-model", "gw-key").unwrap();
    let request = OptimizeRequest::new(OptimizeAction::Evaluate, "be helpful");
    let outcome = optimizer.run(&request).await.unwrap();

    assert_eq!(outcome.result, "");
    assert_eq!(outcome.analysis.as_deref(), Some("Score: 6/10"));
    assert_eq!(outcome.to_string(), "Score: 6/10");
}

/// Status code an error stands for, for comparing across variants
fn error_status(err: &OptimizeError) -> Option<u16> {
    match err {
        OptimizeError::RateLimited => Some(429),
        OptimizeError::QuotaExhausted => Some(402),
        OptimizeError::Gateway { status } => Some(*status),
        _ => None,
    }
}

#[tokio::test]
async fn gateway_status_codes_map_to_errors() {
    for status in [429u16, 402, 500, 503] {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;

        let optimizer = PromptOptimizer::new(server.uri(), "test-model", "gw-key").unwrap();
        let err = optimizer
            .run(&OptimizeRequest::new(OptimizeAction::Optimize, "x"))
            .await
            .unwrap_err();
        assert_eq!(error_status(&err), Some(status), "HTTP {status} gave {err:?}");
    }
}

#[tokio::test]
async fn empty_prompt_is_rejected_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let optimizer = PromptOptimizer::new(server.uri(), "test-model", "gw-key").unwrap();
    let err = optimizer
        .run(&OptimizeRequest::new(OptimizeAction::Optimize, "   "))
        .await
        .unwrap_err();
    assert!(matches!(err, OptimizeError::EmptyPrompt));
}

#[tokio::test]
async fn missing_choices_yield_empty_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let optimizer = PromptOptimizer::new(server.uri(), "test-model", "gw-key").unwrap();
    let outcome = optimizer
        .run(&OptimizeRequest::new(OptimizeAction::Optimize, "x"))
        .await
        .unwrap();
    assert_eq!(outcome.result, "");
}
