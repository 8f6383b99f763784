use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use switchboard_core::model::{McpServer, Provider, ProviderType, TransportType};
use switchboard_core::probe::{ProbeTarget, Prober};
use switchboard_core::types::AppType;

fn custom_provider(base_url: String) -> Provider {
    Provider {
        api_key: Some("sk-test".to_string()),
        base_url: Some(base_url),
        ..Provider::new("relay", ProviderType::Custom, AppType::Claude)
    }
}

#[tokio::test]
async fn provider_probe_falls_through_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/models"))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let prober = Prober::new().unwrap();
    let result = prober.probe_provider(&custom_provider(server.uri())).await;

    assert!(result.success, "{result:?}");
    assert_eq!(result.message, format!("Connected ({}/models)", server.uri()));
}

#[tokio::test]
async fn provider_probe_stops_on_auth_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = Prober::new()
        .unwrap()
        .probe(ProbeTarget::Provider(&custom_provider(server.uri())))
        .await;

    assert!(!result.success);
    assert_eq!(result.message, "Authentication failed (401), check the API key");
}

#[tokio::test]
async fn provider_probe_reports_other_client_errors_as_reachable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = Prober::new()
        .unwrap()
        .probe_provider(&custom_provider(format!("{}/", server.uri())))
        .await;

    assert!(result.success);
    assert_eq!(result.message, "Service reachable (HTTP 404)");
}

#[tokio::test]
async fn provider_probe_fails_when_nothing_answers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(4)
        .mount(&server)
        .await;

    let base = server.uri();
    let result = Prober::new()
        .unwrap()
        .probe_provider(&custom_provider(base.clone()))
        .await;

    assert!(!result.success);
    assert_eq!(
        result.message,
        format!("Cannot connect to {}, check the address", base)
    );
}

#[tokio::test]
async fn official_provider_is_not_contacted() {
    let provider = Provider::new("official", ProviderType::Official, AppType::Codex);
    let result = Prober::new().unwrap().probe_provider(&provider).await;

    assert!(result.success);
    assert_eq!(result.latency_ms, 0);
    assert_eq!(result.message, "Official login needs no connection test");
}

#[tokio::test]
async fn http_mcp_probe_sends_initialize() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/mcp"))
        .and(body_partial_json(json!({
            "jsonrpc": "2.0",
            "method": "initialize",
            "params": {"protocolVersion": "2024-11-05"}
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"jsonrpc": "2.0", "id": 1, "result": {}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mcp = McpServer::remote("remote", TransportType::Http, format!("{}/mcp", server.uri()));
    let result = Prober::new().unwrap().probe_mcp_server(&mcp).await;

    assert!(result.success, "{result:?}");
    assert_eq!(result.message, "MCP server connected");
}

#[tokio::test]
async fn sse_mcp_probe_reports_auth_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sse"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let mcp = McpServer::remote("events", TransportType::Sse, format!("{}/sse", server.uri()));
    let result = Prober::new().unwrap().probe_mcp_server(&mcp).await;

    assert!(!result.success);
    assert_eq!(result.message, "Authentication failed (403)");
}

#[tokio::test]
async fn mcp_probe_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let mcp = McpServer::remote("slow", TransportType::Http, server.uri());
    let prober = Prober::with_timeout(Duration::from_millis(200)).unwrap();
    let result = prober.probe_mcp_server(&mcp).await;

    assert!(!result.success);
    assert_eq!(result.message, "Connection timed out (0.2s)");
}

#[tokio::test]
async fn stdio_mcp_probe_only_checks_configuration() {
    let mcp = McpServer::stdio("fs", "npx", ["-y", "pkg"]);
    let result = Prober::new().unwrap().probe(ProbeTarget::McpServer(&mcp)).await;

    assert!(result.success);
    assert_eq!(
        result.message,
        "Configuration valid (stdio: npx -y pkg). Stdio servers must be verified locally"
    );
}
