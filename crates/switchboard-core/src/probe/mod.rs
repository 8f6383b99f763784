//! Reachability checks for providers and MCP servers.
//!
//! A probe never fails: every outcome, including configuration problems and
//! network errors, is reported as a [`ProbeResult`].

use std::time::{Duration, Instant};

use anyhow::Context;
use serde::Serialize;
use serde_json::json;

use crate::model::{McpServer, Provider, ProviderType, TransportType};

/// Per-request timeout used unless configured otherwise
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// MCP protocol version sent in the `initialize` probe
const MCP_PROTOCOL_VERSION: &str = "2024-11-05";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeResult {
    pub success: bool,
    pub message: String,
    /// Milliseconds spent on the network; 0 when nothing was sent
    pub latency_ms: u64,
}

impl ProbeResult {
    fn ok(message: impl Into<String>, latency_ms: u64) -> Self {
        Self {
            success: true,
            message: message.into(),
            latency_ms,
        }
    }

    fn fail(message: impl Into<String>, latency_ms: u64) -> Self {
        Self {
            success: false,
            message: message.into(),
            latency_ms,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum ProbeTarget<'a> {
    Provider(&'a Provider),
    McpServer(&'a McpServer),
}

/// URLs tried for a provider, in order
pub fn candidate_urls(base_url: &str) -> Vec<String> {
    let base = base_url.strip_suffix('/').unwrap_or(base_url);
    vec![
        format!("{}/v1/models", base),
        format!("{}/models", base),
        format!("{}/health", base),
        base_url.to_string(),
    ]
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

fn is_auth_failure(status: u16) -> bool {
    status == 401 || status == 403
}

#[derive(Debug, Clone)]
pub struct Prober {
    client: reqwest::Client,
    timeout: Duration,
}

impl Prober {
    pub fn new() -> anyhow::Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("switchboard/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, timeout })
    }

    pub async fn probe(&self, target: ProbeTarget<'_>) -> ProbeResult {
        match target {
            ProbeTarget::Provider(provider) => self.probe_provider(provider).await,
            ProbeTarget::McpServer(server) => self.probe_mcp_server(server).await,
        }
    }

    /// Try the provider's candidate URLs one after another.
    ///
    /// The first response below 500 decides. A 401/403 stops the loop, since
    /// the same key will not work on another path either. Server errors,
    /// transport errors and timeouts fall through to the next candidate.
    pub async fn probe_provider(&self, provider: &Provider) -> ProbeResult {
        if provider.provider_type == ProviderType::Official {
            return ProbeResult::ok("Official login needs no connection test", 0);
        }
        let Some(base_url) = provider.effective_base_url() else {
            return ProbeResult::fail("No base URL configured, cannot test connection", 0);
        };

        let start = Instant::now();
        for url in candidate_urls(base_url) {
            let mut request = self
                .client
                .get(&url)
                .header(reqwest::header::CONTENT_TYPE, "application/json");
            if let Some(key) = provider.api_key() {
                request = request.bearer_auth(key);
            }

            let response = match request.send().await {
                Ok(response) => response,
                Err(e) => {
                    tracing::debug!("Probe {} failed: {}", url, e);
                    continue;
                }
            };
            let status = response.status().as_u16();
            if !(200..500).contains(&status) {
                tracing::debug!("Probe {} answered HTTP {}", url, status);
                continue;
            }
            if let Err(e) = response.bytes().await {
                tracing::debug!("Probe {} body unreadable: {}", url, e);
                continue;
            }

            let latency = elapsed_ms(start);
            return if status < 300 {
                ProbeResult::ok(format!("Connected ({})", url), latency)
            } else if is_auth_failure(status) {
                ProbeResult::fail(
                    format!("Authentication failed ({}), check the API key", status),
                    latency,
                )
            } else {
                ProbeResult::ok(format!("Service reachable (HTTP {})", status), latency)
            };
        }

        ProbeResult::fail(
            format!("Cannot connect to {}, check the address", base_url),
            elapsed_ms(start),
        )
    }

    /// Check an MCP server.
    ///
    /// Stdio servers only get a completeness check. Remote servers get one
    /// request: `GET` for SSE, a JSON-RPC `initialize` `POST` for HTTP. The
    /// response body is not read, as an SSE stream never ends.
    pub async fn probe_mcp_server(&self, server: &McpServer) -> ProbeResult {
        if server.transport_type == TransportType::Stdio {
            let command = server.command_or_empty();
            if command.trim().is_empty() {
                return ProbeResult::fail("No command configured", 0);
            }
            return ProbeResult::ok(
                format!(
                    "Configuration valid (stdio: {} {}). Stdio servers must be verified locally",
                    command,
                    server.args.join(" ")
                ),
                0,
            );
        }

        let url = server.url_or_empty();
        if url.trim().is_empty() {
            return ProbeResult::fail("No URL configured", 0);
        }

        let request = match server.transport_type {
            TransportType::Sse => self.client.get(url),
            _ => self.client.post(url).json(&json!({
                "jsonrpc": "2.0",
                "method": "initialize",
                "id": 1,
                "params": {
                    "protocolVersion": MCP_PROTOCOL_VERSION,
                    "capabilities": {},
                    "clientInfo": { "name": "switchboard-probe", "version": env!("CARGO_PKG_VERSION") }
                }
            })),
        };

        let start = Instant::now();
        let result = request
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await;
        let latency = elapsed_ms(start);

        match result {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    ProbeResult::ok("MCP server connected", latency)
                } else if is_auth_failure(status.as_u16()) {
                    ProbeResult::fail(
                        format!("Authentication failed ({})", status.as_u16()),
                        latency,
                    )
                } else {
                    ProbeResult::ok(
                        format!("Service reachable (HTTP {})", status.as_u16()),
                        latency,
                    )
                }
            }
            Err(e) if e.is_timeout() => ProbeResult::fail(
                format!("Connection timed out ({}s)", self.timeout.as_secs_f32()),
                latency,
            ),
            Err(e) => ProbeResult::fail(format!("Connection failed: {}", e), latency),
        }
    }
}
