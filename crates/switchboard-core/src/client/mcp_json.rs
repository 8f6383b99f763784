//! JSON encoding of MCP servers shared by Claude Code, Gemini CLI and OpenCode.

use serde_json::{Map, Value, json};

use crate::model::{McpServer, TransportType};

/// The `mcpServers` object shape where remote servers carry a `type` tag.
///
/// - stdio: `{ "command", "args", "env"? }` (`env` only when non-empty)
/// - http/sse: `{ "type": "<transport>", "url" }`
///
/// Servers are keyed by name; when two servers share a name the later one
/// replaces the earlier one.
#[derive(Debug, Default, Clone, Copy)]
pub struct TaggedMcpEncoding;

impl TaggedMcpEncoding {
    pub fn render_servers(servers: &[&McpServer]) -> Map<String, Value> {
        let mut map = Map::new();
        for server in servers {
            map.insert(server.name.clone(), Self::render_server(server));
        }
        map
    }

    pub fn render_server(server: &McpServer) -> Value {
        match server.transport_type {
            TransportType::Stdio => {
                let mut entry = Map::new();
                entry.insert("command".to_string(), json!(server.command_or_empty()));
                entry.insert("args".to_string(), json!(server.args));
                if !server.env.is_empty() {
                    entry.insert("env".to_string(), json!(server.env));
                }
                Value::Object(entry)
            }
            TransportType::Http | TransportType::Sse => json!({
                "type": server.transport_type.as_str(),
                "url": server.url_or_empty(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stdio_omits_empty_env() {
        let server = McpServer::stdio("fs", "npx", ["-y", "pkg"]);
        assert_eq!(
            TaggedMcpEncoding::render_server(&server),
            json!({"command": "npx", "args": ["-y", "pkg"]})
        );

        let server = server.with_env("TOKEN", "abc");
        assert_eq!(
            TaggedMcpEncoding::render_server(&server),
            json!({"command": "npx", "args": ["-y", "pkg"], "env": {"TOKEN": "abc"}})
        );
    }

    #[test]
    fn test_remote_servers_are_type_tagged() {
        let http = McpServer::remote("web", TransportType::Http, "https://x");
        assert_eq!(
            TaggedMcpEncoding::render_server(&http),
            json!({"type": "http", "url": "https://x"})
        );
        let sse = McpServer::remote("events", TransportType::Sse, "https://y/sse");
        assert_eq!(
            TaggedMcpEncoding::render_server(&sse),
            json!({"type": "sse", "url": "https://y/sse"})
        );
    }

    #[test]
    fn test_stdio_without_command_is_still_emitted() {
        let mut server = McpServer::stdio("broken", "", Vec::<String>::new());
        server.command = None;
        assert_eq!(
            TaggedMcpEncoding::render_server(&server),
            json!({"command": "", "args": []})
        );
    }

    #[test]
    fn test_duplicate_names_last_write_wins() {
        let first = McpServer::stdio("dup", "first", Vec::<String>::new());
        let second = McpServer::remote("dup", TransportType::Http, "https://second");
        let map = TaggedMcpEncoding::render_servers(&[&first, &second]);
        assert_eq!(map.len(), 1);
        assert_eq!(map["dup"], json!({"type": "http", "url": "https://second"}));
    }
}
