//! MCP server operations.

use uuid::Uuid;

use super::RecordCommand;
use crate::model::{McpServer, Record};
use crate::presets::McpTemplate;
use crate::store::RecordStore;
use crate::types::AppType;

impl<S: RecordStore> RecordCommand<'_, S, McpServer> {
    pub fn add_template(&self, template: &McpTemplate) -> anyhow::Result<Record<McpServer>> {
        self.create(template.build())
    }

    pub fn toggle(&self, id: Uuid) -> anyhow::Result<Record<McpServer>> {
        self.modify(id, |server| server.enabled = !server.enabled)
    }

    /// Replace the set of tools a server is emitted for
    pub fn bind(&self, id: Uuid, apps: &[AppType]) -> anyhow::Result<Record<McpServer>> {
        if apps.is_empty() {
            anyhow::bail!("An MCP server needs at least one app binding");
        }
        self.modify(id, |server| {
            server.app_bindings.clear();
            for app in apps {
                if !server.app_bindings.contains(app) {
                    server.app_bindings.push(*app);
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::McpCommand;
    use crate::store::MemoryStore;
    use crate::types::UserId;

    #[test]
    fn test_template_toggle_and_bind() {
        let store = MemoryStore::new();
        let command = McpCommand::new(&store, UserId::new("fay").unwrap());
        let record = command
            .add_template(McpTemplate::find("mcp-memory").unwrap())
            .unwrap();
        assert_eq!(record.data.command.as_deref(), Some("npx"));

        assert!(!command.toggle(record.id).unwrap().data.enabled);

        let bound = command
            .bind(record.id, &[AppType::Codex, AppType::Gemini, AppType::Codex])
            .unwrap();
        assert_eq!(bound.data.app_bindings, vec![AppType::Codex, AppType::Gemini]);
        assert!(command.bind(record.id, &[]).is_err());
    }
}
