use std::io::Read;

use chrono::NaiveDate;
use serde_json::{Value, json};
use tempfile::TempDir;

use switchboard_core::commands::{
    ExportCommand, McpCommand, ModuleKind, PromptCommand, ProviderCommand, RepoCommand,
    SkillCommand,
};
use switchboard_core::model::{
    McpServer, ModelConfig, Prompt, Provider, ProviderType, Skill, SkillsRepo,
};
use switchboard_core::query::RecordQuery;
use switchboard_core::store::{FileStore, RecordStore};
use switchboard_core::types::{AppType, TargetFile, UserId};

fn user(name: &str) -> UserId {
    UserId::new(name).unwrap()
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
}

fn zip_entries(bytes: &[u8]) -> Vec<(String, String)> {
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
    let mut entries = Vec::new();
    for i in 0..archive.len() {
        let mut file = archive.by_index(i).unwrap();
        let mut content = String::new();
        file.read_to_string(&mut content).unwrap();
        entries.push((file.name().to_string(), content));
    }
    entries
}

/// One of everything, for the `alice` partition
fn seed(store: &FileStore) {
    let alice = user("alice");

    ProviderCommand::new(store, alice.clone())
        .add(Provider {
            api_key: Some("sk-1".to_string()),
            base_url: Some("https://api.x.com".to_string()),
            model_config: Some(ModelConfig::with_model("m1")),
            ..Provider::new("relay", ProviderType::Custom, AppType::Claude)
        })
        .unwrap();

    McpCommand::new(store, alice.clone())
        .create(McpServer::stdio("fetch", "npx", ["-y", "@anthropics/mcp-fetch"]))
        .unwrap();

    PromptCommand::new(store, alice.clone())
        .add(Prompt::new("rules", TargetFile::ClaudeMd, "Be terse.").activated())
        .unwrap();

    let skills = SkillCommand::new(store, alice.clone());
    let pdf = skills
        .create(Skill::new("pdf", Some("Read PDFs".to_string())))
        .unwrap();
    skills.set_installed(pdf.id, true).unwrap();
    skills.create(Skill::new("unused", None)).unwrap();

    RepoCommand::new(store, alice)
        .add_repo(SkillsRepo::new("anthropics", "skills"))
        .unwrap();
}

#[test]
fn claude_export_archive_from_file_store() {
    let temp = TempDir::new().unwrap();
    let store = FileStore::new(temp.path().to_path_buf());
    seed(&store);

    let blob = ExportCommand::new(&store, user("alice"))
        .export_archive(AppType::Claude, date())
        .unwrap();
    assert_eq!(blob.file_name, "claude-export-2025-01-15.zip");

    let entries = zip_entries(&blob.bytes);
    let names: Vec<&str> = entries.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "claude-export-2025-01-15/settings.json",
            "claude-export-2025-01-15/CLAUDE.md",
            "claude-export-2025-01-15/skills/pdf/SKILL.md",
        ]
    );

    let settings: Value = serde_json::from_str(&entries[0].1).unwrap();
    assert_eq!(settings["env"]["ANTHROPIC_AUTH_TOKEN"], "sk-1");
    assert_eq!(settings["env"]["ANTHROPIC_BASE_URL"], "https://api.x.com");
    assert_eq!(settings["model"], "m1");
    assert_eq!(
        settings["mcpServers"]["fetch"],
        json!({"command": "npx", "args": ["-y", "@anthropics/mcp-fetch"]})
    );
    assert_eq!(entries[1].1, "Be terse.");
    assert!(entries[2].1.contains("name: pdf"));
}

#[test]
fn export_is_byte_identical_across_runs() {
    let temp = TempDir::new().unwrap();
    let store = FileStore::new(temp.path().to_path_buf());
    seed(&store);
    let export = ExportCommand::new(&store, user("alice"));

    for app in AppType::ALL {
        let first = export.export_archive(app, date()).unwrap();
        let second = export.export_archive(app, date()).unwrap();
        assert_eq!(first, second, "{app} export changed between runs");
    }
}

#[test]
fn users_do_not_see_each_other() {
    let temp = TempDir::new().unwrap();
    let store = FileStore::new(temp.path().to_path_buf());
    seed(&store);

    let bob = ProviderCommand::new(&store, user("bob"));
    assert!(bob.list(&RecordQuery::default()).unwrap().is_empty());

    let stats = ExportCommand::new(&store, user("bob")).stats().unwrap();
    assert!(stats.iter().all(|s| s.providers == 0 && s.mcp_servers == 0 && !s.has_prompt));
}

#[test]
fn stats_follow_selection_rules() {
    let temp = TempDir::new().unwrap();
    let store = FileStore::new(temp.path().to_path_buf());
    seed(&store);

    let stats = ExportCommand::new(&store, user("alice")).stats().unwrap();
    let claude = stats.iter().find(|s| s.app == AppType::Claude).unwrap();
    assert_eq!(claude.providers, 1);
    assert_eq!(claude.mcp_servers, 1);
    assert_eq!(claude.skills, 1);
    assert!(claude.has_prompt);

    let codex = stats.iter().find(|s| s.app == AppType::Codex).unwrap();
    assert_eq!(codex.providers, 0);
    assert_eq!(codex.mcp_servers, 1);
    assert!(!codex.has_prompt);
}

#[test]
fn backup_restores_into_another_user() {
    let temp = TempDir::new().unwrap();
    let store = FileStore::new(temp.path().to_path_buf());
    seed(&store);

    let blob = ExportCommand::new(&store, user("alice"))
        .backup(date())
        .unwrap();
    assert_eq!(blob.file_name, "switchboard-backup-2025-01-15.zip");

    let reports = ExportCommand::new(&store, user("carol"))
        .restore_backup(&blob.bytes)
        .unwrap();
    assert!(reports.iter().all(|r| r.skipped == 0), "{reports:?}");

    let carol = user("carol");
    assert_eq!(store.count::<Provider>(&carol).unwrap(), 1);
    assert_eq!(store.count::<McpServer>(&carol).unwrap(), 1);
    assert_eq!(store.count::<Prompt>(&carol).unwrap(), 1);
    assert_eq!(store.count::<Skill>(&carol).unwrap(), 2);
    assert_eq!(store.count::<SkillsRepo>(&carol).unwrap(), 1);

    // Restored records export the same configuration
    let original = ExportCommand::new(&store, user("alice"))
        .assemble(AppType::Claude)
        .unwrap();
    let restored = ExportCommand::new(&store, carol)
        .assemble(AppType::Claude)
        .unwrap();
    assert_eq!(original, restored);
}

#[test]
fn module_export_imports_back() {
    let temp = TempDir::new().unwrap();
    let store = FileStore::new(temp.path().to_path_buf());
    seed(&store);

    let blob = ExportCommand::new(&store, user("alice"))
        .export_module(ModuleKind::McpServers, date())
        .unwrap();
    assert_eq!(blob.file_name, "switchboard-mcp_servers-2025-01-15.json");

    let json = String::from_utf8(blob.bytes).unwrap();
    assert!(!json.contains("user_id"));

    let report = ExportCommand::new(&store, user("dave"))
        .import_module(&json)
        .unwrap();
    assert_eq!(report.collection, "mcp_servers");
    assert_eq!(report.inserted, 1);

    let servers = store.list::<McpServer>(&user("dave")).unwrap();
    assert_eq!(servers[0].data.name, "fetch");
}

#[test]
fn malformed_import_inserts_nothing() {
    let temp = TempDir::new().unwrap();
    let store = FileStore::new(temp.path().to_path_buf());
    let export = ExportCommand::new(&store, user("erin"));

    assert!(export.import_module("{not json").is_err());
    assert!(export.import_module("{\"name\": \"x\"}").is_err());
    assert!(export.import_module("[]").is_err());
    assert_eq!(store.count::<Provider>(&user("erin")).unwrap(), 0);
}

#[test]
fn bad_row_does_not_sink_module_import() {
    let temp = TempDir::new().unwrap();
    let store = FileStore::new(temp.path().to_path_buf());
    let json = json!([
        {"name": "p1", "provider_type": "custom", "app_type": "claude"},
        {"name": "p2", "provider_type": "custom", "app_type": "cursor"},
        {"name": "p3", "provider_type": "custom", "app_type": "codex"}
    ])
    .to_string();

    let report = ExportCommand::new(&store, user("frank"))
        .import_module(&json)
        .unwrap();
    assert_eq!(report.collection, "providers");
    assert_eq!(report.inserted, 2);
    assert_eq!(report.skipped, 1);
    assert_eq!(store.count::<Provider>(&user("frank")).unwrap(), 2);
}

#[test]
fn imported_rows_get_fresh_identity() {
    let temp = TempDir::new().unwrap();
    let store = FileStore::new(temp.path().to_path_buf());
    let input_id = "00000000-0000-0000-0000-000000000001";
    let json = json!([{
        "id": input_id,
        "user_id": "mallory",
        "created_at": "2020-01-01T00:00:00Z",
        "updated_at": "2020-01-01T00:00:00Z",
        "name": "rules",
        "target_file": "CLAUDE.md",
        "content": "Be terse."
    }])
    .to_string();

    ExportCommand::new(&store, user("grace"))
        .import_module(&json)
        .unwrap();

    let rows = store.list::<Prompt>(&user("grace")).unwrap();
    assert_eq!(rows.len(), 1);
    assert_ne!(rows[0].id.to_string(), input_id);
    assert_eq!(rows[0].user_id, user("grace"));
    assert!(rows[0].created_at.date_naive() > NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
    assert_eq!(rows[0].data.content, "Be terse.");
    assert_eq!(store.count::<Prompt>(&user("mallory")).unwrap(), 0);
}
