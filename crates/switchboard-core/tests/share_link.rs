use switchboard_core::commands::{ExportCommand, ProviderCommand};
use switchboard_core::import::ShareLink;
use switchboard_core::model::{Provider, ProviderType};
use switchboard_core::query::RecordQuery;
use switchboard_core::store::MemoryStore;
use switchboard_core::types::{AppType, UserId};

fn user(name: &str) -> UserId {
    UserId::new(name).unwrap()
}

#[test]
fn share_link_carries_enabled_providers_without_keys() {
    let store = MemoryStore::new();
    let providers = ProviderCommand::new(&store, user("alice"));
    providers
        .add(Provider {
            api_key: Some("sk-secret".to_string()),
            base_url: Some("https://relay.example".to_string()),
            ..Provider::new("relay", ProviderType::Custom, AppType::Claude)
        })
        .unwrap();
    providers
        .add(Provider::new("packy", ProviderType::Packycode, AppType::Codex))
        .unwrap();
    providers
        .add(Provider {
            enabled: false,
            ..Provider::new("off", ProviderType::Custom, AppType::Gemini)
        })
        .unwrap();

    let link = ExportCommand::new(&store, user("alice"))
        .share_link()
        .unwrap();
    let url = link.url("https://switchboard.example").unwrap();
    assert!(url.starts_with("https://switchboard.example/import?data="));
    assert!(!url.contains("sk-secret"));

    let report = ExportCommand::new(&store, user("bob"))
        .import_share_link(&url)
        .unwrap();
    assert_eq!(report.inserted, 2);

    let imported = ProviderCommand::new(&store, user("bob"))
        .list(&RecordQuery::default())
        .unwrap();
    let names: Vec<&str> = imported.iter().map(|r| r.data.name.as_str()).collect();
    assert_eq!(names, vec!["relay", "packy"]);
    assert!(imported.iter().all(|r| r.data.api_key.is_none()));
    assert_eq!(imported[0].data.base_url.as_deref(), Some("https://relay.example"));
}

#[test]
fn bare_payload_and_mangled_plus_signs_decode() {
    let link = ShareLink::from_providers(&[Provider::new(
        "relay with spaces & symbols?",
        ProviderType::Custom,
        AppType::Claude,
    )]);
    let payload = link.encode();

    assert_eq!(ShareLink::from_url(&payload).unwrap(), link);
    assert_eq!(ShareLink::from_url(&payload.replace('+', " ")).unwrap(), link);
}

#[test]
fn garbage_link_is_rejected_without_inserts() {
    let store = MemoryStore::new();
    let export = ExportCommand::new(&store, user("alice"));

    assert!(export.import_share_link("https://x.example/import?data=%%%").is_err());
    assert!(export.import_share_link("https://x.example/import").is_err());
    assert!(export.import_share_link("not base64 at all!").is_err());
    assert_eq!(
        ProviderCommand::new(&store, user("alice")).count().unwrap(),
        0
    );
}
