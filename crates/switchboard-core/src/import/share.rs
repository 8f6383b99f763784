//! Share links carrying providers without their credentials.
//!
//! The payload is `base64(uri_encode(json))` of the reduced provider list,
//! passed as the `data` query parameter of `<origin>/import`.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use url::Url;

use super::{ImportReport, insert_rows};
use crate::model::{Provider, ProviderType};
use crate::store::RecordStore;
use crate::types::{AppType, UserId};

pub const SHARE_QUERY_PARAM: &str = "data";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ShareLinkError {
    /// Any decoding failure; the cause is only logged
    #[error("Invalid import link")]
    Invalid,
}

/// The shareable projection of a provider. There is no key field, so a
/// credential can never end up in a link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedProvider {
    pub name: String,
    pub provider_type: ProviderType,
    pub base_url: Option<String>,
    pub app_type: AppType,
}

impl From<&Provider> for SharedProvider {
    fn from(provider: &Provider) -> Self {
        Self {
            name: provider.name.clone(),
            provider_type: provider.provider_type,
            base_url: provider.base_url.clone(),
            app_type: provider.app_type,
        }
    }
}

impl SharedProvider {
    /// The provider row created on import: enabled, no key.
    pub fn to_provider(&self, sort_order: i64) -> Provider {
        Provider {
            name: self.name.clone(),
            provider_type: self.provider_type,
            api_key: None,
            base_url: self.base_url.clone(),
            app_type: self.app_type,
            enabled: true,
            sort_order,
            model_config: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShareLink {
    providers: Vec<SharedProvider>,
}

impl ShareLink {
    /// Build a link from the enabled providers, in order.
    pub fn from_providers<'a>(providers: impl IntoIterator<Item = &'a Provider>) -> Self {
        Self {
            providers: providers
                .into_iter()
                .filter(|provider| provider.enabled)
                .map(SharedProvider::from)
                .collect(),
        }
    }

    pub fn providers(&self) -> &[SharedProvider] {
        &self.providers
    }

    /// The `data` payload
    pub fn encode(&self) -> String {
        // A list of plain structs always serializes.
        let json = serde_json::to_string(&self.providers).unwrap_or_else(|_| "[]".to_string());
        STANDARD.encode(urlencoding::encode(&json).as_bytes())
    }

    /// Full link under `origin`, e.g. `https://app.example/import?data=...`
    pub fn url(&self, origin: &str) -> anyhow::Result<String> {
        let base = Url::parse(origin)
            .map_err(|e| anyhow::anyhow!("Invalid share origin '{}': {}", origin, e))?;
        let mut url = base
            .join("/import")
            .map_err(|e| anyhow::anyhow!("Invalid share origin '{}': {}", origin, e))?;
        url.query_pairs_mut()
            .append_pair(SHARE_QUERY_PARAM, &self.encode());
        Ok(url.into())
    }

    /// Decode a `data` payload.
    pub fn decode(payload: &str) -> Result<Self, ShareLinkError> {
        // Links pasted without query encoding turn '+' into ' '.
        let payload: String = payload
            .trim()
            .chars()
            .map(|c| if c == ' ' { '+' } else { c })
            .collect();
        let bytes = STANDARD.decode(payload).map_err(|e| invalid("base64", e))?;
        let encoded = String::from_utf8(bytes).map_err(|e| invalid("utf-8", e))?;
        let json = urlencoding::decode(&encoded).map_err(|e| invalid("uri", e))?;
        let providers: Vec<SharedProvider> =
            serde_json::from_str(&json).map_err(|e| invalid("json", e))?;
        Ok(Self { providers })
    }

    /// Decode a full link, or a bare payload.
    pub fn from_url(link: &str) -> Result<Self, ShareLinkError> {
        let Ok(url) = Url::parse(link.trim()) else {
            return Self::decode(link);
        };
        let payload = url
            .query_pairs()
            .find(|(key, _)| key == SHARE_QUERY_PARAM)
            .map(|(_, value)| value.into_owned())
            .ok_or_else(|| invalid("query", "missing data parameter"))?;
        Self::decode(&payload)
    }

    /// Insert every shared provider for `user`.
    ///
    /// Each row is placed after the ones already imported from this link.
    pub fn import<S: RecordStore>(&self, store: &S, user: &UserId) -> ImportReport {
        let mut report = ImportReport {
            collection: "providers",
            inserted: 0,
            skipped: 0,
        };
        for shared in &self.providers {
            let row = shared.to_provider(report.inserted as i64);
            let single = insert_rows(store, user, [row]);
            report.inserted += single.inserted;
            report.skipped += single.skipped;
        }
        report
    }
}

fn invalid(stage: &str, cause: impl std::fmt::Display) -> ShareLinkError {
    tracing::debug!("Share link rejected at {} stage: {}", stage, cause);
    ShareLinkError::Invalid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn providers() -> Vec<Provider> {
        vec![
            Provider {
                api_key: Some("sk-secret".to_string()),
                base_url: Some("https://relay.example".to_string()),
                ..Provider::new("relay", ProviderType::Custom, AppType::Claude)
            },
            Provider {
                enabled: false,
                ..Provider::new("disabled", ProviderType::Custom, AppType::Claude)
            },
            Provider {
                api_key: Some("sk-other".to_string()),
                ..Provider::new("packy", ProviderType::Packycode, AppType::Codex)
            },
        ]
    }

    #[test]
    fn test_only_enabled_providers_are_shared() {
        let link = ShareLink::from_providers(&providers());
        let names: Vec<&str> = link.providers().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["relay", "packy"]);
    }

    #[test]
    fn test_payload_has_no_key() {
        let link = ShareLink::from_providers(&providers());
        let bytes = STANDARD.decode(link.encode()).unwrap();
        let json = urlencoding::decode(std::str::from_utf8(&bytes).unwrap())
            .unwrap()
            .into_owned();
        assert!(!json.contains("api_key"));
        assert!(!json.contains("sk-"));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            value[0],
            serde_json::json!({
                "name": "relay",
                "provider_type": "custom",
                "base_url": "https://relay.example",
                "app_type": "claude"
            })
        );
    }

    #[test]
    fn test_url_round_trip() {
        let link = ShareLink::from_providers(&providers());
        let url = link.url("https://switchboard.example/app").unwrap();
        assert!(url.starts_with("https://switchboard.example/import?data="));
        assert_eq!(ShareLink::from_url(&url).unwrap(), link);
    }

    #[test]
    fn test_decode_accepts_unescaped_plus() {
        let link = ShareLink::from_providers(&providers());
        let payload = link.encode().replace('+', " ");
        assert_eq!(ShareLink::decode(&payload).unwrap(), link);
    }

    #[test]
    fn test_malformed_links_are_invalid() {
        for bad in ["%%%", "bm90IGpzb24=", "https://x.example/import", "https://x.example/import?data=!!"] {
            assert_eq!(ShareLink::from_url(bad), Err(ShareLinkError::Invalid), "{bad}");
        }
        let object = STANDARD.encode(urlencoding::encode("{\"a\":1}").as_bytes());
        assert_eq!(ShareLink::decode(&object), Err(ShareLinkError::Invalid));
    }

    #[test]
    fn test_import_inserts_enabled_without_key() {
        let store = MemoryStore::new();
        let user = UserId::new("bob").unwrap();
        let link = ShareLink::from_providers(&providers());
        let report = link.import(&store, &user);
        assert_eq!(report.inserted, 2);

        let rows = store.list::<Provider>(&user).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.data.enabled && r.data.api_key.is_none()));
        assert_eq!(rows[0].data.sort_order, 0);
        assert_eq!(rows[1].data.sort_order, 1);
        assert_eq!(rows[1].data.name, "packy");
    }
}
