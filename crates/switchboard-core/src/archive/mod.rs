//! Zip packaging for tool exports, full backups and single-module dumps.
//!
//! Every entry is written with the same fixed modification time, so the same
//! input always produces byte-identical archives.

mod backup;

use std::io::{Cursor, Write};

use anyhow::Context;
use chrono::NaiveDate;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::client::Artifact;
use crate::model::Entity;

pub use backup::{
    BACKUP_FILES, BackupError, BackupSnapshot, build_backup_archive, read_backup_archive,
};

/// A finished download: suggested file name plus content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveBlob {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// `YYYY-MM-DD`, as used in every generated file name
pub fn date_stamp(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub(crate) fn entry_options() -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .last_modified_time(zip::DateTime::default())
        .unix_permissions(0o644)
}

/// Write `(path, bytes)` pairs into an in-memory zip, in order.
pub(crate) fn write_zip<'a>(
    entries: impl IntoIterator<Item = (String, &'a [u8])>,
) -> zip::result::ZipResult<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (path, bytes) in entries {
        writer.start_file(path, entry_options())?;
        writer.write_all(bytes)?;
    }
    Ok(writer.finish()?.into_inner())
}

/// Package one tool's artifact under `<app>-export-<date>/`.
pub fn build_export_archive(artifact: &Artifact, date: NaiveDate) -> anyhow::Result<ArchiveBlob> {
    let root = format!("{}-export-{}", artifact.app(), date_stamp(date));
    let bytes = write_zip(
        artifact
            .iter()
            .map(|(path, content)| (format!("{}/{}", root, path), content.as_bytes())),
    )
    .with_context(|| format!("Failed to build {} export archive", artifact.app()))?;

    tracing::debug!("Built {}.zip with {} file(s)", root, artifact.len());
    Ok(ArchiveBlob {
        file_name: format!("{}.zip", root),
        bytes,
    })
}

/// Dump one collection as a pretty JSON array, store columns already stripped.
pub fn export_module<T: Entity>(rows: &[T], date: NaiveDate) -> anyhow::Result<ArchiveBlob> {
    let json = serde_json::to_string_pretty(rows)
        .with_context(|| format!("Failed to serialize {}", T::COLLECTION))?;
    Ok(ArchiveBlob {
        file_name: format!("switchboard-{}-{}.json", T::COLLECTION, date_stamp(date)),
        bytes: json.into_bytes(),
    })
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use super::*;
    use crate::model::{McpServer, Prompt, Provider, ProviderType};
    use crate::types::{AppType, TargetFile};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 9).unwrap()
    }

    fn read_entries(bytes: &[u8]) -> Vec<(String, String)> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        (0..archive.len())
            .map(|i| {
                let mut file = archive.by_index(i).unwrap();
                let mut text = String::new();
                file.read_to_string(&mut text).unwrap();
                (file.name().to_string(), text)
            })
            .collect()
    }

    #[test]
    fn test_export_archive_layout() {
        let mut artifact = Artifact::new(AppType::Claude);
        artifact.insert_text("settings.json", "{}");
        artifact.insert_text("skills/pdf/SKILL.md", "x");

        let blob = build_export_archive(&artifact, date()).unwrap();
        assert_eq!(blob.file_name, "claude-export-2025-03-09.zip");
        assert_eq!(
            read_entries(&blob.bytes),
            vec![
                ("claude-export-2025-03-09/settings.json".to_string(), "{}".to_string()),
                ("claude-export-2025-03-09/skills/pdf/SKILL.md".to_string(), "x".to_string()),
            ]
        );
    }

    #[test]
    fn test_export_archive_is_deterministic() {
        let mut artifact = Artifact::new(AppType::Codex);
        artifact.insert_text("config.toml", "model = \"o4-mini\"\n");
        let first = build_export_archive(&artifact, date()).unwrap();
        let second = build_export_archive(&artifact, date()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_export_module_names_and_content() {
        let rows = vec![Provider::new("p", ProviderType::Custom, AppType::Claude)];
        let blob = export_module(&rows, date()).unwrap();
        assert_eq!(blob.file_name, "switchboard-providers-2025-03-09.json");
        let parsed: Vec<Provider> = serde_json::from_slice(&blob.bytes).unwrap();
        assert_eq!(parsed, rows);

        let blob = export_module::<McpServer>(&[], date()).unwrap();
        assert_eq!(blob.file_name, "switchboard-mcp_servers-2025-03-09.json");
        assert_eq!(blob.bytes, b"[]");

        let blob = export_module(&[Prompt::new("a", TargetFile::ClaudeMd, "")], date()).unwrap();
        assert!(String::from_utf8(blob.bytes).unwrap().contains("\n    \"target_file\": \"CLAUDE.md\""));
    }
}
