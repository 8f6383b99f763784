//! TOML parser with helpful error messages

use std::path::Path;

use anyhow::{Context, Result};

use super::schema::Settings;

/// Parse switchboard.toml with detailed error messages
pub fn parse_settings(path: &Path) -> Result<Settings> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_settings_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse switchboard.toml content from string
pub fn parse_settings_str(content: &str) -> Result<Settings> {
    let settings: Settings =
        toml::from_str(content).map_err(|e| enhance_toml_error(e, content))?;
    settings.validate()?;
    Ok(settings)
}

fn enhance_toml_error(error: toml::de::Error, content: &str) -> anyhow::Error {
    let message = error.message().to_string();
    match error.span() {
        Some(span) => {
            let line_num = content[..span.start.min(content.len())].matches('\n').count() + 1;
            anyhow::anyhow!(
                "TOML parsing error at line {}:\n{}\n\nError: {}",
                line_num,
                line_context(content, line_num),
                message
            )
        }
        None => anyhow::anyhow!("TOML parsing error: {}", message),
    }
}

/// Lines around `line_num`, the offending one marked
fn line_context(content: &str, line_num: usize) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let start = line_num.saturating_sub(2);
    let end = (line_num + 2).min(lines.len());

    lines
        .get(start..end)
        .unwrap_or_default()
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let num = start + i + 1;
            let marker = if num == line_num { ">>>" } else { "   " };
            format!("{} {:4} | {}", marker, num, line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Serialize settings to a TOML string
pub fn to_toml(settings: &Settings) -> Result<String> {
    toml::to_string_pretty(settings).context("Failed to serialize settings to TOML")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_settings() {
        assert_eq!(parse_settings_str("").unwrap(), Settings::default());
    }

    #[test]
    fn test_parse_partial_settings() {
        let settings = parse_settings_str(
            r#"
user = "alice"

[probe]
timeout_secs = 3
"#,
        )
        .unwrap();
        assert_eq!(settings.user, "alice");
        assert_eq!(settings.probe.timeout().as_secs(), 3);
        assert_eq!(settings.optimizer.model, "google/gemini-2.5-flash");
    }

    #[test]
    fn test_syntax_error_points_at_line() {
        let err = parse_settings_str("user = \"a\"\nprobe = 5\n").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("TOML parsing error at line 2"), "{message}");
        assert!(message.contains(">>>    2 | probe = 5"), "{message}");
    }

    #[test]
    fn test_validation_errors() {
        assert!(parse_settings_str("user = \"../x\"").is_err());
        assert!(parse_settings_str("[probe]\ntimeout_secs = 0").is_err());
        assert!(parse_settings_str("share_origin = \"not a url\"").is_err());
    }

    #[test]
    fn test_round_trip_through_toml() {
        let settings = Settings {
            user: "bob".to_string(),
            ..Settings::default()
        };
        let text = to_toml(&settings).unwrap();
        assert_eq!(parse_settings_str(&text).unwrap(), settings);
    }
}
