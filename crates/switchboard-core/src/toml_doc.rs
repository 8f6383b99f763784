//! Minimal line-oriented TOML writer.
//!
//! Tool configs such as Codex's `config.toml` are expected in a specific,
//! hand-readable layout (leading comments, dotted `env.KEY` keys, one table per
//! server), which a generic serializer does not reproduce. This writer keeps
//! that layout while owning every quoting and escaping decision in one place.

use std::fmt::Write as _;

/// A scalar or array value.
#[derive(Debug, Clone, PartialEq)]
pub enum TomlValue {
    String(String),
    Integer(i64),
    Boolean(bool),
    Array(Vec<TomlValue>),
}

impl From<&str> for TomlValue {
    fn from(value: &str) -> Self {
        TomlValue::String(value.to_string())
    }
}

impl From<String> for TomlValue {
    fn from(value: String) -> Self {
        TomlValue::String(value)
    }
}

impl From<i64> for TomlValue {
    fn from(value: i64) -> Self {
        TomlValue::Integer(value)
    }
}

impl From<bool> for TomlValue {
    fn from(value: bool) -> Self {
        TomlValue::Boolean(value)
    }
}

impl<T: Into<TomlValue>> From<Vec<T>> for TomlValue {
    fn from(values: Vec<T>) -> Self {
        TomlValue::Array(values.into_iter().map(Into::into).collect())
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Line {
    Comment(String),
    Blank,
    Table(Vec<String>),
    KeyValue { key: Vec<String>, value: TomlValue },
}

/// An ordered list of TOML lines rendered exactly as pushed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TomlDocument {
    lines: Vec<Line>,
}

impl TomlDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn comment(&mut self, text: impl Into<String>) -> &mut Self {
        self.lines.push(Line::Comment(text.into()));
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.lines.push(Line::Blank);
        self
    }

    /// Start a `[a.b.c]` table
    pub fn table<S: AsRef<str>>(&mut self, path: &[S]) -> &mut Self {
        self.lines.push(Line::Table(
            path.iter().map(|segment| segment.as_ref().to_string()).collect(),
        ));
        self
    }

    /// `key = value`
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<TomlValue>) -> &mut Self {
        self.lines.push(Line::KeyValue {
            key: vec![key.into()],
            value: value.into(),
        });
        self
    }

    /// `a.b = value`
    pub fn set_dotted<S: AsRef<str>>(
        &mut self,
        key: &[S],
        value: impl Into<TomlValue>,
    ) -> &mut Self {
        self.lines.push(Line::KeyValue {
            key: key.iter().map(|segment| segment.as_ref().to_string()).collect(),
            value: value.into(),
        });
        self
    }

    /// Render with `\n` line endings and a trailing newline.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            match line {
                Line::Comment(text) => {
                    for part in text.lines() {
                        let _ = writeln!(out, "# {part}");
                    }
                    if text.is_empty() {
                        out.push_str("#\n");
                    }
                }
                Line::Blank => out.push('\n'),
                Line::Table(path) => {
                    let _ = writeln!(out, "[{}]", format_path(path));
                }
                Line::KeyValue { key, value } => {
                    let _ = writeln!(out, "{} = {}", format_path(key), format_value(value));
                }
            }
        }
        out
    }
}

/// Whether `key` can be written without quotes
pub fn is_bare_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Replace every character outside `[A-Za-z0-9_-]` with `_`.
pub fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

pub fn format_key(key: &str) -> String {
    if is_bare_key(key) {
        key.to_string()
    } else {
        quote(key)
    }
}

fn format_path(path: &[String]) -> String {
    path.iter()
        .map(|segment| format_key(segment))
        .collect::<Vec<_>>()
        .join(".")
}

pub fn format_value(value: &TomlValue) -> String {
    match value {
        TomlValue::String(s) => quote(s),
        TomlValue::Integer(i) => i.to_string(),
        TomlValue::Boolean(b) => b.to_string(),
        TomlValue::Array(items) => {
            let rendered: Vec<String> = items.iter().map(format_value).collect();
            format!("[{}]", rendered.join(", "))
        }
    }
}

/// Quote as a TOML basic string.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_escapes_backslashes_before_quotes() {
        assert_eq!(quote(r#"C:\path "x""#), r#""C:\\path \"x\"""#);
        assert_eq!(quote("a\nb\tc"), r#""a\nb\tc""#);
        assert_eq!(quote("\u{1}"), r#""\u0001""#);
    }

    #[test]
    fn test_sanitize_key() {
        assert_eq!(sanitize_key("my server.v2"), "my_server_v2");
        assert_eq!(sanitize_key("ok_name-1"), "ok_name-1");
        assert_eq!(sanitize_key("文件"), "__");
    }

    #[test]
    fn test_format_key_quotes_non_bare_keys() {
        assert_eq!(format_key("API_KEY"), "API_KEY");
        assert_eq!(format_key("MY.VAR"), "\"MY.VAR\"");
        assert_eq!(format_key(""), "\"\"");
    }

    #[test]
    fn test_render_layout() {
        let mut doc = TomlDocument::new();
        doc.comment("header").blank().set("model", "o4-mini");
        doc.blank()
            .table(&["mcp_servers", "fs"])
            .set("args", vec!["-y", "pkg"])
            .set("empty", Vec::<String>::new())
            .set_dotted(&["env", "TOKEN"], "abc");

        assert_eq!(
            doc.render(),
            "# header\n\nmodel = \"o4-mini\"\n\n[mcp_servers.fs]\nargs = [\"-y\", \"pkg\"]\nempty = []\nenv.TOKEN = \"abc\"\n"
        );
    }

    #[test]
    fn test_rendered_document_parses() {
        let mut doc = TomlDocument::new();
        doc.set("quote", "say \"hi\" \\o/")
            .set("n", 3_i64)
            .set("flag", true)
            .table(&["t", "odd name"])
            .set_dotted(&["env", "A.B"], "v");

        let parsed: toml::Value = toml::from_str(&doc.render()).expect("valid toml");
        assert_eq!(parsed["quote"].as_str(), Some("say \"hi\" \\o/"));
        assert_eq!(parsed["t"]["odd name"]["env"]["A.B"].as_str(), Some("v"));
    }
}
