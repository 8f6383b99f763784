//! Table and JSON rendering for command results.

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;
use switchboard_core::client::AppStats;
use switchboard_core::commands::SHORT_ID_LEN;
use switchboard_core::import::ImportReport;
use switchboard_core::model::{McpServer, Prompt, Provider, Record, Skill, SkillsRepo};
use switchboard_core::optimize::OptimizeRun;
use switchboard_core::probe::ProbeResult;
use uuid::Uuid;

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// Machine-readable JSON
    Json,
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}

fn short_id(id: &Uuid) -> String {
    id.to_string().chars().take(SHORT_ID_LEN).collect()
}

/// `••••••` plus the last four characters, or "not set"
pub fn mask_key(key: Option<&str>) -> String {
    match key.filter(|k| !k.is_empty()) {
        Some(key) => {
            let chars: Vec<char> = key.chars().collect();
            let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
            format!("••••••{}", tail)
        }
        None => "not set".to_string(),
    }
}

fn mark(on: bool) -> &'static str {
    if on { "✓" } else { "✗" }
}

pub fn print_providers(records: &[Record<Provider>], format: OutputFormat) -> Result<()> {
    if let OutputFormat::Json = format {
        return print_json(records);
    }
    if records.is_empty() {
        println!("No providers configured.");
        println!("Add one with: switchboard provider add <name> --type custom --app claude");
        return Ok(());
    }

    println!(
        "{:<10} {:<20} {:<10} {:<9} {:<3} {:<12} Base URL",
        "ID", "Name", "Type", "App", "On", "API Key"
    );
    println!("{}", "-".repeat(90));
    for record in records {
        let provider = &record.data;
        println!(
            "{:<10} {:<20} {:<10} {:<9} {:<3} {:<12} {}",
            short_id(&record.id),
            truncate(&provider.name, 20),
            provider.provider_type.as_str(),
            provider.app_type,
            mark(provider.enabled),
            mask_key(provider.api_key.as_deref()),
            provider.effective_base_url().unwrap_or("-")
        );
    }
    Ok(())
}

pub fn print_mcp_servers(records: &[Record<McpServer>], format: OutputFormat) -> Result<()> {
    if let OutputFormat::Json = format {
        return print_json(records);
    }
    if records.is_empty() {
        println!("No MCP servers configured.");
        println!("Add one with: switchboard mcp template mcp-fetch");
        return Ok(());
    }

    println!(
        "{:<10} {:<20} {:<6} {:<3} {:<24} Target",
        "ID", "Name", "Type", "On", "Apps"
    );
    println!("{}", "-".repeat(90));
    for record in records {
        let server = &record.data;
        let apps: Vec<&str> = server.app_bindings.iter().map(|a| a.as_str()).collect();
        let target = if server.transport_type.is_remote() {
            server.url_or_empty().to_string()
        } else {
            format!("{} {}", server.command_or_empty(), server.args.join(" "))
        };
        println!(
            "{:<10} {:<20} {:<6} {:<3} {:<24} {}",
            short_id(&record.id),
            truncate(&server.name, 20),
            server.transport_type.as_str(),
            mark(server.enabled),
            apps.join(","),
            truncate(target.trim(), 40)
        );
    }
    Ok(())
}

pub fn print_prompts(records: &[Record<Prompt>], format: OutputFormat) -> Result<()> {
    if let OutputFormat::Json = format {
        return print_json(records);
    }
    if records.is_empty() {
        println!("No prompts configured.");
        return Ok(());
    }

    println!("{:<10} {:<24} {:<12} {:<7} Size", "ID", "Name", "File", "Active");
    println!("{}", "-".repeat(70));
    for record in records {
        let prompt = &record.data;
        println!(
            "{:<10} {:<24} {:<12} {:<7} {} chars",
            short_id(&record.id),
            truncate(&prompt.name, 24),
            prompt.target_file,
            mark(prompt.is_active),
            prompt.content.chars().count()
        );
    }
    Ok(())
}

pub fn print_optimize_history(records: &[Record<OptimizeRun>], format: OutputFormat) -> Result<()> {
    if let OutputFormat::Json = format {
        return print_json(records);
    }
    if records.is_empty() {
        println!("No optimizer runs saved.");
        return Ok(());
    }

    println!("{:<10} {:<17} {:<24} Output", "ID", "When", "Template");
    println!("{}", "-".repeat(80));
    for record in records {
        let run = &record.data;
        let first_line = run.output().lines().next().unwrap_or_default();
        println!(
            "{:<10} {:<17} {:<24} {}",
            short_id(&record.id),
            record.created_at.format("%Y-%m-%d %H:%M"),
            run.template_id,
            truncate(first_line, 40)
        );
    }
    Ok(())
}

pub fn print_skills(records: &[Record<Skill>], format: OutputFormat) -> Result<()> {
    if let OutputFormat::Json = format {
        return print_json(records);
    }
    if records.is_empty() {
        println!("No skills recorded.");
        println!("Scan a repository with: switchboard repo scan <owner/repo>");
        return Ok(());
    }

    println!("{:<10} {:<28} {:<10} Description", "ID", "Name", "Installed");
    println!("{}", "-".repeat(90));
    for record in records {
        let skill = &record.data;
        println!(
            "{:<10} {:<28} {:<10} {}",
            short_id(&record.id),
            truncate(&skill.name, 28),
            mark(skill.installed),
            truncate(skill.description_or_empty(), 50)
        );
    }
    Ok(())
}

pub fn print_repos(records: &[Record<SkillsRepo>], format: OutputFormat) -> Result<()> {
    if let OutputFormat::Json = format {
        return print_json(records);
    }
    if records.is_empty() {
        println!("No skills repositories registered.");
        println!("Add one with: switchboard repo add anthropics/skills");
        return Ok(());
    }

    println!("{:<10} {:<36} {:<10} Subdirectory", "ID", "Repository", "Branch");
    println!("{}", "-".repeat(70));
    for record in records {
        let repo = &record.data;
        println!(
            "{:<10} {:<36} {:<10} {}",
            short_id(&record.id),
            truncate(&repo.full_name(), 36),
            repo.branch,
            if repo.subdirectory.is_empty() { "-" } else { &repo.subdirectory }
        );
    }
    Ok(())
}

pub fn print_stats(stats: &[AppStats], format: OutputFormat) -> Result<()> {
    if let OutputFormat::Json = format {
        return print_json(stats);
    }
    println!("{:<12} {:<10} {:<6} {:<7} Prompt", "App", "Providers", "MCP", "Skills");
    println!("{}", "-".repeat(50));
    for entry in stats {
        println!(
            "{:<12} {:<10} {:<6} {:<7} {}",
            entry.app.label(),
            entry.providers,
            entry.mcp_servers,
            entry.skills,
            mark(entry.has_prompt)
        );
    }
    Ok(())
}

pub fn print_import_reports(reports: &[ImportReport], format: OutputFormat) -> Result<()> {
    if let OutputFormat::Json = format {
        return print_json(reports);
    }
    for report in reports {
        if report.skipped > 0 {
            println!(
                "Imported {} {} ({} skipped, see warnings)",
                report.inserted, report.collection, report.skipped
            );
        } else {
            println!("Imported {} {}", report.inserted, report.collection);
        }
    }
    Ok(())
}

pub fn print_probe(label: &str, result: &ProbeResult, format: OutputFormat) -> Result<()> {
    if let OutputFormat::Json = format {
        return print_json(result);
    }
    let symbol = if result.success { "✓" } else { "✗" };
    if result.latency_ms > 0 {
        println!("{} {}: {} ({} ms)", symbol, label, result.message, result.latency_ms);
    } else {
        println!("{} {}: {}", symbol, label, result.message);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_key() {
        assert_eq!(mask_key(Some("sk-abcdef1234")), "••••••1234");
        assert_eq!(mask_key(Some("ab")), "••••••ab");
        assert_eq!(mask_key(Some("")), "not set");
        assert_eq!(mask_key(None), "not set");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a-very-long-name", 6), "a-ver…");
    }
}
