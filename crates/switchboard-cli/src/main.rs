//! Switchboard - AI coding client profile manager
//!
//! Usage:
//!   switchboard provider list           # Manage providers
//!   switchboard mcp template mcp-fetch  # Add an MCP server from a template
//!   switchboard export app claude       # Write a Claude Code config archive
//!   switchboard backup                  # Snapshot every collection

mod context;
mod output;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use switchboard_core::archive::ArchiveBlob;
use switchboard_core::commands::{
    ExportCommand, McpCommand, ModuleKind, PromptCommand, ProviderCommand, RepoCommand,
    SkillCommand,
};
use switchboard_core::config::to_toml;
use switchboard_core::model::{
    McpServer, ModelConfig, Prompt, Provider, ProviderType, SkillsRepo, TransportType,
};
use switchboard_core::optimize::{
    self, OptimizeAction, OptimizeRequest, PromptMode, PromptOptimizer, TEMPLATES,
};
use switchboard_core::presets::{
    MCP_TEMPLATES, McpTemplate, PROVIDER_PRESETS, ProviderPreset, REPO_PRESETS, RepoCategory,
    RepoPreset,
};
use switchboard_core::probe::Prober;
use switchboard_core::query::RecordQuery;
use switchboard_core::skills::SkillScanner;
use switchboard_core::store::FileStore;
use switchboard_core::types::{AppType, TargetFile};

use crate::context::AppContext;
use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "switchboard")]
#[command(about = "Provider, MCP, prompt and skill manager for AI coding clients", long_about = None)]
struct Cli {
    /// Settings file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory record collections are stored in
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// User whose records are read and written
    #[arg(long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage API providers
    Provider(ProviderArgs),

    /// Manage MCP servers
    Mcp(McpArgs),

    /// Manage system prompts
    Prompt(PromptArgs),

    /// Manage skills
    Skill(SkillArgs),

    /// Manage skills repositories
    Repo(RepoArgs),

    /// Generate client configuration archives and JSON exports
    Export(ExportArgs),

    /// Write a backup archive of every collection
    Backup {
        /// Directory the archive is written to
        #[arg(long, short, default_value = ".")]
        out: PathBuf,
    },

    /// Restore records from a backup archive
    Restore {
        /// Backup archive (.zip)
        file: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Import providers, MCP servers or prompts from a JSON array
    Import {
        /// JSON file holding one kind of record
        file: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Share providers through a link
    Share(ShareArgs),

    /// Test connectivity of a provider or MCP server
    Probe(ProbeArgs),

    /// Rewrite or score a prompt with an AI model
    Optimize(Box<OptimizeArgs>),

    /// Show or create the settings file
    Config(ConfigArgs),
}

#[derive(Args)]
struct ProviderArgs {
    #[command(subcommand)]
    command: ProviderSubcommand,
}

#[derive(Subcommand)]
enum ProviderSubcommand {
    /// List providers
    List {
        /// Only providers for this client (claude, codex, gemini, opencode)
        #[arg(long)]
        app: Option<String>,

        /// Filter by name or base URL
        #[arg(long, short)]
        search: Option<String>,

        /// Only enabled providers
        #[arg(long)]
        enabled: bool,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Add a provider
    Add {
        /// Display name
        name: String,

        /// Provider type (official, packycode, custom)
        #[arg(long = "type", short = 't', default_value = "custom")]
        provider_type: String,

        /// Client the provider is for
        #[arg(long, default_value = "claude")]
        app: String,

        /// API key
        #[arg(long)]
        key: Option<String>,

        /// Base URL (custom providers only)
        #[arg(long)]
        base_url: Option<String>,

        /// Model identifier
        #[arg(long)]
        model: Option<String>,

        /// Store the provider disabled
        #[arg(long)]
        disabled: bool,
    },

    /// Add a provider from a preset
    Preset {
        /// Preset id; omit to list presets
        id: Option<String>,

        /// Client the provider is for
        #[arg(long, default_value = "claude")]
        app: String,
    },

    /// Change fields of a provider
    Update {
        /// Provider id, id prefix or name
        provider: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long = "type", short = 't')]
        provider_type: Option<String>,

        #[arg(long)]
        app: Option<String>,

        #[arg(long)]
        key: Option<String>,

        #[arg(long)]
        base_url: Option<String>,

        #[arg(long)]
        model: Option<String>,
    },

    /// Copy a provider
    Duplicate {
        /// Provider id, id prefix or name
        provider: String,
    },

    /// Flip a provider between enabled and disabled
    Toggle {
        /// Provider id, id prefix or name
        provider: String,
    },

    /// Delete a provider
    #[command(alias = "rm")]
    Remove {
        /// Provider id, id prefix or name
        provider: String,
    },
}

#[derive(Args)]
struct McpArgs {
    #[command(subcommand)]
    command: McpSubcommand,
}

#[derive(Subcommand)]
enum McpSubcommand {
    /// List MCP servers
    List {
        /// Only servers bound to this client
        #[arg(long)]
        app: Option<String>,

        /// Filter by name, command or URL
        #[arg(long, short)]
        search: Option<String>,

        /// Only enabled servers
        #[arg(long)]
        enabled: bool,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Add an MCP server
    ///
    /// Stdio servers take the command after `--`:
    ///   switchboard mcp add fetch -- npx -y @anthropics/mcp-fetch
    Add {
        /// Server name
        name: String,

        /// Transport (stdio, http, sse)
        #[arg(long, short = 't', default_value = "stdio")]
        transport: String,

        /// Endpoint URL (http and sse)
        #[arg(long)]
        url: Option<String>,

        /// Environment variable as KEY=VALUE (repeatable)
        #[arg(long = "env", short = 'e')]
        env: Vec<String>,

        /// Clients to bind (defaults to all four)
        #[arg(long = "app", short = 'a')]
        apps: Vec<String>,

        /// Command and arguments (stdio)
        #[arg(last = true)]
        command: Vec<String>,
    },

    /// Add a server from a built-in template; omit the name to list templates
    Template { name: Option<String> },

    /// Replace the set of clients a server is bound to
    Bind {
        /// Server id, id prefix or name
        server: String,

        /// Clients to bind
        #[arg(required = true)]
        apps: Vec<String>,
    },

    /// Flip a server between enabled and disabled
    Toggle {
        /// Server id, id prefix or name
        server: String,
    },

    /// Delete an MCP server
    #[command(alias = "rm")]
    Remove {
        /// Server id, id prefix or name
        server: String,
    },
}

#[derive(Args)]
struct PromptArgs {
    #[command(subcommand)]
    command: PromptSubcommand,
}

#[derive(Subcommand)]
enum PromptSubcommand {
    /// List prompts
    List {
        /// Filter by name or content
        #[arg(long, short)]
        search: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Print a prompt's content
    Show {
        /// Prompt id, id prefix or name
        prompt: String,
    },

    /// Add a prompt
    Add {
        /// Prompt name
        name: String,

        /// Target file (CLAUDE.md, AGENTS.md, GEMINI.md, OPENCODE.md)
        #[arg(long, short, default_value = "CLAUDE.md")]
        target: String,

        /// Read content from a file
        #[arg(long, conflicts_with = "content")]
        file: Option<PathBuf>,

        /// Inline content
        #[arg(long)]
        content: Option<String>,

        /// Make this the active prompt for its target file
        #[arg(long)]
        active: bool,
    },

    /// Make a prompt the active one for its target file
    Activate {
        /// Prompt id, id prefix or name
        prompt: String,
    },

    /// Mark a prompt inactive
    Deactivate {
        /// Prompt id, id prefix or name
        prompt: String,
    },

    /// Delete a prompt
    #[command(alias = "rm")]
    Remove {
        /// Prompt id, id prefix or name
        prompt: String,
    },
}

#[derive(Args)]
struct SkillArgs {
    #[command(subcommand)]
    command: SkillSubcommand,
}

#[derive(Subcommand)]
enum SkillSubcommand {
    /// List skills
    List {
        /// Only skills found in this repository (owner/repo or id)
        #[arg(long)]
        repo: Option<String>,

        /// Only installed skills
        #[arg(long)]
        installed: bool,

        /// Filter by name or description
        #[arg(long, short)]
        search: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Mark a skill installed so it is exported
    Install {
        /// Skill id, id prefix or name
        skill: String,
    },

    /// Mark a skill not installed
    Uninstall {
        /// Skill id, id prefix or name
        skill: String,
    },

    /// Delete a skill record
    #[command(alias = "rm")]
    Remove {
        /// Skill id, id prefix or name
        skill: String,
    },
}

#[derive(Args)]
struct RepoArgs {
    #[command(subcommand)]
    command: RepoSubcommand,
}

#[derive(Subcommand)]
enum RepoSubcommand {
    /// List registered repositories
    List {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Register a GitHub repository (owner/repo[@branch])
    Add {
        repo: String,

        /// Directory holding the skill folders
        #[arg(long)]
        subdir: Option<String>,
    },

    /// Show suggested repositories, or register one
    Presets {
        /// Preset to register (owner/repo)
        repo: Option<String>,
    },

    /// Find new skills in a repository
    Scan {
        /// Repository (owner/repo or id); all repositories when omitted
        repo: Option<String>,
    },

    /// Unregister a repository
    #[command(alias = "rm")]
    Remove {
        /// Repository (owner/repo or id)
        repo: String,
    },
}

#[derive(Args)]
struct ExportArgs {
    #[command(subcommand)]
    command: ExportSubcommand,
}

#[derive(Subcommand)]
enum ExportSubcommand {
    /// Write the configuration archive for one client
    App {
        /// Client (claude, codex, gemini, opencode)
        app: String,

        /// Directory the archive is written to
        #[arg(long, short, default_value = ".")]
        out: PathBuf,

        /// Print the generated files instead of writing an archive
        #[arg(long)]
        print: bool,
    },

    /// Show what each client export would contain
    Stats {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Write one collection as a JSON array
    Module {
        /// providers, mcp_servers, prompts, skills or skills_repos
        module: String,

        /// Directory the file is written to
        #[arg(long, short, default_value = ".")]
        out: PathBuf,
    },
}

#[derive(Args)]
struct ShareArgs {
    #[command(subcommand)]
    command: ShareSubcommand,
}

#[derive(Subcommand)]
enum ShareSubcommand {
    /// Print a link carrying every enabled provider (keys are never shared)
    Link,

    /// Import the providers carried by a link
    Import {
        /// Share link or bare payload
        link: String,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },
}

#[derive(Args)]
struct ProbeArgs {
    #[command(subcommand)]
    command: ProbeSubcommand,
}

#[derive(Subcommand)]
enum ProbeSubcommand {
    /// Probe a provider's base URL
    Provider {
        /// Provider id, id prefix or name
        provider: String,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Probe an MCP server
    Mcp {
        /// Server id, id prefix or name
        server: String,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },
}

#[derive(Args)]
struct OptimizeArgs {
    /// optimize, iterate or evaluate
    #[arg(default_value = "optimize")]
    action: String,

    /// Prompt text
    #[arg(long, short, conflicts_with_all = ["file", "from"])]
    prompt: Option<String>,

    /// Read the prompt from a file
    #[arg(long, conflicts_with = "from")]
    file: Option<PathBuf>,

    /// Use a stored prompt (id, id prefix or name)
    #[arg(long)]
    from: Option<String>,

    /// Earlier rewrite to refine (iterate)
    #[arg(long)]
    optimized: Option<String>,

    /// Feedback on the earlier rewrite (iterate)
    #[arg(long)]
    feedback: Option<String>,

    /// Rewrite style for system prompts; omit to list templates
    #[arg(long, short)]
    template: Option<String>,

    /// system or user
    #[arg(long, short, default_value = "system")]
    mode: String,

    /// List saved runs instead of running the optimizer
    #[arg(long, conflicts_with_all = ["prompt", "file", "from"])]
    history: bool,

    /// How many saved runs to list
    #[arg(long, default_value_t = 20, requires = "history")]
    limit: usize,

    /// Output format
    #[arg(short, long, default_value = "table")]
    format: OutputFormat,
}

#[derive(Args)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigSubcommand,
}

#[derive(Subcommand)]
enum ConfigSubcommand {
    /// Print the effective settings
    Show,

    /// Write a settings file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long, short)]
        force: bool,
    },
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "switchboard=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let ctx = AppContext::load(cli.config, cli.data_dir, cli.user)?;
    run_cli(&ctx, cli.command)
}

fn run_cli(ctx: &AppContext, command: Commands) -> Result<()> {
    match command {
        Commands::Provider(args) => run_provider(ctx, args),
        Commands::Mcp(args) => run_mcp(ctx, args),
        Commands::Prompt(args) => run_prompt(ctx, args),
        Commands::Skill(args) => run_skill(ctx, args),
        Commands::Repo(args) => run_repo(ctx, args),
        Commands::Export(args) => run_export(ctx, args),
        Commands::Backup { out } => {
            let blob = export_command(ctx).backup(today())?;
            write_blob(&out, &blob)
        }
        Commands::Restore { file, format } => {
            let bytes = std::fs::read(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let reports = export_command(ctx).restore_backup(&bytes)?;
            output::print_import_reports(&reports, format)
        }
        Commands::Import { file, format } => {
            let json = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let report = export_command(ctx).import_module(&json)?;
            output::print_import_reports(&[report], format)
        }
        Commands::Share(args) => run_share(ctx, args),
        Commands::Probe(args) => run_probe(ctx, args),
        Commands::Optimize(args) => run_optimize(ctx, *args),
        Commands::Config(args) => run_config(ctx, args),
    }
}

fn run_provider(ctx: &AppContext, args: ProviderArgs) -> Result<()> {
    let cmd = ProviderCommand::new(ctx.store(), ctx.user());

    match args.command {
        ProviderSubcommand::List {
            app,
            search,
            enabled,
            format,
        } => {
            let query = RecordQuery {
                search,
                app: app.as_deref().map(parse_app).transpose()?,
                active_only: enabled,
                repo_id: None,
            };
            output::print_providers(&cmd.list(&query)?, format)?;
        }
        ProviderSubcommand::Add {
            name,
            provider_type,
            app,
            key,
            base_url,
            model,
            disabled,
        } => {
            let mut provider =
                Provider::new(name, parse_provider_type(&provider_type)?, parse_app(&app)?);
            provider.api_key = key;
            if base_url.is_some() {
                provider.base_url = base_url;
            }
            provider.model_config = model.map(ModelConfig::with_model);
            provider.enabled = !disabled;

            let record = cmd.add(provider)?;
            println!("✓ Added provider {} ({})", record.data.name, record.id);
        }
        ProviderSubcommand::Preset { id: None, .. } => {
            println!("{:<12} {:<16} Type", "ID", "Name");
            println!("{}", "-".repeat(40));
            for preset in &PROVIDER_PRESETS {
                println!("{:<12} {:<16} {}", preset.id, preset.name, preset.provider_type.as_str());
            }
        }
        ProviderSubcommand::Preset { id: Some(id), app } => {
            let preset = ProviderPreset::find(&id).ok_or_else(|| {
                anyhow::anyhow!(
                    "Unknown preset: '{}'. Run `switchboard provider preset` to list presets",
                    id
                )
            })?;
            let record = cmd.add_preset(preset, parse_app(&app)?)?;
            println!("✓ Added provider {} ({})", record.data.name, record.id);
        }
        ProviderSubcommand::Update {
            provider,
            name,
            provider_type,
            app,
            key,
            base_url,
            model,
        } => {
            let record = cmd.find(&provider)?;
            let provider_type = provider_type.as_deref().map(parse_provider_type).transpose()?;
            let app = app.as_deref().map(parse_app).transpose()?;

            let updated = cmd.modify(record.id, |p| {
                if let Some(name) = name {
                    p.name = name;
                }
                if provider_type.is_some() || app.is_some() {
                    p.retarget(provider_type.unwrap_or(p.provider_type), app.unwrap_or(p.app_type));
                }
                if let Some(key) = key {
                    p.api_key = Some(key).filter(|k| !k.is_empty());
                }
                if let Some(url) = base_url {
                    p.base_url = Some(url).filter(|u| !u.is_empty());
                }
                if let Some(model) = model {
                    p.model_config = Some(ModelConfig::with_model(model));
                }
            })?;
            println!("✓ Updated provider {}", updated.data.name);
        }
        ProviderSubcommand::Duplicate { provider } => {
            let record = cmd.find(&provider)?;
            let copy = cmd.duplicate(record.id)?;
            println!("✓ Created {} ({})", copy.data.name, copy.id);
        }
        ProviderSubcommand::Toggle { provider } => {
            let record = cmd.find(&provider)?;
            let toggled = cmd.toggle(record.id)?;
            println!(
                "✓ Provider {} is now {}",
                toggled.data.name,
                enabled_label(toggled.data.enabled)
            );
        }
        ProviderSubcommand::Remove { provider } => {
            let record = cmd.find(&provider)?;
            cmd.delete(record.id)?;
            println!("✓ Removed provider {}", record.data.name);
        }
    }

    Ok(())
}

fn run_mcp(ctx: &AppContext, args: McpArgs) -> Result<()> {
    let cmd = McpCommand::new(ctx.store(), ctx.user());

    match args.command {
        McpSubcommand::List {
            app,
            search,
            enabled,
            format,
        } => {
            let query = RecordQuery {
                search,
                app: app.as_deref().map(parse_app).transpose()?,
                active_only: enabled,
                repo_id: None,
            };
            output::print_mcp_servers(&cmd.list(&query)?, format)?;
        }
        McpSubcommand::Add {
            name,
            transport,
            url,
            env,
            apps,
            command,
        } => {
            let transport = TransportType::try_from(transport.as_str())?;
            let mut server = if transport.is_remote() {
                let url = url.ok_or_else(|| {
                    anyhow::anyhow!("--url is required for {} servers", transport.as_str())
                })?;
                McpServer::remote(name, transport, url)
            } else {
                let (program, rest) = command
                    .split_first()
                    .ok_or_else(|| anyhow::anyhow!("Stdio servers need a command after `--`"))?;
                McpServer::stdio(name, program.as_str(), rest.iter().cloned())
            };
            for pair in &env {
                let (key, value) = parse_env_pair(pair)?;
                server = server.with_env(key, value);
            }
            if !apps.is_empty() {
                server = server.with_bindings(parse_apps(&apps)?);
            }

            let record = cmd.create(server)?;
            println!("✓ Added MCP server {} ({})", record.data.name, record.id);
        }
        McpSubcommand::Template { name: None } => {
            println!("{:<16} Description", "Template");
            println!("{}", "-".repeat(70));
            for template in &MCP_TEMPLATES {
                println!("{:<16} {}", template.name, template.description);
            }
        }
        McpSubcommand::Template { name: Some(name) } => {
            let template = McpTemplate::find(&name).ok_or_else(|| {
                anyhow::anyhow!(
                    "Unknown template: '{}'. Run `switchboard mcp template` to list templates",
                    name
                )
            })?;
            let record = cmd.add_template(template)?;
            println!("✓ Added MCP server {} ({})", record.data.name, record.id);
        }
        McpSubcommand::Bind { server, apps } => {
            let record = cmd.find(&server)?;
            let bound = cmd.bind(record.id, &parse_apps(&apps)?)?;
            let labels: Vec<&str> = bound.data.app_bindings.iter().map(|a| a.as_str()).collect();
            println!("✓ {} is bound to {}", bound.data.name, labels.join(", "));
        }
        McpSubcommand::Toggle { server } => {
            let record = cmd.find(&server)?;
            let toggled = cmd.toggle(record.id)?;
            println!(
                "✓ MCP server {} is now {}",
                toggled.data.name,
                enabled_label(toggled.data.enabled)
            );
        }
        McpSubcommand::Remove { server } => {
            let record = cmd.find(&server)?;
            cmd.delete(record.id)?;
            println!("✓ Removed MCP server {}", record.data.name);
        }
    }

    Ok(())
}

fn run_prompt(ctx: &AppContext, args: PromptArgs) -> Result<()> {
    let cmd = PromptCommand::new(ctx.store(), ctx.user());

    match args.command {
        PromptSubcommand::List { search, format } => {
            let query = RecordQuery {
                search,
                ..RecordQuery::default()
            };
            output::print_prompts(&cmd.list(&query)?, format)?;
        }
        PromptSubcommand::Show { prompt } => {
            let record = cmd.find(&prompt)?;
            println!("{}", record.data.content);
        }
        PromptSubcommand::Add {
            name,
            target,
            file,
            content,
            active,
        } => {
            let content = match (file, content) {
                (Some(path), _) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                (None, Some(content)) => content,
                (None, None) => anyhow::bail!("Provide the prompt with --file or --content"),
            };
            let mut prompt = Prompt::new(name, TargetFile::try_from(target.as_str())?, content);
            prompt.is_active = active;

            let record = cmd.add(prompt)?;
            println!("✓ Added prompt {} ({})", record.data.name, record.id);
        }
        PromptSubcommand::Activate { prompt } => {
            let record = cmd.find(&prompt)?;
            let activated = cmd.activate(record.id)?;
            println!(
                "✓ {} is now the active {}",
                activated.data.name, activated.data.target_file
            );
        }
        PromptSubcommand::Deactivate { prompt } => {
            let record = cmd.find(&prompt)?;
            cmd.deactivate(record.id)?;
            println!("✓ Deactivated {}", record.data.name);
        }
        PromptSubcommand::Remove { prompt } => {
            let record = cmd.find(&prompt)?;
            cmd.delete(record.id)?;
            println!("✓ Removed prompt {}", record.data.name);
        }
    }

    Ok(())
}

fn run_skill(ctx: &AppContext, args: SkillArgs) -> Result<()> {
    let cmd = SkillCommand::new(ctx.store(), ctx.user());

    match args.command {
        SkillSubcommand::List {
            repo,
            installed,
            search,
            format,
        } => {
            let repo_id = match repo {
                Some(key) => Some(RepoCommand::new(ctx.store(), ctx.user()).find_repo(&key)?.id),
                None => None,
            };
            let query = RecordQuery {
                search,
                app: None,
                active_only: installed,
                repo_id,
            };
            output::print_skills(&cmd.list(&query)?, format)?;
        }
        SkillSubcommand::Install { skill } => {
            let record = cmd.find(&skill)?;
            cmd.set_installed(record.id, true)?;
            println!("✓ Installed {}", record.data.name);
        }
        SkillSubcommand::Uninstall { skill } => {
            let record = cmd.find(&skill)?;
            cmd.set_installed(record.id, false)?;
            println!("✓ Uninstalled {}", record.data.name);
        }
        SkillSubcommand::Remove { skill } => {
            let record = cmd.find(&skill)?;
            cmd.delete(record.id)?;
            println!("✓ Removed skill {}", record.data.name);
        }
    }

    Ok(())
}

fn run_repo(ctx: &AppContext, args: RepoArgs) -> Result<()> {
    let cmd = RepoCommand::new(ctx.store(), ctx.user());

    match args.command {
        RepoSubcommand::List { format } => {
            output::print_repos(&cmd.list(&RecordQuery::default())?, format)?;
        }
        RepoSubcommand::Add { repo, subdir } => {
            let mut parsed = SkillsRepo::parse(&repo)?;
            if let Some(subdir) = subdir {
                parsed.subdirectory = subdir.trim_matches('/').to_string();
            }
            let record = cmd.add_repo(parsed)?;
            println!("✓ Registered {} ({})", record.data.full_name(), record.id);
        }
        RepoSubcommand::Presets { repo: None } => {
            println!("{:<40} {:<7} Description", "Repository", "Kind");
            println!("{}", "-".repeat(90));
            for preset in &REPO_PRESETS {
                let kind = match preset.category {
                    RepoCategory::Skills => "skills",
                    RepoCategory::Dev => "dev",
                };
                println!(
                    "{:<40} {:<7} {}",
                    format!("{}/{}", preset.owner, preset.repo),
                    kind,
                    preset.description
                );
            }
        }
        RepoSubcommand::Presets { repo: Some(repo) } => {
            let preset = RepoPreset::find(&repo)
                .ok_or_else(|| anyhow::anyhow!("No preset for {}", repo))?;
            let record = cmd.add_repo(preset.build())?;
            println!("✓ Registered {} ({})", record.data.full_name(), record.id);
        }
        RepoSubcommand::Scan { repo } => {
            let targets = match repo {
                Some(key) => vec![cmd.find_repo(&key)?],
                None => cmd.list(&RecordQuery::default())?,
            };
            if targets.is_empty() {
                println!("No skills repositories registered.");
                return Ok(());
            }

            let scanner = SkillScanner::new()?;
            let runtime = tokio::runtime::Runtime::new()?;
            for target in targets {
                match runtime.block_on(cmd.scan(target.id, &scanner)) {
                    Ok(added) => println!("✓ {}: {} new skills", target.data.full_name(), added),
                    Err(e) => println!("✗ {}: {:#}", target.data.full_name(), e),
                }
            }
        }
        RepoSubcommand::Remove { repo } => {
            let record = cmd.find_repo(&repo)?;
            cmd.delete(record.id)?;
            println!("✓ Unregistered {}", record.data.full_name());
        }
    }

    Ok(())
}

fn run_export(ctx: &AppContext, args: ExportArgs) -> Result<()> {
    let cmd = export_command(ctx);

    match args.command {
        ExportSubcommand::App { app, out, print } => {
            let app = parse_app(&app)?;
            if print {
                let artifact = cmd.assemble(app)?;
                for (path, content) in artifact.iter() {
                    println!("==> {} <==", path);
                    match content.as_text() {
                        Some(text) => println!("{}", text),
                        None => println!("({} bytes)", content.as_bytes().len()),
                    }
                }
                return Ok(());
            }
            let blob = cmd.export_archive(app, today())?;
            write_blob(&out, &blob)?;
        }
        ExportSubcommand::Stats { format } => {
            output::print_stats(&cmd.stats()?, format)?;
        }
        ExportSubcommand::Module { module, out } => {
            let kind = ModuleKind::try_from(module.as_str())?;
            let blob = cmd.export_module(kind, today())?;
            write_blob(&out, &blob)?;
        }
    }

    Ok(())
}

fn run_share(ctx: &AppContext, args: ShareArgs) -> Result<()> {
    let cmd = export_command(ctx);

    match args.command {
        ShareSubcommand::Link => {
            let link = cmd.share_link()?;
            if link.providers().is_empty() {
                println!("No enabled providers to share.");
                return Ok(());
            }
            println!("{}", link.url(&ctx.settings().share_origin)?);
        }
        ShareSubcommand::Import { link, format } => {
            let report = cmd.import_share_link(&link)?;
            output::print_import_reports(&[report], format)?;
        }
    }

    Ok(())
}

fn run_probe(ctx: &AppContext, args: ProbeArgs) -> Result<()> {
    let prober = Prober::with_timeout(ctx.settings().probe.timeout())?;
    let runtime = tokio::runtime::Runtime::new()?;

    match args.command {
        ProbeSubcommand::Provider { provider, format } => {
            let record = ProviderCommand::new(ctx.store(), ctx.user()).find(&provider)?;
            let result = runtime.block_on(prober.probe_provider(&record.data));
            output::print_probe(&record.data.name, &result, format)?;
        }
        ProbeSubcommand::Mcp { server, format } => {
            let record = McpCommand::new(ctx.store(), ctx.user()).find(&server)?;
            let result = runtime.block_on(prober.probe_mcp_server(&record.data));
            output::print_probe(&record.data.name, &result, format)?;
        }
    }

    Ok(())
}

fn run_optimize(ctx: &AppContext, args: OptimizeArgs) -> Result<()> {
    if args.history {
        let runs = optimize::history(ctx.store(), &ctx.user(), args.limit)?;
        return output::print_optimize_history(&runs, args.format);
    }

    let action = OptimizeAction::try_from(args.action.as_str())?;

    if args.template.is_none()
        && args.prompt.is_none()
        && args.file.is_none()
        && args.from.is_none()
    {
        println!("{:<26} Purpose", "Template");
        println!("{}", "-".repeat(70));
        for template in TEMPLATES.iter() {
            let summary = template.system.lines().next().unwrap_or_default();
            println!("{:<26} {}", template.id, output::truncate(summary, 60));
        }
        return Ok(());
    }

    let prompt = match (args.prompt, args.file, args.from) {
        (Some(text), _, _) => text,
        (None, Some(path), _) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        (None, None, Some(key)) => {
            PromptCommand::new(ctx.store(), ctx.user())
                .find(&key)?
                .data
                .content
        }
        (None, None, None) => anyhow::bail!("Provide the prompt with --prompt, --file or --from"),
    };

    let mut request = OptimizeRequest::new(action, prompt);
    request.mode = PromptMode::try_from(args.mode.as_str())?;
    request.template = args.template;
    request.optimized_prompt = args.optimized;
    request.feedback = args.feedback;

    let optimizer = PromptOptimizer::from_settings(&ctx.settings().optimizer)?;
    let runtime = tokio::runtime::Runtime::new()?;
    let outcome = runtime.block_on(optimizer.run(&request))?;
    optimize::save_run(ctx.store(), &ctx.user(), &request, &outcome)?;

    match args.format {
        OutputFormat::Table => println!("{}", outcome),
        OutputFormat::Json => output::print_json(&outcome)?,
    }
    Ok(())
}

fn run_config(ctx: &AppContext, args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigSubcommand::Show => {
            println!("# {}", ctx.settings_store().path().display());
            print!("{}", to_toml(ctx.settings())?);
            println!("# data: {}", ctx.store().root().display());
        }
        ConfigSubcommand::Init { force } => {
            let store = ctx.settings_store();
            if store.path().exists() && !force {
                anyhow::bail!(
                    "{} already exists (use --force to overwrite)",
                    store.path().display()
                );
            }
            store.save(ctx.settings())?;
            println!("✓ Wrote {}", store.path().display());
        }
    }

    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

fn export_command(ctx: &AppContext) -> ExportCommand<'_, FileStore> {
    ExportCommand::new(ctx.store(), ctx.user())
}

fn today() -> chrono::NaiveDate {
    Utc::now().date_naive()
}

fn write_blob(dir: &Path, blob: &ArchiveBlob) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    let path = dir.join(&blob.file_name);
    std::fs::write(&path, &blob.bytes)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("✓ Wrote {} ({} bytes)", path.display(), blob.bytes.len());
    Ok(())
}

fn enabled_label(enabled: bool) -> &'static str {
    if enabled { "enabled" } else { "disabled" }
}

fn parse_app(s: &str) -> Result<AppType> {
    AppType::try_from(s)
}

fn parse_apps(values: &[String]) -> Result<Vec<AppType>> {
    values
        .iter()
        .flat_map(|v| v.split(','))
        .filter(|v| !v.trim().is_empty())
        .map(|v| parse_app(v.trim()))
        .collect()
}

fn parse_provider_type(s: &str) -> Result<ProviderType> {
    ProviderType::try_from(s)
}

fn parse_env_pair(pair: &str) -> Result<(String, String)> {
    match pair.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => anyhow::bail!("Invalid env entry: '{}'. Expected KEY=VALUE", pair),
    }
}
