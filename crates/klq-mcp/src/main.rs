//! KLQ MCP server and CLI entry point.

use std::sync::Arc;
use tokio::sync::Mutex;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use klq::presets::{self, PRESETS};
use klq::TableRegistry;

use klq_mcp::config::{resolve_coercion, resolve_data_path};
use klq_mcp::prompts::PromptRegistry;
use klq_mcp::protocol::ProtocolHandler;
use klq_mcp::render;
use klq_mcp::resources::ResourceRegistry;
use klq_mcp::session::QuerySession;
use klq_mcp::tools::ToolRegistry;
use klq_mcp::transport::StdioTransport;

#[derive(Parser)]
#[command(
    name = "klq-mcp",
    about = "Pipe-based queries over JSON tables, served over MCP or run from the shell",
    version
)]
struct Cli {
    /// Directory of *.json tables, or a single JSON file.
    #[arg(short, long, global = true)]
    data: Option<String>,

    /// Compare non-numeric operands of <, >, <=, >= as errors instead of false.
    #[arg(long, global = true)]
    strict: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start MCP server over stdio (default).
    Serve,

    /// Run one query and print the result.
    Query {
        /// Query text, e.g. "devices | where channels > 100 | take 5".
        query: String,

        /// Print the result as JSON instead of a text table.
        #[arg(long)]
        json: bool,
    },

    /// List loaded tables with row counts and fields.
    Tables,

    /// List preset queries.
    Presets {
        /// Only show presets in this group.
        #[arg(short, long)]
        group: Option<String>,
    },

    /// Check that the data path loads.
    Validate,

    /// Print server capabilities as JSON.
    Info,

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   klq-mcp completions bash > ~/.local/share/bash-completion/completions/klq-mcp
    ///   klq-mcp completions zsh > ~/.zfunc/_klq-mcp
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },

    /// Launch interactive REPL mode.
    Repl,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let data_path = resolve_data_path(cli.data.as_deref());
    let numeric = resolve_coercion(cli.strict);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            tracing::info!("KLQ MCP server");
            tracing::info!("Data: {}", data_path.display());
            let session = QuerySession::open(&data_path, numeric)?;
            let session = Arc::new(Mutex::new(session));
            let handler = ProtocolHandler::new(session);
            let transport = StdioTransport::new(handler);
            transport.run().await?;
        }

        Commands::Query { query, json } => {
            let session = QuerySession::open(&data_path, numeric)?;
            let result = session.engine().run(&query);
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                let text = render::render_result(&result);
                if !text.is_empty() {
                    println!("{text}");
                }
            }
            if !result.is_ok() {
                std::process::exit(1);
            }
        }

        Commands::Tables => {
            let session = QuerySession::open(&data_path, numeric)?;
            let registry = session.registry();
            for table in registry.iter() {
                println!(
                    "{:<28} {:>6} rows  {}",
                    table.name,
                    table.rows.len(),
                    table.fields().join(", ")
                );
            }
            println!(
                "{} tables, {} records",
                registry.len(),
                registry.total_rows()
            );
        }

        Commands::Presets { group } => {
            let selected: Vec<&presets::Preset> = match group.as_deref() {
                Some(g) => presets::presets_in(g),
                None => PRESETS.iter().collect(),
            };
            if selected.is_empty() {
                eprintln!(
                    "No presets in that group. Groups: {}",
                    presets::groups().join(", ")
                );
                std::process::exit(1);
            }
            for preset in selected {
                println!("[{}] {}: {}", preset.group, preset.label, preset.query);
            }
        }

        Commands::Validate => {
            if !data_path.exists() {
                eprintln!("Data path not found: {}", data_path.display());
                std::process::exit(1);
            }
            match TableRegistry::load(&data_path) {
                Ok(registry) => {
                    println!("Valid data path: {}", data_path.display());
                    println!("  Tables: {}", registry.len());
                    println!("  Records: {}", registry.total_rows());
                    for stats in registry.stats() {
                        println!(
                            "    {}: {} rows, {} fields",
                            stats.name,
                            stats.rows,
                            stats.fields.len()
                        );
                    }
                }
                Err(e) => {
                    eprintln!("Invalid data: {e}");
                    std::process::exit(1);
                }
            }
        }

        Commands::Info => {
            let capabilities = klq_mcp::types::InitializeResult::default_result();
            let tools = ToolRegistry::list_tools();
            let resources = ResourceRegistry::list_resources();
            let prompts = PromptRegistry::list_prompts();
            let info = serde_json::json!({
                "server": capabilities.server_info,
                "protocol_version": capabilities.protocol_version,
                "capabilities": capabilities.capabilities,
                "tools": tools.iter().map(|t| &t.name).collect::<Vec<_>>(),
                "tool_count": tools.len(),
                "resources": resources.iter().map(|r| &r.uri).collect::<Vec<_>>(),
                "prompts": prompts.iter().map(|p| &p.name).collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "klq-mcp", &mut std::io::stdout());
        }

        Commands::Repl => {
            klq_mcp::repl::run(&data_path, numeric)?;
        }
    }

    Ok(())
}
