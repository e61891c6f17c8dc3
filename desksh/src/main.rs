// ABOUTME: desksh is the helpdesk cli over the diagnostic engine.
// ABOUTME: prints human-readable text by default or exact json with --json.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use deskdiag::{Engine, EngineConfig};
use desksh::{
    render_execution_result, render_listing, render_network_report, render_suggestions,
    render_system_info,
};

#[derive(Debug, Parser)]
#[command(name = "desksh", about = "safe desktop diagnostics")]
struct Args {
    /// Optional toml config overlay for the engine.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit raw json instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate one command and execute it if approved.
    Run { command: String },
    /// Suggest curated diagnostics for a problem description.
    Suggest { text: String },
    /// List every curated diagnostic for this platform.
    List,
    /// Run the full network diagnostics battery.
    Net,
    /// Ping a host.
    Ping {
        host: String,

        #[arg(long, default_value_t = 4)]
        count: u32,
    },
    /// Resolve a domain name.
    Dns { domain: String },
    /// Show the platform network configuration.
    Netconfig,
    /// Show a native system snapshot.
    Info,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => {
            let config = EngineConfig::load(path)
                .with_context(|| format!("load config {}", path.display()))?;
            debug!(path = %path.display(), "loaded config overlay");
            config
        }
        None => EngineConfig::default(),
    };
    let engine = Engine::new(config);

    match args.command {
        Command::Run { command } => {
            let result = engine.validate_and_execute(&command).await?;
            emit(&result, args.json, render_execution_result)?;
        }
        Command::Suggest { text } => {
            let suggested = engine.suggest_diagnostics(&text);
            emit(&suggested, args.json, render_suggestions)?;
        }
        Command::List => {
            let listing = engine.list_all_diagnostics();
            emit(&listing, args.json, |listing| {
                render_listing(engine.os(), listing)
            })?;
        }
        Command::Net => {
            let report = engine.run_network_diagnostics().await;
            emit(&report, args.json, render_network_report)?;
        }
        Command::Ping { host, count } => {
            let result = engine.ping_host(&host, count).await?;
            emit(&result, args.json, render_execution_result)?;
        }
        Command::Dns { domain } => {
            let result = engine.dns_lookup(&domain).await?;
            emit(&result, args.json, render_execution_result)?;
        }
        Command::Netconfig => {
            let result = engine.network_config().await;
            emit(&result, args.json, render_execution_result)?;
        }
        Command::Info => {
            let info = engine.system_info();
            emit(&info, args.json, render_system_info)?;
        }
    }

    Ok(())
}

fn emit<T: Serialize>(
    value: &T,
    json: bool,
    render: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print!("{}", render(value));
    }
    Ok(())
}
