//! Ampere CLI - stdin-to-stdout LLM agents for household electricity bills.
//!
//! Each agent command reads one JSON object from stdin and writes exactly one
//! JSON object to stdout: the model's structured answer, or
//! `{"error": "<message>"}` with a non-zero exit status. Logs go to stderr.
//!
//! # Usage
//!
//! ```bash
//! # Carbon footprint with savings suggestions
//! echo '{"breakdown":[{"name":"Air Conditioner","monthlyUnits":720}]}' | ampere footprint
//!
//! # Parse a scanned bill
//! jq -n --arg b "$(base64 -w0 bill.pdf)" '{isImageBased:true,pdfBase64:$b}' | ampere parse-bill
//!
//! # View configuration
//! ampere config show
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

mod cli;
mod logging;

use cli::run::{AgentKind, RunOptions};
use cli::types::Provider;

/// Ampere - structured-output LLM agents for electricity bills.
#[derive(Parser, Debug)]
#[command(name = "ampere")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Config file (defaults to the platform config directory)
    #[arg(short, long, global = true, env = "AMPERE_CONFIG")]
    config: Option<PathBuf>,

    /// LLM provider, overriding `llm.provider` from the config
    #[arg(long, global = true, value_enum)]
    provider: Option<Provider>,

    /// Model name (provider-specific), overriding the config
    #[arg(long, global = true)]
    model: Option<String>,

    /// Check the model's answer against the agent's output schema
    #[arg(long, global = true)]
    strict: bool,

    /// Pretty-print the JSON written to stdout
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Carbon footprint of a bill breakdown with per-appliance savings suggestions
    Footprint,

    /// Carbon footprint of a bill breakdown with tree and car-distance equivalents
    Co2,

    /// Energy saving recommendations for the top consuming appliances
    Recommend,

    /// Extract amount, units, period and consumer number from a bill
    ParseBill,

    /// Predict next month's bill from seasonal and current weather patterns
    Predict,

    /// CO2, recommendations and prediction in one run, with priced savings
    Analyze,

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

impl Commands {
    fn agent_kind(&self) -> Option<AgentKind> {
        match self {
            Commands::Footprint => Some(AgentKind::Footprint),
            Commands::Co2 => Some(AgentKind::Co2),
            Commands::Recommend => Some(AgentKind::Recommend),
            Commands::ParseBill => Some(AgentKind::ParseBill),
            Commands::Predict => Some(AgentKind::Predict),
            Commands::Analyze => Some(AgentKind::Analyze),
            Commands::Config(_) => None,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so a broken config file only picks the
    // log settings here; agent commands report the error on stdout.
    let config = cli::load_config(cli.config.as_deref());
    match &config {
        Ok(config) => logging::init_from_config(config, cli.verbose, cli.json_logs),
        Err(_) => logging::init(logging::cli_level(cli.verbose), cli.json_logs),
    }

    tracing::debug!("Ampere v{}", ampere_core::VERSION);

    if let Some(kind) = cli.command.agent_kind() {
        let options = RunOptions {
            provider: cli.provider,
            model: cli.model,
            strict: cli.strict,
            pretty: cli.pretty,
        };
        return cli::run::execute(kind, &options, config).await;
    }

    let Commands::Config(args) = cli.command else {
        return ExitCode::FAILURE;
    };
    match cli::config::execute(args, cli.config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
