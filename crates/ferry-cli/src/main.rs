//! ferry command line HTTP client

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ferry::{Client, ClientDefaults};
use tracing::Level;
use tracing_subscriber::EnvFilter;

mod sub_commands;

/// Command line HTTP client
#[derive(Parser)]
#[command(name = "ferry")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Logging level
    #[arg(short, long, default_value = "error")]
    log_level: Level,
    /// JSON file with client defaults
    #[arg(short, long, env = "FERRY_CONFIG")]
    config: Option<PathBuf>,
    /// Base URL joined with relative request URLs
    #[arg(short, long, env = "FERRY_BASE_URL")]
    base_url: Option<String>,
    /// Default header as `Name: value`, may be repeated
    #[arg(short = 'H', long = "header")]
    headers: Vec<String>,
    /// Default timeout in milliseconds
    #[arg(short, long)]
    timeout: Option<u64>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a request and print the response payload
    Request(sub_commands::request::RequestSubCommand),
    /// Print the effective client defaults as JSON
    Defaults,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Cli = Cli::parse();
    let default_filter = args.log_level;

    let hyper_filter = "hyper=warn,reqwest=warn";

    let env_filter = EnvFilter::new(format!("{},{}", default_filter, hyper_filter));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let defaults = load_defaults(&args)?;

    match &args.command {
        Commands::Request(sub_command_args) => {
            let client = Client::with_defaults(defaults);
            sub_commands::request::request(&client, sub_command_args).await
        }
        Commands::Defaults => sub_commands::show_defaults::show_defaults(&defaults),
    }
}

/// Read the defaults file, then apply command line overrides on top
fn load_defaults(args: &Cli) -> Result<ClientDefaults> {
    let mut defaults = match &args.config {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Could not read {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Invalid defaults in {}", path.display()))?
        }
        None => ClientDefaults::default(),
    };

    if let Some(base_url) = &args.base_url {
        defaults.base_url = Some(base_url.clone());
    }

    for header in &args.headers {
        let (name, value) = sub_commands::parse_header(header)?;
        defaults.headers.insert(name, value);
    }

    if let Some(timeout) = args.timeout {
        defaults.timeout = Some(Duration::from_millis(timeout));
    }

    tracing::debug!(
        base_url = defaults.base_url.as_deref().unwrap_or_default(),
        headers = defaults.headers.len(),
        "Loaded client defaults"
    );

    Ok(defaults)
}
