mod config;
mod service;

use anyhow::Result;
use clap::Parser;
use crate::config::Config;
use crate::service::{CliService, Command};

/// Command-line client for an MCP tool endpoint
#[derive(Debug, Parser)]
#[command(name = "mcplink", version, about)]
struct Cli {
    /// API key (overrides config and MCPLINK_API_KEY)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Log level (overrides config)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::load()?;
    if let Some(api_key) = cli.api_key {
        config.api_key = api_key;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    let service = CliService::new(config);
    service.run(cli.command).await
}
