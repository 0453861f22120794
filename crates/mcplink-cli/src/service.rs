use crate::config::Config;
use anyhow::{bail, Context, Result};
use clap::Subcommand;
use mcplink_session::{Session, ToolRequest};
use serde_json::Value;
use std::fs;
use tracing::{info, warn};

/// Operations exposed on the command line
#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Show connection state and cached tool names
    Status,
    /// List every advertised tool
    Tools,
    /// Show a single tool definition
    Tool {
        /// Exact tool name
        name: String,
    },
    /// Show parameter summaries for every tool
    Details,
    /// Fetch the tool list again
    Refresh,
    /// Call one tool
    Call {
        /// Tool name
        name: String,
        /// Arguments as a JSON object
        #[arg(default_value = "{}")]
        args: String,
    },
    /// Call several tools concurrently
    Batch {
        /// JSON array of {"name", "arguments"} objects, or @path to a file holding one
        requests: String,
    },
}

/// Runs one command against a fresh session
pub struct CliService {
    config: Config,
}

impl CliService {
    /// Create a new CLI service
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Connect, run the command, print its JSON output and disconnect
    pub async fn run(self, command: Command) -> Result<()> {
        // Initialize logging
        mcplink_logging::init_logging(&self.config.logging.level, self.config.logging.format)?;
        info!("Starting mcplink ({:?})", command);

        let mut session = Session::new(&self.config.api_key, self.config.session.clone())
            .context("set api_key in ~/.mcplink/mcplink.toml or MCPLINK_API_KEY")?;
        session.connect().await?;

        let outcome = execute(&mut session, command).await;
        session.disconnect().await;

        let output = outcome?;
        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }
}

async fn execute(session: &mut Session, command: Command) -> Result<Value> {
    let value = match command {
        Command::Status => serde_json::to_value(session.status())?,
        Command::Tools => serde_json::to_value(session.tools()?)?,
        Command::Tool { name } => match session.tool(&name)? {
            Some(tool) => serde_json::to_value(tool)?,
            None => bail!("tool '{name}' not found"),
        },
        Command::Details => serde_json::to_value(session.tools_with_details())?,
        Command::Refresh => serde_json::to_value(session.refresh_tools().await?)?,
        Command::Call { name, args } => {
            let result = session.execute_function(&name, args).await?;
            if result.is_error() {
                warn!("Tool '{}' reported an error", name);
            }
            result.into_value()
        }
        Command::Batch { requests } => {
            let requests = parse_batch(&requests)?;
            let results = session.call_tools(&requests).await;
            let failed = results.iter().filter(|r| !r.is_success()).count();
            info!("Batch finished: {}/{} failed", failed, results.len());
            serde_json::to_value(results)?
        }
    };
    Ok(value)
}

/// Parse batch requests given inline or as `@path`
fn parse_batch(input: &str) -> Result<Vec<ToolRequest>> {
    let text = match input.strip_prefix('@') {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("failed to read batch file {path}"))?
        }
        None => input.to_string(),
    };
    serde_json::from_str(&text).context("batch must be a JSON array of tool requests")
}
