use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::constants::{ENV_API_TOKEN, ENV_API_URL, ENV_CONFIG, ENV_FILE, ENV_NO_COLOR, ENV_WIDTH};
use crate::data::types::SpanStatus;

#[derive(Parser)]
#[command(name = "tracescope")]
#[command(version, about = "Trace waterfall viewer", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// Trace API base URL (e.g. http://localhost:5388/api/v1/project/default)
    #[arg(long, global = true, env = ENV_API_URL)]
    pub api_url: Option<String>,

    /// Bearer token for the trace API
    #[arg(long, global = true, env = ENV_API_TOKEN, hide_env_values = true)]
    pub api_token: Option<String>,

    /// Read traces from a JSON file or a directory of JSON files
    #[arg(long, short = 'f', global = true, env = ENV_FILE, conflicts_with = "api_url")]
    pub file: Option<PathBuf>,

    /// Output width in columns
    #[arg(long, short = 'w', global = true, env = ENV_WIDTH)]
    pub width: Option<usize>,

    /// Disable ANSI colors
    #[arg(long, global = true, env = ENV_NO_COLOR)]
    pub no_color: bool,
}

/// Parse a status filter from CLI/env string
fn parse_status(s: &str) -> Result<SpanStatus, String> {
    match SpanStatus::parse(s) {
        SpanStatus::Other(_) => Err(format!(
            "Invalid status '{}'. Valid options: completed, failed, in_progress",
            s
        )),
        status => Ok(status),
    }
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Render the waterfall for one trace
    Show {
        /// Trace to open
        trace_id: String,

        /// Select a span and print its detail panel
        #[arg(long, short = 's')]
        select: Option<String>,
    },
    /// List recent traces
    List {
        /// 1-based page number
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Traces per page
        #[arg(long, short = 'n')]
        limit: Option<u32>,

        /// Only traces with this status
        #[arg(long, value_parser = parse_status)]
        status: Option<SpanStatus>,

        /// Case-insensitive match on trace name or id
        #[arg(long)]
        search: Option<String>,
    },
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub config: Option<PathBuf>,
    pub api_url: Option<String>,
    pub api_token: Option<String>,
    pub file: Option<PathBuf>,
    pub width: Option<usize>,
    pub no_color: bool,
}

impl From<&Cli> for CliConfig {
    fn from(cli: &Cli) -> Self {
        Self {
            config: cli.config.clone(),
            api_url: cli.api_url.clone(),
            api_token: cli.api_token.clone(),
            file: cli.file.clone(),
            width: cli.width,
            no_color: cli.no_color,
        }
    }
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Commands) {
    let cli = Cli::parse();
    (CliConfig::from(&cli), cli.command)
}
