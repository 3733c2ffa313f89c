use clap::{ArgGroup, Parser};
use core_runtime::{FailureMode, LogFormat, LogLevel};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "collection-sync")]
#[command(about = "Sync named collections with the results of stored searches")]
#[command(version)]
#[command(group(ArgGroup::new("batch").required(true).args(["configs", "config_file"])))]
pub struct Cli {
    /// Batch as a JSON list of {"name", "query", "filters"} objects
    #[arg(long)]
    pub configs: Option<String>,

    /// File containing the JSON batch
    #[arg(long)]
    pub config_file: Option<PathBuf>,

    /// Platform base URL
    #[arg(long, env = "GLEAN_BASE_URL")]
    pub base_url: String,

    /// API token
    #[arg(long, env = "GLEAN_API_TOKEN", hide_env_values = true)]
    pub api_token: String,

    /// User the requests act on behalf of
    #[arg(long, env = "GLEAN_ACT_AS")]
    pub act_as: String,

    /// How a failing configuration affects the batch (isolate, abort-batch)
    #[arg(long, default_value = "isolate")]
    pub failure_mode: FailureMode,

    /// Configurations synced concurrently
    #[arg(long, default_value_t = core_runtime::config::DEFAULT_MAX_CONCURRENCY)]
    pub max_concurrency: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Log output format (pretty, json, compact)
    #[arg(long)]
    pub log_format: Option<LogFormat>,

    /// Minimum log level
    #[arg(long, default_value = "info")]
    pub log_level: LogLevel,

    /// Pretty-print the JSON report
    #[arg(long)]
    pub pretty: bool,
}
