//! Command-line entry point: load a batch, sync it, print the report.

mod cli;

use anyhow::{Context, Result};
use bridge_http::ReqwestHttpClient;
use clap::Parser;
use core_runtime::{init_logging, LoggingConfig, SyncSettings};
use core_sync::SyncOrchestrator;
use provider_glean::GleanConnector;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

use cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut logging = LoggingConfig::default().with_level(cli.log_level);
    if let Some(format) = cli.log_format {
        logging = logging.with_format(format);
    }
    init_logging(logging)?;

    let settings = SyncSettings::builder()
        .base_url(cli.base_url.as_str())
        .api_token(cli.api_token.as_str())
        .act_as(cli.act_as.as_str())
        .failure_mode(cli.failure_mode)
        .max_concurrency(cli.max_concurrency)
        .request_timeout(Duration::from_secs(cli.timeout_secs))
        .build()?;
    debug!(credentials = ?settings.credentials, "Loaded settings");

    let batch = load_batch(&cli)?;

    let http_client = ReqwestHttpClient::with_timeout(settings.request_timeout)?;
    let connector = GleanConnector::new(Arc::new(http_client), settings.credentials.clone())
        .with_request_timeout(settings.request_timeout);
    let orchestrator = SyncOrchestrator::from_settings(Arc::new(connector), &settings);

    let report = orchestrator.run_batch_json(&batch).await?;

    let output = if cli.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{}", output);

    Ok(())
}

fn load_batch(cli: &Cli) -> Result<String> {
    match (&cli.configs, &cli.config_file) {
        (Some(inline), _) => Ok(inline.clone()),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read batch file {}", path.display())),
        (None, None) => anyhow::bail!("Pass the batch with --configs or --config-file"),
    }
}
