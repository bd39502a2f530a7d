//! Campaign Express: LLM-orchestrated marketing campaign generator.
//!
//! Main entry point that builds the generation collaborators and either
//! serves the HTTP API or runs a single brief from the command line.

use campaign_agents::WorkflowEngine;
use campaign_api::ApiServer;
use campaign_core::config::{AppConfig, DecisionMode};
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};

/// Used when `RUST_LOG` is unset. Covers every workspace crate so step,
/// grounding and generation events are not filtered out.
const DEFAULT_LOG_FILTER: &str = "campaign_express=info,campaign_api=info,campaign_agents=info,\
campaign_llm=info,campaign_cdp=info,campaign_channels=info,campaign_core=info,tower_http=info";

#[derive(Parser, Debug)]
#[command(name = "campaign-express")]
#[command(about = "Turns a campaign brief into audiences, content and a review task")]
#[command(version)]
struct Cli {
    /// Configuration file (TOML); environment variables still apply on top
    #[arg(long, short, env = "CAMPAIGN_EXPRESS_CONFIG")]
    config: Option<String>,

    /// Bind address (overrides config)
    #[arg(long, env = "CAMPAIGN_EXPRESS__API__HOST")]
    host: Option<String>,

    /// HTTP port (overrides config)
    #[arg(long, env = "CAMPAIGN_EXPRESS__API__HTTP_PORT")]
    http_port: Option<u16>,

    /// Orchestration mode: deterministic or llm (overrides config)
    #[arg(long, value_parser = ["deterministic", "llm"])]
    decision_mode: Option<String>,

    /// Run one workflow for this brief, print the final state and exit
    #[arg(long)]
    brief: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is normal; only report one that fails to parse.
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Failed to load .env: {e}");
        }
    }

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .json()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    info!("Campaign Express starting up");

    // Load configuration
    let mut config = AppConfig::load(cli.config.as_deref())?;

    // Apply CLI overrides
    if let Some(host) = cli.host {
        config.api.host = host;
    }
    if let Some(port) = cli.http_port {
        config.api.http_port = port;
    }
    match cli.decision_mode.as_deref() {
        Some("llm") => config.workflow.decision_mode = DecisionMode::Llm,
        Some("deterministic") => config.workflow.decision_mode = DecisionMode::Deterministic,
        _ => {}
    }

    info!(
        node_id = %config.node_id,
        http_port = config.api.http_port,
        decision_mode = ?config.workflow.decision_mode,
        grounding = config.grounding.enabled,
        "Configuration loaded"
    );

    let workflow = Arc::new(WorkflowEngine::build(&config)?);

    if let Some(brief) = cli.brief {
        let state = workflow.run(&brief).await?;
        println!("{}", serde_json::to_string_pretty(&state)?);
        return Ok(());
    }

    let api_server = ApiServer::new(config.clone(), workflow);

    if config.metrics.enabled {
        if let Err(e) = api_server.start_metrics().await {
            error!(error = %e, "Failed to start metrics exporter");
        }
    }

    info!("Campaign Express is ready to serve traffic");

    // Start HTTP server (blocks until shutdown)
    api_server.start_http().await?;

    Ok(())
}
