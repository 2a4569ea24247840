//! security-alert-chat — Lambda handler posting HIGH/CRITICAL Security Hub findings
//! to a chat incoming webhook.
//!
//! Triggered by the SNS topic carrying Security Hub EventBridge events.
//! Returns `{"status": "ok" | "suppressed" | "error", ...}` per invocation.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info;

use hubwatch_core::{init_tracing, load_dotenv, AlertConfig};
use hubwatch_notify::{lambda, AlertPipeline, ChatWebhook, Dispatcher};

// ── CLI ─────────────────────────────────────────────────────────────

/// Security Hub chat alert handler.
#[derive(Parser, Debug)]
#[command(name = "security-alert-chat", version, about)]
struct Cli {
    /// Process a single SNS event from this JSON file instead of serving the Lambda runtime.
    #[arg(long, env = "HUBWATCH_EVENT_FILE")]
    event_file: Option<PathBuf>,
}

// ── main ────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();
    let config = Arc::new(AlertConfig::from_env());
    init_tracing(&config.log_level);

    let cli = Cli::parse();
    config.log_summary();

    let pipeline = Arc::new(AlertPipeline::new(
        config,
        Dispatcher::new(Box::new(ChatWebhook::new())),
    )?);

    match cli.event_file {
        Some(path) => {
            let result = lambda::invoke_file(&pipeline, &path).await?;
            info!(path = %path.display(), "local invocation finished");
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        None => lambda::serve(pipeline).await?,
    }

    Ok(())
}
