//! security-alert-email — Lambda handler mailing HIGH/CRITICAL Security Hub findings.
//!
//! Triggered by the SNS topic carrying Security Hub EventBridge events.
//! Returns `{"status": "ok" | "suppressed" | "error", ...}` per invocation.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info;

use hubwatch_core::{init_tracing, load_dotenv, AlertConfig};
use hubwatch_notify::{lambda, AlertPipeline, Dispatcher, SmtpMailer};

// ── CLI ─────────────────────────────────────────────────────────────

/// Security Hub email alert handler.
#[derive(Parser, Debug)]
#[command(name = "security-alert-email", version, about)]
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

    let mailer = SmtpMailer::from_config(&config.smtp)?;
    let pipeline = Arc::new(AlertPipeline::new(
        config,
        Dispatcher::new(Box::new(mailer)),
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
