//! waf-log-router — Firehose transformation Lambda tagging WAF logs with a
//! `log_type` partition key (`blocked` / `allowed`).

use lambda_runtime::{service_fn, LambdaEvent};
use tracing::info;

use hubwatch_core::{init_tracing, load_dotenv};
use hubwatch_router::{route_batch, FirehoseEvent, FirehoseResponse};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "INFO".to_string());
    init_tracing(&log_level);

    info!("waf-log-router starting");
    lambda_runtime::run(service_fn(|event: LambdaEvent<FirehoseEvent>| async move {
        Ok::<FirehoseResponse, lambda_runtime::Error>(route_batch(&event.payload))
    }))
    .await
    .map_err(|e| anyhow::anyhow!(e))
}
