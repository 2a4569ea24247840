//! Entry points shared by the alert binaries: the Lambda runtime loop and
//! a local mode that replays a single event from a JSON file.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use lambda_runtime::{service_fn, LambdaEvent};
use serde_json::Value;

use crate::pipeline::{AlertPipeline, InvocationResult};

/// Serve invocations from the Lambda runtime API until the process is stopped.
pub async fn serve(pipeline: Arc<AlertPipeline>) -> anyhow::Result<()> {
    tracing::info!(channel = pipeline.channel().as_str(), "alert handler starting");
    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let pipeline = Arc::clone(&pipeline);
        async move {
            tracing::debug!(request_id = %event.context.request_id, "invocation");
            Ok::<InvocationResult, lambda_runtime::Error>(pipeline.handle(&event.payload).await)
        }
    }))
    .await
    .map_err(|e| anyhow::anyhow!(e))
}

/// Run one invocation against an event stored on disk.
pub async fn invoke_file(
    pipeline: &AlertPipeline,
    path: &Path,
) -> anyhow::Result<InvocationResult> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read event file {}", path.display()))?;
    let event: Value = serde_json::from_str(&raw)
        .with_context(|| format!("event file {} is not valid JSON", path.display()))?;
    Ok(pipeline.handle(&event).await)
}
