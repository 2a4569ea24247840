//! Per-record classification and batch routing.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::Value;

use crate::firehose::{FirehoseEvent, FirehoseRecord, FirehoseResponse, LogType, ProcessedRecord};

/// Why a record could not be classified.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("invalid base64 payload: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("payload is not a JSON object")]
    NotAnObject,
}

/// Decode a record payload and derive its partition from the WAF `action`.
///
/// A missing `action` counts as `ALLOW`; only an exact `BLOCK` is blocked.
pub fn classify(data: &str) -> Result<LogType, RecordError> {
    let payload = STANDARD.decode(data)?;
    let log: Value = serde_json::from_slice(&payload)?;
    let entry = log.as_object().ok_or(RecordError::NotAnObject)?;

    let action = entry.get("action").and_then(Value::as_str).unwrap_or("ALLOW");
    Ok(if action == "BLOCK" {
        LogType::Blocked
    } else {
        LogType::Allowed
    })
}

/// Route one record. Failures are reported on the record, never raised.
pub fn route_record(record: &FirehoseRecord) -> ProcessedRecord {
    match classify(&record.data) {
        Ok(log_type) => {
            tracing::debug!(
                record_id = %record.record_id,
                log_type = log_type.as_str(),
                "processed record"
            );
            ProcessedRecord::ok(record, log_type)
        }
        Err(e) => {
            tracing::error!(record_id = %record.record_id, error = %e, "failed to process record");
            ProcessedRecord::failed(record)
        }
    }
}

/// Route a whole batch; the output has exactly one entry per input record, in order.
pub fn route_batch(event: &FirehoseEvent) -> FirehoseResponse {
    let records: Vec<ProcessedRecord> = event.records.iter().map(route_record).collect();

    let failed = records.iter().filter(|r| r.metadata.is_none()).count();
    let blocked = records
        .iter()
        .filter(|r| {
            r.metadata
                .as_ref()
                .is_some_and(|m| m.partition_keys.log_type == LogType::Blocked)
        })
        .count();
    tracing::info!(
        total = records.len(),
        blocked,
        allowed = records.len() - blocked - failed,
        failed,
        "processed records"
    );

    FirehoseResponse { records }
}
