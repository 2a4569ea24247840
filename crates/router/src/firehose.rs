//! Firehose data-transformation wire types.

use serde::{Deserialize, Serialize};

/// Batch handed to a Firehose transformation Lambda.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FirehoseEvent {
    #[serde(default)]
    pub invocation_id: Option<String>,
    #[serde(default)]
    pub delivery_stream_arn: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub records: Vec<FirehoseRecord>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FirehoseRecord {
    #[serde(default)]
    pub record_id: String,
    /// Base64-encoded payload.
    #[serde(default)]
    pub data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approximate_arrival_timestamp: Option<i64>,
}

/// Response returned to Firehose; one entry per input record, in order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FirehoseResponse {
    pub records: Vec<ProcessedRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedRecord {
    pub record_id: String,
    pub result: RecordResult,
    /// The original base64 payload, unchanged.
    pub data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<RecordMetadata>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum RecordResult {
    Ok,
    ProcessingFailed,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordMetadata {
    pub partition_keys: PartitionKeys,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PartitionKeys {
    pub log_type: LogType,
}

/// Partition assigned from the WAF terminating action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogType {
    Blocked,
    Allowed,
}

impl LogType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blocked => "blocked",
            Self::Allowed => "allowed",
        }
    }
}

impl ProcessedRecord {
    pub fn ok(record: &FirehoseRecord, log_type: LogType) -> Self {
        Self {
            record_id: record.record_id.clone(),
            result: RecordResult::Ok,
            data: record.data.clone(),
            metadata: Some(RecordMetadata {
                partition_keys: PartitionKeys { log_type },
            }),
        }
    }

    pub fn failed(record: &FirehoseRecord) -> Self {
        Self {
            record_id: record.record_id.clone(),
            result: RecordResult::ProcessingFailed,
            data: record.data.clone(),
            metadata: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ok_record_wire_format() {
        let record = FirehoseRecord {
            record_id: "49546986683135544286507457936321625675700192471156785154".to_string(),
            data: "eyJhY3Rpb24iOiJCTE9DSyJ9".to_string(),
            approximate_arrival_timestamp: None,
        };
        let json = serde_json::to_value(ProcessedRecord::ok(&record, LogType::Blocked)).unwrap();
        assert_eq!(
            json,
            json!({
                "recordId": "49546986683135544286507457936321625675700192471156785154",
                "result": "Ok",
                "data": "eyJhY3Rpb24iOiJCTE9DSyJ9",
                "metadata": { "partitionKeys": { "log_type": "blocked" } },
            })
        );
    }

    #[test]
    fn failed_record_has_no_metadata() {
        let record = FirehoseRecord {
            record_id: "r1".to_string(),
            data: "@@@".to_string(),
            approximate_arrival_timestamp: None,
        };
        let json = serde_json::to_value(ProcessedRecord::failed(&record)).unwrap();
        assert_eq!(json, json!({ "recordId": "r1", "result": "ProcessingFailed", "data": "@@@" }));
    }

    #[test]
    fn event_without_records_deserializes() {
        let event: FirehoseEvent =
            serde_json::from_value(json!({ "invocationId": "abc" })).unwrap();
        assert!(event.records.is_empty());
    }
}
