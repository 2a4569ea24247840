//! WAF log router for Firehose dynamic partitioning.
//!
//! Each Firehose record carries a base64-encoded WAF log entry. The router
//! tags every record with a `log_type` partition key (`blocked` or
//! `allowed`) and passes the payload through untouched.

pub mod firehose;
pub mod partition;

pub use firehose::{
    FirehoseEvent, FirehoseRecord, FirehoseResponse, LogType, ProcessedRecord, RecordResult,
};
pub use partition::{classify, route_batch, route_record, RecordError};
