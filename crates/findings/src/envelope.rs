//! SNS envelope unwrapping.
//!
//! Findings arrive as an EventBridge event serialized into the `Message`
//! string of the first SNS record:
//!
//! ```json
//! { "Records": [ { "Sns": { "Message": "{\"detail\":{\"findings\":[...]}}" } } ] }
//! ```

use serde::Deserialize;
use serde_json::Value;

/// Errors raised while extracting the finding message from the envelope.
#[derive(Debug, thiserror::Error)]
pub enum EnvelopeError {
    #[error("event has no Records")]
    NoRecords,

    #[error("malformed SNS record: {0}")]
    Record(serde_json::Error),

    #[error("SNS message is not valid JSON: {0}")]
    Message(serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct SnsEnvelope {
    #[serde(rename = "Records", default)]
    records: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct SnsRecord {
    #[serde(rename = "Sns")]
    sns: SnsPayload,
}

#[derive(Debug, Deserialize)]
struct SnsPayload {
    #[serde(rename = "Message")]
    message: String,
}

/// The decoded body of the first SNS record.
///
/// The body is kept as raw JSON: its shape is only interpreted by the
/// normalizer, which never fails on missing or mistyped fields.
#[derive(Debug, Clone, PartialEq)]
pub struct FindingMessage(Value);

impl FindingMessage {
    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    /// First entry of `detail.findings`, if the message carries any.
    pub fn first_finding(&self) -> Option<&Value> {
        self.0
            .get("detail")?
            .get("findings")?
            .as_array()?
            .first()
    }

    /// Account id from the EventBridge envelope.
    pub fn account(&self) -> Option<&str> {
        self.0.get("account").and_then(Value::as_str)
    }

    /// Region from the EventBridge envelope.
    pub fn region(&self) -> Option<&str> {
        self.0.get("region").and_then(Value::as_str)
    }
}

/// Extract and decode the message of the first record.
pub fn unwrap_event(raw: &Value) -> Result<FindingMessage, EnvelopeError> {
    let envelope = SnsEnvelope::deserialize(raw).map_err(EnvelopeError::Record)?;
    let first = envelope.records.into_iter().next().ok_or(EnvelopeError::NoRecords)?;
    let record = SnsRecord::deserialize(first).map_err(EnvelopeError::Record)?;
    let message = serde_json::from_str(&record.sns.message).map_err(EnvelopeError::Message)?;
    Ok(FindingMessage(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn wrap(message: &str) -> Value {
        json!({ "Records": [ { "Sns": { "Message": message } } ] })
    }

    #[test]
    fn unwraps_first_record() {
        let raw = wrap(
            r#"{"account":"111122223333","region":"eu-west-1","detail":{"findings":[{"Title":"t"}]}}"#,
        );
        let message = unwrap_event(&raw).unwrap();
        assert_eq!(message.account(), Some("111122223333"));
        assert_eq!(message.region(), Some("eu-west-1"));
        assert_eq!(message.first_finding().unwrap()["Title"], "t");
    }

    #[test]
    fn only_the_first_record_is_read() {
        let raw = json!({ "Records": [
            { "Sns": { "Message": "{\"account\":\"first\"}" } },
            { "unexpected": true },
        ]});
        let message = unwrap_event(&raw).unwrap();
        assert_eq!(message.account(), Some("first"));
    }

    #[test]
    fn missing_records_is_an_error() {
        let err = unwrap_event(&json!({})).unwrap_err();
        assert!(matches!(err, EnvelopeError::NoRecords));

        let err = unwrap_event(&json!({ "Records": [] })).unwrap_err();
        assert!(matches!(err, EnvelopeError::NoRecords));
    }

    #[test]
    fn records_must_be_a_list() {
        let err = unwrap_event(&json!({ "Records": "nope" })).unwrap_err();
        assert!(matches!(err, EnvelopeError::Record(_)));
    }

    #[test]
    fn missing_message_is_an_error() {
        let err = unwrap_event(&json!({ "Records": [ { "Sns": {} } ] })).unwrap_err();
        match err {
            EnvelopeError::Record(e) => assert!(e.to_string().contains("Message"), "got: {e}"),
            other => panic!("expected Record error, got: {other:?}"),
        }
    }

    #[test]
    fn undecodable_message_is_an_error() {
        let err = unwrap_event(&wrap("{not json")).unwrap_err();
        assert!(matches!(err, EnvelopeError::Message(_)));
        assert!(err.to_string().starts_with("SNS message is not valid JSON"));
    }

    #[test]
    fn message_without_findings_has_no_first_finding() {
        let message = unwrap_event(&wrap(r#"{"detail":{}}"#)).unwrap();
        assert!(message.first_finding().is_none());

        let message = unwrap_event(&wrap(r#"{"detail":{"findings":[]}}"#)).unwrap();
        assert!(message.first_finding().is_none());

        let message = unwrap_event(&wrap(r#""just a string""#)).unwrap();
        assert!(message.first_finding().is_none());
        assert!(message.account().is_none());
    }
}
