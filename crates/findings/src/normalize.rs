//! Finding normalization across the OCSF and classic ASFF shapes.
//!
//! Normalization is deliberately lenient: a missing or mistyped field
//! falls back to its default and never turns into an error. Schema drift
//! in the scanner output must not silence an alert.

use serde_json::Value;

use crate::envelope::FindingMessage;
use crate::model::NormalizedFinding;

const EC2_INSTANCE: &str = "AWS::EC2::Instance";

/// The two finding shapes Security Hub can emit.
///
/// The presence of a `finding_info` key is the only discriminator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FindingVariant<'a> {
    /// OCSF / Security Hub v2: nested `finding_info`, `cloud`, `metadata`.
    Ocsf(&'a Value),
    /// AWS Security Finding Format: flat, capitalized keys.
    Asff(&'a Value),
}

impl<'a> FindingVariant<'a> {
    pub fn classify(finding: &'a Value) -> Self {
        if finding.get("finding_info").is_some() {
            Self::Ocsf(finding)
        } else {
            Self::Asff(finding)
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Ocsf(_) => "ocsf",
            Self::Asff(_) => "asff",
        }
    }
}

/// Produce the canonical record for the first finding of a message.
///
/// A message without findings yields the defaults, whose `UNKNOWN`
/// severity the gate later suppresses.
pub fn normalize(message: &FindingMessage) -> NormalizedFinding {
    let mut out = NormalizedFinding::with_envelope(message.account(), message.region());

    let Some(finding) = message.first_finding() else {
        tracing::debug!("message carries no findings, using defaults");
        return out;
    };

    if let Some(url) = text_at(finding, &["SourceUrl"]) {
        out.console_url = url;
    }

    let variant = FindingVariant::classify(finding);
    tracing::debug!(variant = variant.name(), "classified finding");

    match variant {
        FindingVariant::Ocsf(f) => normalize_ocsf(f, &mut out),
        FindingVariant::Asff(f) => normalize_asff(f, &mut out),
    }
    out
}

fn normalize_ocsf(f: &Value, out: &mut NormalizedFinding) {
    if let Some(title) = text_at(f, &["title"]).or_else(|| text_at(f, &["finding_info", "title"])) {
        out.title = title;
    }
    if let Some(severity) = text_at(f, &["severity"]) {
        out.severity = severity;
    }
    out.created_at = text_at(f, &["created_time_dt"])
        .or_else(|| text_at(f, &["finding_info", "created_time_dt"]));
    out.description = text_at(f, &["finding_info", "desc"]).unwrap_or_default();

    if let Some(account) = text_at(f, &["cloud", "account", "uid"]) {
        out.account = account;
    }
    if let Some(region) = text_at(f, &["cloud", "region"]) {
        out.region = region;
    }
    if let Some(product) = text_at(f, &["metadata", "product", "name"]) {
        out.product = product;
    }

    out.types = list_at(f, "types");
    out.threats = list_at(f, "Threats");
    out.remediation = recommendation(f)
        .or_else(|| text_at(f, &["remediation", "desc"]))
        .unwrap_or_default();

    // Only EC2 instances are considered; other resource types keep the default.
    let instance = f
        .get("resources")
        .and_then(Value::as_array)
        .and_then(|rs| {
            rs.iter()
                .find(|r| r.get("type").and_then(Value::as_str) == Some(EC2_INSTANCE))
        });
    if let Some(r) = instance {
        out.resource = resource_label(r, "uid", &out.resource);
    }
}

fn normalize_asff(f: &Value, out: &mut NormalizedFinding) {
    if let Some(title) = text_at(f, &["Title"]) {
        out.title = title;
    }
    out.description = text_at(f, &["Description"]).unwrap_or_default();
    if let Some(severity) = text_at(f, &["Severity", "Label"]) {
        out.severity = severity;
    }
    if let Some(product) = text_at(f, &["ProductName"]) {
        out.product = product;
    }
    if let Some(account) = text_at(f, &["AwsAccountId"]) {
        out.account = account;
    }
    if let Some(region) = text_at(f, &["Region"]) {
        out.region = region;
    }
    out.created_at = text_at(f, &["CreatedAt"]);

    out.types = list_at(f, "Types");
    out.threats = list_at(f, "Threats");
    out.remediation = recommendation(f).unwrap_or_default();

    // The first resource is taken whatever its type, unlike the OCSF path.
    // TODO: decide whether ASFF should also prefer EC2 instances once the
    // alert consumers agree on which resource they expect to see.
    let first = f
        .get("Resources")
        .and_then(Value::as_array)
        .and_then(|rs| rs.first());
    if let Some(r) = first {
        out.resource = resource_label(r, "Id", &out.resource);
    }
}

/// `Remediation.Recommendation.Text`, shared by both shapes.
fn recommendation(f: &Value) -> Option<String> {
    text_at(f, &["Remediation", "Recommendation", "Text"])
}

/// `"{name} ({id})"` when the resource has a `Name` tag, otherwise the bare id.
fn resource_label(resource: &Value, id_key: &str, fallback: &str) -> String {
    let id = text_at(resource, &[id_key]).unwrap_or_else(|| fallback.to_string());
    match name_tag(resource) {
        Some(name) => format!("{name} ({id})"),
        None => id,
    }
}

/// The `Name` tag, from either a `Tags` map or an OCSF `tags` list of
/// `{ "name": .., "value": .. }` pairs.
fn name_tag(resource: &Value) -> Option<String> {
    if let Some(name) = text_at(resource, &["Tags", "Name"]) {
        return Some(name);
    }
    resource
        .get("tags")
        .and_then(Value::as_array)?
        .iter()
        .find(|t| t.get("name").and_then(Value::as_str) == Some("Name"))
        .and_then(|t| text_at(t, &["value"]))
}

/// Walk `path` through nested objects and render the leaf as text.
///
/// Strings are returned as-is, numbers and booleans are stringified.
/// Empty strings, nulls and containers count as absent.
fn text_at(value: &Value, path: &[&str]) -> Option<String> {
    let leaf = path.iter().try_fold(value, |v, key| v.get(key))?;
    let text = match leaf {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// Read a list field, flattening each entry to a display string.
///
/// Objects carrying a `Name` (ASFF threats) collapse to that name;
/// anything else non-textual is kept as compact JSON.
fn list_at(value: &Value, key: &str) -> Vec<String> {
    let Some(items) = value.get(key).and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .map(|item| match item {
            Value::String(s) => s.clone(),
            other => text_at(other, &["Name"]).unwrap_or_else(|| other.to_string()),
        })
        .collect()
}
