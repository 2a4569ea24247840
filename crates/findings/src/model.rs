use serde::Serialize;

pub const DEFAULT_TITLE: &str = "Security Finding";
pub const DEFAULT_SEVERITY: &str = "UNKNOWN";
pub const DEFAULT_PRODUCT: &str = "Security Hub";
pub const UNKNOWN: &str = "Unknown";
pub const DEFAULT_CONSOLE_URL: &str = "https://console.aws.amazon.com/securityhub/home";

/// Canonical finding record produced by [`crate::normalize`].
///
/// Every field has a total default, so a finding can always be rendered
/// regardless of which schema it came from or how much of it was present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedFinding {
    pub title: String,
    /// Severity as reported by the finding; the gate upper-cases it.
    pub severity: String,
    pub product: String,
    pub account: String,
    pub region: String,
    pub resource: String,
    pub description: String,
    pub types: Vec<String>,
    pub threats: Vec<String>,
    pub remediation: String,
    pub console_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl NormalizedFinding {
    /// Defaults seeded with the account/region of the surrounding event.
    pub fn with_envelope(account: Option<&str>, region: Option<&str>) -> Self {
        Self {
            account: non_empty(account).unwrap_or(UNKNOWN).to_string(),
            region: non_empty(region).unwrap_or(UNKNOWN).to_string(),
            ..Self::default()
        }
    }
}

impl Default for NormalizedFinding {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            severity: DEFAULT_SEVERITY.to_string(),
            product: DEFAULT_PRODUCT.to_string(),
            account: UNKNOWN.to_string(),
            region: UNKNOWN.to_string(),
            resource: UNKNOWN.to_string(),
            description: String::new(),
            types: Vec::new(),
            threats: Vec::new(),
            remediation: String::new(),
            console_url: DEFAULT_CONSOLE_URL.to_string(),
            created_at: None,
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_values_seed_account_and_region() {
        let f = NormalizedFinding::with_envelope(Some("123456789012"), None);
        assert_eq!(f.account, "123456789012");
        assert_eq!(f.region, "Unknown");
        assert_eq!(f.title, "Security Finding");
        assert_eq!(f.severity, "UNKNOWN");
        assert_eq!(f.product, "Security Hub");
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = serde_json::to_value(NormalizedFinding::default()).unwrap();
        assert_eq!(json["consoleUrl"], DEFAULT_CONSOLE_URL);
        assert!(json.get("createdAt").is_none());
    }
}
