//! Severity labels and their shared presentation (accent colour, marker glyph).

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Informational,
    Unknown,
}

impl Severity {
    /// Parse a severity label case-insensitively. Anything unrecognised is `Unknown`.
    pub fn parse(label: &str) -> Self {
        match label.to_uppercase().as_str() {
            "CRITICAL" => Self::Critical,
            "HIGH" => Self::High,
            "MEDIUM" => Self::Medium,
            "LOW" => Self::Low,
            "INFORMATIONAL" => Self::Informational,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
            Self::Informational => "INFORMATIONAL",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Only the two highest severities produce outbound alerts.
    pub fn is_alert_worthy(&self) -> bool {
        matches!(self, Self::Critical | Self::High)
    }

    /// Accent colour used by both the email header and the chat attachment.
    pub fn color(&self) -> &'static str {
        match self {
            Self::Critical => "#8B0000",
            Self::High => "#FF0000",
            Self::Medium => "#FFA500",
            Self::Low => "#FFFF00",
            Self::Informational => "#439FE0",
            Self::Unknown => "#CCCCCC",
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Critical => "🔴",
            _ => "🟠",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
