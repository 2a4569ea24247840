//! Severity gate: only `CRITICAL` and `HIGH` findings are alerted on.

use crate::severity::Severity;

/// Outcome of the severity gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Alert-worthy; carries the normalized severity.
    Proceed(Severity),
    /// Below threshold; carries the severity exactly as the finding reported it.
    Suppressed { severity: String },
}

/// Decide whether a finding with this severity label should be alerted on.
pub fn evaluate(severity: &str) -> GateDecision {
    let parsed = Severity::parse(severity);
    if parsed.is_alert_worthy() {
        GateDecision::Proceed(parsed)
    } else {
        GateDecision::Suppressed {
            severity: severity.to_string(),
        }
    }
}
