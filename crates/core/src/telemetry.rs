//! Tracing subscriber setup shared by the Lambda binaries.

use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

/// Target used for the forensic dump of every inbound event.
///
/// The filter built by [`init_tracing`] always enables this target at
/// `info`, whatever `LOG_LEVEL` says.
pub const RAW_EVENT_TARGET: &str = "raw_event";

/// Build the filter for a `LOG_LEVEL` value such as `INFO` or `debug`.
///
/// `RUST_LOG` wins when set. Unrecognised levels fall back to `info`.
pub fn env_filter(log_level: &str) -> EnvFilter {
    let base = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_directive(log_level)));

    match format!("{RAW_EVENT_TARGET}=info").parse::<Directive>() {
        Ok(directive) => base.add_directive(directive),
        Err(_) => base,
    }
}

/// Map a `LOG_LEVEL` value onto a tracing level directive.
fn level_directive(log_level: &str) -> &'static str {
    match log_level.trim().to_ascii_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "warn" | "warning" => "warn",
        "error" | "critical" | "fatal" => "error",
        "off" => "off",
        _ => "info",
    }
}

/// Install the global fmt subscriber. Lambda captures stdout, so no ANSI colours.
pub fn init_tracing(log_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(log_level))
        .with_ansi(false)
        .with_target(true)
        .init();
}
