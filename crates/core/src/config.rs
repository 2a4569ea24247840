use std::collections::HashMap;
use std::env;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

/// Source of raw configuration values, keyed by environment variable name.
///
/// The process environment is the production source; tests pass a map.
trait Lookup {
    fn get(&self, key: &str) -> Option<String>;
}

struct ProcessEnv;

impl Lookup for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }
}

impl Lookup for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

/// Empty values are treated the same as unset ones.
fn env_opt(src: &dyn Lookup, key: &str) -> Option<String> {
    src.get(key).filter(|s| !s.trim().is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(src: &dyn Lookup, profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(src, &prefixed) {
            return Some(v);
        }
    }
    env_opt(src, key)
}

fn profiled_env_or(src: &dyn Lookup, profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(src, profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_u16(src: &dyn Lookup, profile: &str, key: &str, default: u16) -> u16 {
    profiled_env_opt(src, profile, key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn profiled_env_bool(src: &dyn Lookup, profile: &str, key: &str, default: bool) -> bool {
    match profiled_env_opt(src, profile, key) {
        Some(v) => matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        None => default,
    }
}

/// Split a comma-separated address list, dropping blank entries.
fn split_list(raw: Option<String>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

// ── Top-level config ──────────────────────────────────────────

/// Process-wide alerting configuration.
///
/// Built once at startup and shared read-only with the renderers and
/// transports. Delivery-critical values (sender, recipients, webhook URL)
/// are optional here; their absence is reported when an alert is rendered.
#[derive(Debug, Clone)]
pub struct AlertConfig {
    /// Active profile name (empty = default).
    pub profile: String,
    /// Sender address for email alerts.
    pub from_email: Option<String>,
    /// Recipient addresses for email alerts.
    pub to_emails: Vec<String>,
    /// Chat webhook endpoint.
    pub webhook_url: Option<String>,
    /// Project label shown in subjects and headers.
    pub project_name: String,
    /// Environment label (e.g. `prod`, `staging`).
    pub environment: String,
    /// Log verbosity, as given (e.g. `INFO`, `debug`).
    pub log_level: String,
    pub smtp: SmtpConfig,
}

impl AlertConfig {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `HUBWATCH_PROFILE`. When set (e.g. `PROD`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        Self::from_source(&ProcessEnv)
    }

    /// Build config from an explicit key/value map instead of the process environment.
    pub fn from_map(vars: &HashMap<String, String>) -> Self {
        Self::from_source(vars)
    }

    fn from_source(src: &dyn Lookup) -> Self {
        let profile = env_opt(src, "HUBWATCH_PROFILE")
            .unwrap_or_default()
            .to_uppercase();
        let p = profile.as_str();
        Self {
            profile: p.to_string(),
            from_email: profiled_env_opt(src, p, "FROM_EMAIL").map(|s| s.trim().to_string()),
            to_emails: split_list(profiled_env_opt(src, p, "TO_EMAILS")),
            webhook_url: profiled_env_opt(src, p, "SLACK_WEBHOOK_URL")
                .map(|s| s.trim().to_string()),
            project_name: profiled_env_or(src, p, "PROJECT_NAME", "AWS"),
            environment: profiled_env_or(src, p, "ENVIRONMENT", "UNKNOWN"),
            log_level: profiled_env_or(src, p, "LOG_LEVEL", "INFO"),
            smtp: SmtpConfig::from_source(src, p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() {
            "default"
        } else {
            &self.profile
        }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!(
            "  labels:   project={}, environment={}",
            self.project_name,
            self.environment
        );
        tracing::info!(
            "  email:    from={}, recipients={}",
            self.from_email.as_deref().unwrap_or("(none)"),
            self.to_emails.len()
        );
        tracing::info!(
            "  chat:     webhook={}",
            if self.webhook_url.is_some() { "configured" } else { "(none)" }
        );
        tracing::info!(
            "  smtp:     host={}, port={}, tls={}, auth={}",
            self.smtp.host,
            self.smtp.port,
            self.smtp.tls,
            self.smtp.has_credentials()
        );
    }
}

// ── SMTP ──────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub tls: bool,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl SmtpConfig {
    fn from_source(src: &dyn Lookup, p: &str) -> Self {
        // Default to the regional SES SMTP endpoint.
        let region = profiled_env_or(src, p, "AWS_REGION", "us-east-1");
        let default_host = format!("email-smtp.{region}.amazonaws.com");
        Self {
            host: profiled_env_or(src, p, "SMTP_HOST", &default_host),
            port: profiled_env_u16(src, p, "SMTP_PORT", 587),
            tls: profiled_env_bool(src, p, "SMTP_TLS", true),
            username: profiled_env_opt(src, p, "SMTP_USERNAME"),
            password: profiled_env_opt(src, p, "SMTP_PASSWORD"),
        }
    }

    pub fn has_credentials(&self) -> bool {
        self.username.is_some() && self.password.is_some()
    }

    /// True for the regional SES SMTP interface (`email-smtp.{region}.amazonaws.com`),
    /// which rejects unauthenticated senders.
    pub fn is_ses_endpoint(&self) -> bool {
        let host = self.host.to_ascii_lowercase();
        host.starts_with("email-smtp.") && host.ends_with(".amazonaws.com")
    }
}
