//! Minijinja template rendering for alert bodies.
//!
//! The email (HTML and plain text) and chat templates ship with the crate
//! and are registered once. The `.html` template is auto-escaped; the
//! text templates are rendered verbatim.

use hubwatch_core::AlertConfig;
use hubwatch_findings::{NormalizedFinding, Severity};

use crate::traits::NotifyError;

pub const EMAIL_HTML: &str = "alert.html";
pub const EMAIL_TEXT: &str = "alert.txt";
pub const CHAT_TEXT: &str = "chat.txt";

/// Data available to every alert template.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AlertContext<'a> {
    pub finding: &'a NormalizedFinding,
    /// Normalized severity (`CRITICAL` or `HIGH` once past the gate).
    pub severity: Severity,
    /// Accent colour for the severity.
    pub color: &'static str,
    /// Marker glyph for the severity.
    pub glyph: &'static str,
    pub project: &'a str,
    pub environment: &'a str,
}

impl<'a> AlertContext<'a> {
    pub fn new(
        config: &'a AlertConfig,
        finding: &'a NormalizedFinding,
        severity: Severity,
    ) -> Self {
        Self {
            finding,
            severity,
            color: severity.color(),
            glyph: severity.glyph(),
            project: &config.project_name,
            environment: &config.environment,
        }
    }
}

/// Renders the built-in alert templates.
#[derive(Debug)]
pub struct TemplateRenderer {
    env: minijinja::Environment<'static>,
}

impl TemplateRenderer {
    /// Build the environment and register the bundled templates.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Template`] if a bundled template fails to parse.
    pub fn new() -> Result<Self, NotifyError> {
        let mut env = minijinja::Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);

        env.add_filter("pretty_json", pretty_json_filter);

        for (name, source) in [
            (EMAIL_HTML, include_str!("../templates/alert.html")),
            (EMAIL_TEXT, include_str!("../templates/alert.txt")),
            (CHAT_TEXT, include_str!("../templates/chat.txt")),
        ] {
            env.add_template(name, source)
                .map_err(|e| NotifyError::Template(format!("{name}: {e}")))?;
        }

        Ok(Self { env })
    }

    /// Render one of the registered templates.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Template`] if the template is unknown or
    /// rendering fails.
    pub fn render(&self, name: &str, ctx: &AlertContext<'_>) -> Result<String, NotifyError> {
        self.env
            .get_template(name)
            .and_then(|tmpl| tmpl.render(ctx))
            .map_err(|e| NotifyError::Template(e.to_string()))
    }
}

/// Custom filter: pretty-print a list as an indented JSON array.
fn pretty_json_filter(value: Vec<String>) -> String {
    serde_json::to_string_pretty(&value).unwrap_or_else(|_| format!("{value:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config() -> AlertConfig {
        let vars = HashMap::from([
            ("PROJECT_NAME".to_string(), "Acme".to_string()),
            ("ENVIRONMENT".to_string(), "prod".to_string()),
        ]);
        AlertConfig::from_map(&vars)
    }

    fn sample_finding() -> NormalizedFinding {
        NormalizedFinding {
            title: "Port 22 open to the world".to_string(),
            severity: "high".to_string(),
            resource: "bastion (i-0abc)".to_string(),
            description: "Security group allows 0.0.0.0/0 on 22".to_string(),
            ..NormalizedFinding::default()
        }
    }

    #[test]
    fn bundled_templates_parse() {
        assert!(TemplateRenderer::new().is_ok());
    }

    #[test]
    fn context_carries_palette() {
        let cfg = config();
        let finding = sample_finding();
        let ctx = AlertContext::new(&cfg, &finding, Severity::Critical);
        assert_eq!(ctx.color, "#8B0000");
        assert_eq!(ctx.glyph, "🔴");
        assert_eq!(ctx.project, "Acme");
        assert_eq!(ctx.environment, "prod");
    }

    #[test]
    fn text_template_without_optional_blocks() {
        let renderer = TemplateRenderer::new().unwrap();
        let cfg = config();
        let finding = sample_finding();
        let text = renderer
            .render(EMAIL_TEXT, &AlertContext::new(&cfg, &finding, Severity::High))
            .unwrap();

        assert!(text.starts_with("[Acme - prod] 🟠 HIGH Security Finding\n"));
        assert!(text.contains("Resource: bastion (i-0abc)\n"));
        assert!(!text.contains("Created At:"));
        assert!(!text.contains("Remediation:"));
        assert!(!text.contains("Types:"));
        assert!(
            text.contains("Open in AWS Console: https://console.aws.amazon.com/securityhub/home")
        );
    }

    #[test]
    fn pretty_json_filter_indents() {
        let out = pretty_json_filter(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(out, "[\n  \"a\",\n  \"b\"\n]");
    }

    #[test]
    fn html_template_escapes_values() {
        let renderer = TemplateRenderer::new().unwrap();
        let cfg = config();
        let mut finding = sample_finding();
        finding.title = "<script>alert(1)</script>".to_string();
        let html = renderer
            .render(EMAIL_HTML, &AlertContext::new(&cfg, &finding, Severity::High))
            .unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn unknown_template_is_an_error() {
        let renderer = TemplateRenderer::new().unwrap();
        let cfg = config();
        let finding = sample_finding();
        let ctx = AlertContext::new(&cfg, &finding, Severity::High);
        let result = renderer.render("missing.txt", &ctx);
        assert!(matches!(result, Err(NotifyError::Template(_))));
    }
}
