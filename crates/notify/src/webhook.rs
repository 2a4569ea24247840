//! Chat webhook alerts (Slack-compatible incoming webhooks).
//!
//! Delivers a single attachment as a JSON POST. Delivery counts as
//! successful whenever the request completes; the response status is
//! logged but not enforced.

use hubwatch_core::AlertConfig;
use hubwatch_findings::{NormalizedFinding, Severity};

use crate::templating::{AlertContext, TemplateRenderer, CHAT_TEXT};
use crate::traits::{
    channel_mismatch, Channel, ChatAlert, ChatAttachment, ChatPayload, Notifier, NotifyError,
    RenderedAlert,
};

/// Render a chat alert for a finding that passed the severity gate.
///
/// The webhook URL is checked before any template work.
pub fn render_chat(
    config: &AlertConfig,
    templates: &TemplateRenderer,
    finding: &NormalizedFinding,
    severity: Severity,
) -> Result<ChatAlert, NotifyError> {
    let webhook_url = config
        .webhook_url
        .clone()
        .ok_or_else(|| NotifyError::Config("SLACK_WEBHOOK_URL not set".to_string()))?;

    let text = templates.render(CHAT_TEXT, &AlertContext::new(config, finding, severity))?;

    Ok(ChatAlert {
        webhook_url,
        payload: ChatPayload {
            attachments: vec![ChatAttachment {
                color: severity.color().to_string(),
                text,
                footer: finding.created_at.as_ref().map(|ts| format!("CreatedAt: {ts}")),
            }],
        },
    })
}

/// Posts chat alerts to their webhook URL.
#[derive(Debug, Default)]
pub struct ChatWebhook {
    /// Shared HTTP client (connection pooling across invocations).
    client: reqwest::Client,
}

impl ChatWebhook {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl Notifier for ChatWebhook {
    /// Deliver the attachment payload as JSON to the alert's webhook URL.
    async fn send(&self, alert: &RenderedAlert) -> Result<Option<String>, NotifyError> {
        let RenderedAlert::Chat(chat) = alert else {
            return Err(channel_mismatch(Channel::Chat, alert));
        };

        let response = self
            .client
            .post(&chat.webhook_url)
            .json(&chat.payload)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::warn!(
                %status,
                body = %body_text,
                "webhook returned non-2xx status"
            );
        } else {
            tracing::debug!(%status, "webhook notification delivered");
        }

        Ok(None)
    }

    fn channel(&self) -> Channel {
        Channel::Chat
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(webhook: Option<&str>) -> AlertConfig {
        let mut vars = HashMap::from([("PROJECT_NAME".to_string(), "Acme".to_string())]);
        if let Some(url) = webhook {
            vars.insert("SLACK_WEBHOOK_URL".to_string(), url.to_string());
        }
        AlertConfig::from_map(&vars)
    }

    fn finding() -> NormalizedFinding {
        NormalizedFinding {
            title: "GuardDuty: crypto mining".to_string(),
            severity: "HIGH".to_string(),
            product: "GuardDuty".to_string(),
            account: "123456789012".to_string(),
            region: "eu-west-1".to_string(),
            resource: "web-1 (i-123)".to_string(),
            description: "Instance queried a mining pool".to_string(),
            console_url: "https://console.example/finding/1".to_string(),
            ..NormalizedFinding::default()
        }
    }

    #[test]
    fn renders_attachment() {
        let templates = TemplateRenderer::new().unwrap();
        let alert = render_chat(
            &config(Some("https://hooks.example.com/T/B/x")),
            &templates,
            &finding(),
            Severity::High,
        )
        .unwrap();

        assert_eq!(alert.webhook_url, "https://hooks.example.com/T/B/x");
        let attachment = &alert.payload.attachments[0];
        assert_eq!(alert.payload.attachments.len(), 1);
        assert_eq!(attachment.color, "#FF0000");
        assert!(attachment
            .text
            .starts_with("*[Acme] 🟠 HIGH Security Finding*\n\n*Title:* GuardDuty: crypto mining\n"));
        assert!(attachment.text.contains("*Resource:* web-1 (i-123)\n"));
        assert!(attachment.text.ends_with(
            "*Description:*\nInstance queried a mining pool\n\n<https://console.example/finding/1|Open in AWS Console>"
        ));
        assert!(attachment.footer.is_none());
    }

    #[test]
    fn lists_are_fenced_and_footer_carries_timestamp() {
        let templates = TemplateRenderer::new().unwrap();
        let mut f = finding();
        f.types = vec!["TTPs/Impact".to_string()];
        f.threats = vec!["CryptoCurrency:EC2/BitcoinTool.B".to_string()];
        f.created_at = Some("2026-09-30T08:14:12Z".to_string());
        let cfg = config(Some("https://hooks.example.com/x"));
        let alert = render_chat(&cfg, &templates, &f, Severity::Critical).unwrap();

        let attachment = &alert.payload.attachments[0];
        assert_eq!(attachment.color, "#8B0000");
        assert!(attachment.text.contains("🔴 CRITICAL"));
        assert!(attachment.text.contains(
            "mining pool\n\n*Types:*\n```[\n  \"TTPs/Impact\"\n]```\n*Threats:*\n```["
        ));
        assert!(attachment.text.ends_with(
            "\"CryptoCurrency:EC2/BitcoinTool.B\"\n]```\n<https://console.example/finding/1|Open in AWS Console>"
        ));
        assert_eq!(attachment.footer.as_deref(), Some("CreatedAt: 2026-09-30T08:14:12Z"));
    }

    #[test]
    fn remediation_is_not_part_of_chat_text() {
        let templates = TemplateRenderer::new().unwrap();
        let mut f = finding();
        f.remediation = "Terminate the instance".to_string();
        let cfg = config(Some("https://hooks.example.com/x"));
        let alert = render_chat(&cfg, &templates, &f, Severity::High).unwrap();
        assert!(!alert.payload.attachments[0].text.contains("Terminate the instance"));
    }

    #[test]
    fn missing_webhook_is_a_configuration_error() {
        let templates = TemplateRenderer::new().unwrap();
        let err = render_chat(&config(None), &templates, &finding(), Severity::High).unwrap_err();
        assert!(matches!(err, NotifyError::Config(_)));
        assert!(err.to_string().contains("SLACK_WEBHOOK_URL not set"));
    }

    #[test]
    fn channel_name_is_chat() {
        assert_eq!(ChatWebhook::new().channel_name(), "chat");
    }
}
