//! Email alerts: rendering and SMTP delivery via `lettre` with TLS support.
//!
//! The rendered message carries both a plain-text and an HTML body and is
//! sent as `multipart/alternative`. Amazon SES is reached through its SMTP
//! interface.

use hubwatch_core::{AlertConfig, SmtpConfig};
use hubwatch_findings::{NormalizedFinding, Severity};
use lettre::{
    message::{Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::templating::{AlertContext, TemplateRenderer, EMAIL_HTML, EMAIL_TEXT};
use crate::traits::{channel_mismatch, Channel, EmailAlert, Notifier, NotifyError, RenderedAlert};

/// Maximum number of title characters kept in the subject line.
const SUBJECT_TITLE_CHARS: usize = 80;

/// Render an email alert for a finding that passed the severity gate.
///
/// Sender and recipients are checked before any template work.
pub fn render_email(
    config: &AlertConfig,
    templates: &TemplateRenderer,
    finding: &NormalizedFinding,
    severity: Severity,
) -> Result<EmailAlert, NotifyError> {
    let from = config
        .from_email
        .clone()
        .ok_or_else(|| NotifyError::Config("FROM_EMAIL not set".to_string()))?;
    if config.to_emails.is_empty() {
        return Err(NotifyError::Config("TO_EMAILS not set".to_string()));
    }

    let ctx = AlertContext::new(config, finding, severity);
    let html_body = templates.render(EMAIL_HTML, &ctx)?;
    let text_body = templates.render(EMAIL_TEXT, &ctx)?;

    Ok(EmailAlert {
        from,
        to: config.to_emails.clone(),
        subject: subject_line(config, finding, severity),
        text_body,
        html_body,
    })
}

/// `[{project} - {environment}] {glyph} {severity}: {title}` with the title cut to 80 characters.
fn subject_line(config: &AlertConfig, finding: &NormalizedFinding, severity: Severity) -> String {
    let title: String = finding.title.chars().take(SUBJECT_TITLE_CHARS).collect();
    format!(
        "[{} - {}] {} {}: {}",
        config.project_name,
        config.environment,
        severity.glyph(),
        severity,
        title
    )
}

/// Sends email alerts via SMTP.
#[derive(Debug)]
pub struct SmtpMailer {
    /// Async SMTP transport for sending emails.
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    /// Build an `SmtpMailer` from SMTP configuration.
    ///
    /// Port 465 uses implicit TLS; any other port uses STARTTLS unless
    /// `tls` is disabled. Credentials are attached when both username and
    /// password are configured, otherwise the connection is unauthenticated.
    /// No connection is opened here.
    pub fn from_config(smtp: &SmtpConfig) -> Result<Self, NotifyError> {
        if smtp.is_ses_endpoint() && !smtp.has_credentials() {
            tracing::warn!(
                host = %smtp.host,
                "SES SMTP endpoint configured without SMTP_USERNAME/SMTP_PASSWORD; \
                 delivery will be rejected"
            );
        }

        let mut builder = if smtp.port == 465 {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&smtp.host)
                .map_err(|e| NotifyError::Config(e.to_string()))?
                .port(smtp.port)
        } else if smtp.tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp.host)
                .map_err(|e| NotifyError::Config(e.to_string()))?
                .port(smtp.port)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&smtp.host).port(smtp.port)
        };

        if let (Some(username), Some(password)) = (&smtp.username, &smtp.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
        })
    }

    /// Assemble the MIME message for an alert.
    fn build_message(alert: &EmailAlert) -> Result<Message, NotifyError> {
        let from: Mailbox = alert
            .from
            .parse()
            .map_err(|e: lettre::address::AddressError| {
                NotifyError::Config(format!("invalid sender address {}: {e}", alert.from))
            })?;

        let mut message_builder = Message::builder().from(from);
        for addr in &alert.to {
            let recipient: Mailbox = addr.parse().map_err(|e: lettre::address::AddressError| {
                NotifyError::Config(format!("invalid recipient address {addr}: {e}"))
            })?;
            message_builder = message_builder.to(recipient);
        }

        message_builder
            .subject(alert.subject.as_str())
            .multipart(MultiPart::alternative_plain_html(
                alert.text_body.clone(),
                alert.html_body.clone(),
            ))
            .map_err(|e| NotifyError::Smtp(e.to_string()))
    }
}

#[async_trait::async_trait]
impl Notifier for SmtpMailer {
    /// Send the alert to all of its recipients in a single message.
    async fn send(&self, alert: &RenderedAlert) -> Result<Option<String>, NotifyError> {
        let RenderedAlert::Email(mail) = alert else {
            return Err(channel_mismatch(Channel::Email, alert));
        };

        let message = Self::build_message(mail)?;
        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| NotifyError::Smtp(e.to_string()))?;

        let message_id = response.message().collect::<Vec<_>>().join(" ");

        tracing::info!(
            channel = "email",
            subject = %mail.subject,
            recipients = mail.to.len(),
            message_id = %message_id,
            "notification delivered"
        );

        Ok(Some(message_id))
    }

    fn channel(&self) -> Channel {
        Channel::Email
    }
}
