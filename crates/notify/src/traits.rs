//! Notifier trait definition, rendered payloads and shared error types.

use serde::{Deserialize, Serialize};

/// Errors that can occur while rendering or delivering an alert.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("SMTP delivery failed: {0}")]
    Smtp(String),

    #[error("Template rendering failed: {0}")]
    Template(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

impl NotifyError {
    /// Coarse classification used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "configuration",
            Self::Template(_) => "render",
            Self::Http(_) | Self::Smtp(_) | Self::Transport(_) => "transport",
        }
    }
}

/// Delivery channel a handler is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Email,
    Chat,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Chat => "chat",
        }
    }
}

/// A fully rendered email, addressed and ready for the mail transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAlert {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

/// A rendered chat message and the webhook it is bound for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatAlert {
    pub webhook_url: String,
    pub payload: ChatPayload,
}

/// Wire body of the chat webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatPayload {
    pub attachments: Vec<ChatAttachment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatAttachment {
    pub color: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
}

/// Channel-specific payload produced by the renderers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedAlert {
    Email(EmailAlert),
    Chat(ChatAlert),
}

impl RenderedAlert {
    pub fn channel(&self) -> Channel {
        match self {
            Self::Email(_) => Channel::Email,
            Self::Chat(_) => Channel::Chat,
        }
    }
}

/// Trait for notification channel implementations.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a rendered alert through this channel.
    ///
    /// Returns the transport-assigned message identifier when the
    /// transport provides one.
    async fn send(&self, alert: &RenderedAlert) -> Result<Option<String>, NotifyError>;

    /// The channel whose payloads this notifier accepts.
    fn channel(&self) -> Channel;

    /// Human-readable name for this channel (e.g. "email", "chat").
    fn channel_name(&self) -> &str {
        self.channel().as_str()
    }
}

/// Error for a payload handed to a notifier of another channel.
pub(crate) fn channel_mismatch(expected: Channel, alert: &RenderedAlert) -> NotifyError {
    NotifyError::Transport(format!(
        "{} notifier cannot deliver a {} alert",
        expected.as_str(),
        alert.channel().as_str()
    ))
}

/// Result of dispatching one alert.
#[derive(Debug, Clone)]
pub struct DispatchResult {
    pub channel: Channel,
    pub message_id: Option<String>,
    pub error: Option<String>,
    pub duration_ms: u64,
}
