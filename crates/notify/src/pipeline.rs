//! One invocation of an alert handler, from raw event to structured result.
//!
//! Flow: unwrap the SNS envelope, normalize the first finding, apply the
//! severity gate, render for the handler's channel and dispatch. Every
//! failure is converted into an [`InvocationResult`] at [`AlertPipeline::handle`];
//! nothing propagates past it.

use std::sync::Arc;

use hubwatch_core::{AlertConfig, RAW_EVENT_TARGET};
use hubwatch_findings::{
    evaluate, normalize, unwrap_event, EnvelopeError, GateDecision, NormalizedFinding, Severity,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dispatcher::Dispatcher;
use crate::email::render_email;
use crate::templating::TemplateRenderer;
use crate::traits::{Channel, NotifyError, RenderedAlert};
use crate::webhook::render_chat;

/// Caller-visible result of an invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum InvocationResult {
    Ok,
    Suppressed { severity: String },
    Error { error: String },
}

/// Failures before dispatch.
#[derive(Debug, thiserror::Error)]
pub enum AlertError {
    #[error(transparent)]
    Envelope(#[from] EnvelopeError),

    #[error(transparent)]
    Notify(#[from] NotifyError),
}

/// What the pre-dispatch stages decided.
enum Prepared {
    Suppressed { severity: String },
    Ready(RenderedAlert),
}

/// The alert handler for one channel.
///
/// Built once per process; all per-invocation data stays local to
/// [`AlertPipeline::handle`].
pub struct AlertPipeline {
    config: Arc<AlertConfig>,
    templates: TemplateRenderer,
    dispatcher: Dispatcher,
}

impl AlertPipeline {
    pub fn new(config: Arc<AlertConfig>, dispatcher: Dispatcher) -> Result<Self, NotifyError> {
        Ok(Self {
            config,
            templates: TemplateRenderer::new()?,
            dispatcher,
        })
    }

    pub fn channel(&self) -> Channel {
        self.dispatcher.channel()
    }

    /// Render a gated finding for this pipeline's channel.
    pub fn render(
        &self,
        finding: &NormalizedFinding,
        severity: Severity,
    ) -> Result<RenderedAlert, NotifyError> {
        match self.channel() {
            Channel::Email => render_email(&self.config, &self.templates, finding, severity)
                .map(RenderedAlert::Email),
            Channel::Chat => render_chat(&self.config, &self.templates, finding, severity)
                .map(RenderedAlert::Chat),
        }
    }

    /// Process one inbound event.
    pub async fn handle(&self, raw: &Value) -> InvocationResult {
        tracing::info!(target: RAW_EVENT_TARGET, event = %raw, "received event");

        let alert = match self.prepare(raw) {
            Ok(Prepared::Ready(alert)) => alert,
            Ok(Prepared::Suppressed { severity }) => {
                return InvocationResult::Suppressed { severity };
            }
            Err(e) => {
                tracing::error!(
                    channel = self.channel().as_str(),
                    error = %e,
                    "alert preparation failed"
                );
                return InvocationResult::Error { error: e.to_string() };
            }
        };

        let result = self.dispatcher.dispatch(&alert).await;
        if let Some(error) = result.error {
            return InvocationResult::Error { error };
        }

        tracing::info!(
            channel = result.channel.as_str(),
            message_id = result.message_id.as_deref().unwrap_or("none"),
            duration_ms = result.duration_ms,
            "alert sent"
        );
        InvocationResult::Ok
    }

    fn prepare(&self, raw: &Value) -> Result<Prepared, AlertError> {
        let message = unwrap_event(raw)?;
        let finding = normalize(&message);

        let severity = match evaluate(&finding.severity) {
            GateDecision::Proceed(severity) => severity,
            GateDecision::Suppressed { severity } => {
                tracing::info!(
                    severity = %severity,
                    title = %finding.title,
                    "suppressed finding below alert threshold"
                );
                return Ok(Prepared::Suppressed { severity });
            }
        };

        tracing::info!(
            channel = self.channel().as_str(),
            severity = %severity,
            title = %finding.title,
            resource = %finding.resource,
            "sending alert"
        );
        Ok(Prepared::Ready(self.render(&finding, severity)?))
    }
}
