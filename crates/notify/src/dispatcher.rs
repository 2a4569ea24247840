//! Hands rendered alerts to the handler's notifier.
//!
//! Each alert is submitted exactly once. Failures are reported in the
//! [`DispatchResult`] rather than retried; redelivery is left to the
//! event source.

use crate::traits::{Channel, DispatchResult, Notifier, RenderedAlert};

/// Delivers alerts through a single configured channel.
pub struct Dispatcher {
    notifier: Box<dyn Notifier>,
}

impl Dispatcher {
    pub fn new(notifier: Box<dyn Notifier>) -> Self {
        Self { notifier }
    }

    /// Channel of the underlying notifier.
    pub fn channel(&self) -> Channel {
        self.notifier.channel()
    }

    /// Submit an alert and report the outcome.
    pub async fn dispatch(&self, alert: &RenderedAlert) -> DispatchResult {
        let channel = self.notifier.channel_name();
        let start = std::time::Instant::now();
        let result = self.notifier.send(alert).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        let (message_id, error) = match result {
            Ok(message_id) => {
                tracing::info!(channel, duration_ms, "Notification delivered");
                (message_id, None)
            }
            Err(e) => {
                tracing::warn!(
                    channel,
                    kind = e.kind(),
                    error = %e,
                    duration_ms,
                    "Notification delivery failed"
                );
                (None, Some(e.to_string()))
            }
        };

        DispatchResult {
            channel: self.notifier.channel(),
            message_id,
            error,
            duration_ms,
        }
    }
}
