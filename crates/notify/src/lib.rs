//! Alert rendering and delivery for normalized security findings.
//!
//! This crate provides:
//! - `Notifier` trait for pluggable delivery channels
//! - SMTP email and chat webhook notifier implementations
//! - Minijinja templates for the email and chat bodies
//! - `AlertPipeline`, the invocation boundary used by the Lambda binaries

pub mod dispatcher;
pub mod email;
pub mod lambda;
pub mod pipeline;
pub mod templating;
pub mod traits;
pub mod webhook;

pub use dispatcher::Dispatcher;
pub use email::SmtpMailer;
pub use pipeline::{AlertPipeline, InvocationResult};
pub use traits::{Channel, Notifier, NotifyError, RenderedAlert};
pub use webhook::ChatWebhook;
