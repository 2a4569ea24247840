//! Security finding intake.
//!
//! This crate provides:
//! - Unwrapping of SNS-delivered EventBridge messages
//! - Classification of findings into the OCSF and classic ASFF shapes
//! - Lenient normalization into a single [`NormalizedFinding`]
//! - The severity gate and the shared severity palette

pub mod envelope;
pub mod gate;
pub mod model;
pub mod normalize;
pub mod severity;

pub use envelope::{unwrap_event, EnvelopeError, FindingMessage};
pub use gate::{evaluate, GateDecision};
pub use model::NormalizedFinding;
pub use normalize::{normalize, FindingVariant};
pub use severity::Severity;
