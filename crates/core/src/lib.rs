//! Shared configuration and logging setup for the hubwatch binaries.

pub mod config;
pub mod telemetry;

pub use config::{load_dotenv, AlertConfig, SmtpConfig};
pub use telemetry::{init_tracing, RAW_EVENT_TARGET};
