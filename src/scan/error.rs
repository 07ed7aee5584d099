//! Scanner error types.
//!
//! Only caller mistakes surface here. Refused connections, timeouts, DNS
//! failures and HTTP errors are folded into scan results instead.

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ScanError {
    #[error("Invalid host '{host}': {reason}")]
    InvalidHost { host: String, reason: String },

    #[error("Invalid port {0}: must be in 1..=65535")]
    InvalidPort(u16),

    #[error("Invalid port range {start}-{end}")]
    InvalidPortRange { start: u16, end: u16 },

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Unknown severity '{0}'")]
    InvalidSeverity(String),

    #[error("Check '{id}' has an invalid pattern: {reason}")]
    InvalidPattern { id: &'static str, reason: String },

    #[error("Failed to create HTTP client: {0}")]
    Client(String),
}

pub type ScanResult<T> = Result<T, ScanError>;
