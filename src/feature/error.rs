//! Feature library error types.

use thiserror::Error;

/// Errors returned by Feature library calls.
///
/// Input errors (`EmptySequence`, `NegativeSqrt`, `InvalidRange`,
/// `InvalidArguments`, `InvalidUrl`) are the caller's fault and are never
/// retried or coerced. `Http` covers network transients and `Client` a
/// failure to build the HTTP client.
#[derive(Debug, Clone, Error)]
pub enum FeatureError {
    #[error("Cannot compute {op} of an empty sequence")]
    EmptySequence { op: &'static str },

    #[error("Cannot calculate square root of negative number {0}")]
    NegativeSqrt(f64),

    #[error("Invalid range: {lo} > {hi}")]
    InvalidRange { lo: i64, hi: i64 },

    #[error("Invalid arguments for {op}: {reason}")]
    InvalidArguments { op: String, reason: String },

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Failed to create HTTP client: {0}")]
    Client(String),
}

impl FeatureError {
    /// Whether the error stems from invalid caller input rather than the environment.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            FeatureError::EmptySequence { .. }
                | FeatureError::NegativeSqrt(_)
                | FeatureError::InvalidRange { .. }
                | FeatureError::InvalidArguments { .. }
                | FeatureError::InvalidUrl { .. }
        )
    }
}

pub type FeatureResult<T> = Result<T, FeatureError>;
