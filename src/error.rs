//! Skald error types

use std::time::Duration;

/// Skald error types.
///
/// These never cross the [`generate`](crate::HybridGenerator::generate)
/// boundary: every tier catches its own failures and falls through to the
/// next tier. They surface only from administrative operations
/// (configuration validation) and in logs.
#[derive(Debug, thiserror::Error)]
pub enum SkaldError {
    // Provider/network errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Provider call exceeded its configured timeout and was aborted.
    #[error("provider call timed out after {limit:?}")]
    Timeout { limit: Duration },

    #[error("empty response from provider")]
    EmptyResponse,

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The template tier failed. Reaching this indicates a defect rather
    /// than an expected degradation; the orchestrator raises a loud alert
    /// and serves the emergency text.
    #[error("template rendering failed: {0}")]
    Template(String),
}

impl SkaldError {
    /// Whether this error came from a provider call (timeout, transport,
    /// or non-success response). Provider errors are all handled the same
    /// way by the orchestrator: fall through to the next tier.
    pub fn is_provider_failure(&self) -> bool {
        matches!(
            self,
            SkaldError::Http(_)
                | SkaldError::Api { .. }
                | SkaldError::Timeout { .. }
                | SkaldError::EmptyResponse
        )
    }
}

/// Result type alias for skald operations
pub type Result<T> = std::result::Result<T, SkaldError>;
