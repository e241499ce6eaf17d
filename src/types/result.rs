//! Generation result types.

use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

/// Which tier produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Cache,
    Primary,
    Fallback,
    Template,
    Emergency,
}

impl Source {
    /// Stable label used for metrics and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Cache => "cache",
            Source::Primary => "primary",
            Source::Fallback => "fallback",
            Source::Template => "template",
            Source::Emergency => "emergency",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The outcome of a [`generate`](crate::HybridGenerator::generate) call.
///
/// Always well-formed: degraded quality is observable only via `source`,
/// letting the caller decide whether to disclose it.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    /// The generated review text.
    pub text: String,
    /// Tier that produced the text.
    pub source: Source,
    /// End-to-end latency of the call.
    pub latency: Duration,
    /// Estimated provider cost in dollars; zero for non-metered tiers.
    pub cost: f64,
    /// Correlation id (epoch millis + short random suffix; probabilistic
    /// uniqueness only).
    pub request_id: String,
    /// Wall-clock time the result was produced.
    pub timestamp: SystemTime,
    /// Whether the text came from the cache.
    pub cached: bool,
}
