//! Telemetry metric name constants.
//!
//! Centralised metric names for skald operations. Consumers install their
//! own `metrics` recorder (e.g. prometheus, statsd); without a recorder
//! installed, all metric calls are no-ops. The same numbers also feed the
//! in-process [`MetricsTracker`](crate::metrics::MetricsTracker) that backs
//! `metrics_summary()`.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `skald_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `provider` — provider name (e.g. "primary-gpt", "fallback-haiku")
//! - `source` — tier that produced a result: "cache", "primary",
//!   "fallback", "template", "emergency"
//! - `status` — outcome: "ok" or "error"

/// Total generation requests served, regardless of tier.
///
/// Labels: `source`.
pub const REQUESTS_TOTAL: &str = "skald_requests_total";

/// End-to-end generation duration in seconds.
///
/// Labels: `source`.
pub const REQUEST_DURATION_SECONDS: &str = "skald_request_duration_seconds";

/// Total provider call outcomes.
///
/// Labels: `provider`, `status` ("ok" | "error").
pub const PROVIDER_CALLS_TOTAL: &str = "skald_provider_calls_total";

/// Total cache hits.
pub const CACHE_HITS_TOTAL: &str = "skald_cache_hits_total";

/// Total cache misses (including expired-but-present entries).
pub const CACHE_MISSES_TOTAL: &str = "skald_cache_misses_total";

/// Total entries evicted to honour the size bound.
pub const CACHE_EVICTIONS_TOTAL: &str = "skald_cache_evictions_total";

/// Estimated provider cost in dollars per request.
///
/// Labels: `provider`.
pub const COST_DOLLARS: &str = "skald_cost_dollars";

/// Total times the emergency tier was reached. Any nonzero value
/// indicates a defect in the template tier.
pub const EMERGENCY_TOTAL: &str = "skald_emergency_total";
