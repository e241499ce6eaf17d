//! In-process metrics and alerting.
//!
//! [`MetricsTracker`] holds the process-lifetime state behind
//! `metrics_summary()`: named counters, a running mean latency, and
//! cumulative cost. Every update is mirrored to the `metrics` facade (see
//! [`telemetry`](crate::telemetry)) so an installed recorder sees the same
//! numbers. State lives until [`MetricsTracker::reset`] or process restart.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use tracing::{error, warn};

use crate::SkaldError;
use crate::config::AlertThresholds;
use crate::telemetry;

/// A threshold that was exceeded during an alert check.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// Error rate (errors / requests) above the configured limit.
    ErrorRate { actual: f64, limit: f64 },
    /// Running mean latency above the configured limit.
    Latency { actual: Duration, limit: Duration },
    /// Cumulative provider cost above the configured limit.
    Cost { actual: f64, limit: f64 },
}

/// Point-in-time metrics snapshot.
#[derive(Debug, Clone)]
pub struct MetricsSummary {
    /// Completed generation requests.
    pub requests: u64,
    /// Errors logged via [`MetricsTracker::log_error`].
    pub errors: u64,
    /// errors / requests; zero when no requests completed.
    pub error_rate: f64,
    /// Running mean end-to-end latency.
    pub avg_latency: Duration,
    /// Cumulative estimated provider cost in dollars.
    pub total_cost: f64,
    /// Named event counters (cache hits, per-provider failures, ...).
    pub counters: HashMap<String, u64>,
}

struct MetricsInner {
    requests: u64,
    errors: u64,
    // Running mean in milliseconds: new = (old * (n-1) + sample) / n.
    avg_latency_ms: f64,
    total_cost: f64,
    counters: HashMap<String, u64>,
    thresholds: AlertThresholds,
}

/// Counters, running-average latency, cost accumulation, and
/// alert-threshold checks.
pub struct MetricsTracker {
    inner: Mutex<MetricsInner>,
}

impl MetricsTracker {
    pub fn new(thresholds: AlertThresholds) -> Self {
        Self {
            inner: Mutex::new(MetricsInner {
                requests: 0,
                errors: 0,
                avg_latency_ms: 0.0,
                total_cost: 0.0,
                counters: HashMap::new(),
                thresholds,
            }),
        }
    }

    /// Increment a named counter by one.
    pub fn record_counter(&self, name: &str) {
        let mut inner = self.inner.lock().unwrap();
        *inner.counters.entry(name.to_string()).or_insert(0) += 1;
    }

    /// Record one completed request's end-to-end latency.
    ///
    /// Updates the running mean once per request regardless of which tier
    /// produced the result.
    pub fn record_request(&self, latency: Duration) {
        let mut inner = self.inner.lock().unwrap();
        inner.requests += 1;
        let n = inner.requests as f64;
        let sample = latency.as_secs_f64() * 1000.0;
        inner.avg_latency_ms = (inner.avg_latency_ms * (n - 1.0) + sample) / n;
    }

    /// Accumulate estimated provider cost.
    pub fn track_cost(&self, provider: &str, cost: f64) {
        if cost == 0.0 {
            return;
        }
        let mut inner = self.inner.lock().unwrap();
        inner.total_cost += cost;
        metrics::histogram!(telemetry::COST_DOLLARS, "provider" => provider.to_owned())
            .record(cost);
    }

    /// Log a tier failure with request context and count it.
    pub fn log_error(&self, context: &str, err: &SkaldError, request_id: &str) {
        warn!(context, request_id, error = %err, "tier failed, falling through");
        let mut inner = self.inner.lock().unwrap();
        inner.errors += 1;
    }

    /// Log the exhaustion fault: the template tier itself failed.
    ///
    /// Reaching this indicates a defect rather than an expected
    /// degradation, so it is logged loudly and counted separately.
    pub fn log_exhaustion(&self, err: &SkaldError, request_id: &str) {
        error!(request_id, error = %err, "template tier failed; serving emergency text");
        metrics::counter!(telemetry::EMERGENCY_TOTAL).increment(1);
        let mut inner = self.inner.lock().unwrap();
        inner.errors += 1;
    }

    /// Zero all accumulated state, keeping the alert thresholds.
    pub fn reset(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.requests = 0;
        inner.errors = 0;
        inner.avg_latency_ms = 0.0;
        inner.total_cost = 0.0;
        inner.counters.clear();
    }

    /// Replace the alert thresholds (administrative config update).
    pub fn set_thresholds(&self, thresholds: AlertThresholds) {
        self.inner.lock().unwrap().thresholds = thresholds;
    }

    /// Compare current state against the configured limits.
    ///
    /// Each exceeded limit is logged at warn level and returned; the
    /// pipeline is never halted.
    pub fn check_alert_thresholds(&self) -> Vec<Alert> {
        let inner = self.inner.lock().unwrap();
        let mut alerts = Vec::new();

        if inner.requests > 0 {
            let error_rate = inner.errors as f64 / inner.requests as f64;
            if error_rate > inner.thresholds.error_rate {
                alerts.push(Alert::ErrorRate {
                    actual: error_rate,
                    limit: inner.thresholds.error_rate,
                });
            }
        }
        let avg_latency = Duration::from_secs_f64(inner.avg_latency_ms / 1000.0);
        if avg_latency > inner.thresholds.latency() {
            alerts.push(Alert::Latency {
                actual: avg_latency,
                limit: inner.thresholds.latency(),
            });
        }
        if inner.total_cost > inner.thresholds.cost {
            alerts.push(Alert::Cost {
                actual: inner.total_cost,
                limit: inner.thresholds.cost,
            });
        }
        drop(inner);

        for alert in &alerts {
            warn!(?alert, "alert threshold exceeded");
        }
        alerts
    }

    /// Current metrics snapshot.
    pub fn summary(&self) -> MetricsSummary {
        let inner = self.inner.lock().unwrap();
        MetricsSummary {
            requests: inner.requests,
            errors: inner.errors,
            error_rate: if inner.requests > 0 {
                inner.errors as f64 / inner.requests as f64
            } else {
                0.0
            },
            avg_latency: Duration::from_secs_f64(inner.avg_latency_ms / 1000.0),
            total_cost: inner.total_cost,
            counters: inner.counters.clone(),
        }
    }
}
