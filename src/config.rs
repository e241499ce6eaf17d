//! Typed configuration for the generator.
//!
//! Every recognised option is enumerated here with its default, and the
//! whole structure is validated once at construction via
//! [`SkaldConfig::validate`]. Configuration normally arrives from the
//! embedding application as JSON:
//!
//! ```rust
//! # use skald::SkaldConfig;
//! let config: SkaldConfig = serde_json::from_str(r#"{
//!     "gateway_url": "https://gateway.internal",
//!     "providers": [
//!         { "name": "primary", "model": "gpt-4o-mini",
//!           "timeout_ms": 8000, "cost_per_1k_tokens": 0.6 }
//!     ]
//! }"#).unwrap();
//! config.validate().unwrap();
//! ```

use std::time::Duration;

use serde::Deserialize;

use crate::{Result, SkaldError};

/// Top-level generator configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SkaldConfig {
    /// Base URL of the network-boundary endpoint that holds provider
    /// credentials and performs the actual backend call.
    #[serde(default = "default_gateway_url")]
    pub gateway_url: String,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub ab_testing: AbTestingConfig,
    #[serde(default)]
    pub monitoring: MonitoringConfig,
    /// Providers in priority order. The first entry is the primary tier,
    /// the second the fallback tier; further entries are ignored.
    #[serde(default)]
    pub providers: Vec<ProviderConfig>,
}

impl Default for SkaldConfig {
    fn default() -> Self {
        Self {
            gateway_url: default_gateway_url(),
            cache: CacheConfig::default(),
            ab_testing: AbTestingConfig::default(),
            monitoring: MonitoringConfig::default(),
            providers: Vec::new(),
        }
    }
}

fn default_gateway_url() -> String {
    "http://127.0.0.1:9750".to_string()
}

impl SkaldConfig {
    /// Validate the whole configuration.
    ///
    /// Called once by the builder; administrative `update_config` calls
    /// revalidate before swapping.
    pub fn validate(&self) -> Result<()> {
        if self.gateway_url.is_empty() {
            return Err(SkaldError::Configuration("gateway_url must not be empty".into()));
        }
        if self.cache.max_entries == 0 {
            return Err(SkaldError::Configuration(
                "cache.max_entries must be at least 1".into(),
            ));
        }
        if self.ab_testing.llm_percentage > 100 {
            return Err(SkaldError::Configuration(format!(
                "ab_testing.llm_percentage must be 0-100, got {}",
                self.ab_testing.llm_percentage
            )));
        }
        let thresholds = &self.monitoring.alert_thresholds;
        if !(0.0..=1.0).contains(&thresholds.error_rate) {
            return Err(SkaldError::Configuration(format!(
                "monitoring.alert_thresholds.error_rate must be 0.0-1.0, got {}",
                thresholds.error_rate
            )));
        }
        for provider in &self.providers {
            if provider.name.is_empty() {
                return Err(SkaldError::Configuration("provider name must not be empty".into()));
            }
            if provider.timeout_ms == 0 {
                return Err(SkaldError::Configuration(format!(
                    "provider '{}' timeout_ms must be nonzero",
                    provider.name
                )));
            }
            if provider.cost_per_1k_tokens < 0.0 {
                return Err(SkaldError::Configuration(format!(
                    "provider '{}' cost_per_1k_tokens must not be negative",
                    provider.name
                )));
            }
        }
        Ok(())
    }
}

/// Cache behaviour.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// When false, cache reads and writes are no-ops.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Time-to-live for entries, in seconds (default: 1 hour).
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,
    /// Maximum number of stored entries (default: 100). The
    /// oldest-inserted entry is evicted first when full.
    #[serde(default = "default_cache_max_entries")]
    pub max_entries: usize,
    /// Interval between background sweeps of expired entries, in seconds
    /// (default: 60).
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: default_cache_ttl_secs(),
            max_entries: default_cache_max_entries(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

impl CacheConfig {
    /// Entry time-to-live as a `Duration`.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// Sweep interval as a `Duration`.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

fn default_true() -> bool {
    true
}

fn default_cache_ttl_secs() -> u64 {
    3600
}

fn default_cache_max_entries() -> usize {
    100
}

fn default_sweep_interval_secs() -> u64 {
    60
}

/// A/B routing between the provider tiers and the template tier.
#[derive(Debug, Clone, Deserialize)]
pub struct AbTestingConfig {
    /// When false, every request is eligible for the provider tiers.
    #[serde(default)]
    pub enabled: bool,
    /// Percentage of requests routed to the provider tiers (0-100).
    /// 0 sends everything straight to the template tier.
    #[serde(default = "default_llm_percentage")]
    pub llm_percentage: u8,
}

impl Default for AbTestingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            llm_percentage: default_llm_percentage(),
        }
    }
}

fn default_llm_percentage() -> u8 {
    100
}

/// Monitoring and alerting behaviour.
#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    /// When false, the periodic alert check task is not spawned.
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub alert_thresholds: AlertThresholds,
    /// Interval between periodic alert checks, in seconds (default: 30).
    #[serde(default = "default_alert_interval_secs")]
    pub alert_interval_secs: u64,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            alert_thresholds: AlertThresholds::default(),
            alert_interval_secs: default_alert_interval_secs(),
        }
    }
}

impl MonitoringConfig {
    /// Alert check interval as a `Duration`.
    pub fn alert_interval(&self) -> Duration {
        Duration::from_secs(self.alert_interval_secs)
    }
}

fn default_alert_interval_secs() -> u64 {
    30
}

/// Limits that trigger a logged alert when exceeded.
#[derive(Debug, Clone, Deserialize)]
pub struct AlertThresholds {
    /// Error rate (errors / requests), 0.0-1.0 (default: 0.1).
    #[serde(default = "default_error_rate")]
    pub error_rate: f64,
    /// Average end-to-end latency, in milliseconds (default: 5000).
    #[serde(default = "default_latency_ms")]
    pub latency_ms: u64,
    /// Cumulative provider cost, in dollars (default: 10.0).
    #[serde(default = "default_cost")]
    pub cost: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            error_rate: default_error_rate(),
            latency_ms: default_latency_ms(),
            cost: default_cost(),
        }
    }
}

impl AlertThresholds {
    /// Latency threshold as a `Duration`.
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}

fn default_error_rate() -> f64 {
    0.1
}

fn default_latency_ms() -> u64 {
    5000
}

fn default_cost() -> f64 {
    10.0
}

/// One external generation backend, reached through the gateway.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// Provider name forwarded to the gateway (e.g. "openai").
    pub name: String,
    /// Model id forwarded to the gateway.
    pub model: String,
    /// Per-call timeout in milliseconds (default: 10000). The call is
    /// aborted when it expires; there is no internal retry.
    #[serde(default = "default_provider_timeout_ms")]
    pub timeout_ms: u64,
    /// Price per 1000 tokens in dollars. Zero-priced providers always
    /// report zero cost.
    #[serde(default)]
    pub cost_per_1k_tokens: f64,
}

impl ProviderConfig {
    /// Per-call timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Approximate the cost of a generated text.
    ///
    /// Token count is estimated at four characters per token, priced at
    /// `cost_per_1k_tokens`.
    pub fn estimate_cost(&self, text: &str) -> f64 {
        if self.cost_per_1k_tokens == 0.0 {
            return 0.0;
        }
        let tokens = text.len() as f64 / 4.0;
        tokens / 1000.0 * self.cost_per_1k_tokens
    }
}

fn default_provider_timeout_ms() -> u64 {
    10_000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        SkaldConfig::default().validate().unwrap();
    }

    #[test]
    fn rejects_out_of_range_llm_percentage() {
        let mut config = SkaldConfig::default();
        config.ab_testing.llm_percentage = 101;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_cache_capacity() {
        let mut config = SkaldConfig::default();
        config.cache.max_entries = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_provider_timeout() {
        let mut config = SkaldConfig::default();
        config.providers.push(ProviderConfig {
            name: "primary".into(),
            model: "m".into(),
            timeout_ms: 0,
            cost_per_1k_tokens: 0.0,
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn estimate_cost_zero_priced_provider() {
        let provider = ProviderConfig {
            name: "free".into(),
            model: "m".into(),
            timeout_ms: 1000,
            cost_per_1k_tokens: 0.0,
        };
        assert_eq!(provider.estimate_cost("some long generated text"), 0.0);
    }

    #[test]
    fn estimate_cost_scales_with_length() {
        let provider = ProviderConfig {
            name: "paid".into(),
            model: "m".into(),
            timeout_ms: 1000,
            cost_per_1k_tokens: 1.0,
        };
        // 4000 chars ≈ 1000 tokens ≈ $1.00
        let text = "x".repeat(4000);
        let cost = provider.estimate_cost(&text);
        assert!((cost - 1.0).abs() < 1e-9);
    }

    #[test]
    fn parses_minimal_json_with_defaults() {
        let config: SkaldConfig = serde_json::from_str(
            r#"{ "providers": [ { "name": "primary", "model": "gpt-4o-mini" } ] }"#,
        )
        .unwrap();
        config.validate().unwrap();
        assert!(config.cache.enabled);
        assert_eq!(config.cache.ttl_secs, 3600);
        assert_eq!(config.ab_testing.llm_percentage, 100);
        assert_eq!(config.providers[0].timeout_ms, 10_000);
    }
}
