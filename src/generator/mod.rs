//! The fallback-chain orchestrator.
//!
//! [`HybridGenerator`] composes the cache, the provider client, the
//! template engine, and the metrics tracker into a strictly ordered state
//! machine that short-circuits on first success:
//!
//! ```text
//! CACHE_LOOKUP → AB_DECISION → PRIMARY → FALLBACK → TEMPLATE → EMERGENCY
//! ```
//!
//! [`HybridGenerator::generate`] is infallible: every internal fault is
//! caught at its tier and converted into a fall-through, so the caller
//! always receives a well-formed [`GenerationResult`]. Degraded quality is
//! observable only via the `source` field.
//!
//! Instances are built via [`Skald::builder()`], which validates the
//! configuration once and spawns the cache-sweep and alert-check tasks.
//! Construction must happen inside a tokio runtime.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use tokio::task::JoinHandle;
use tracing::{debug, instrument};

use crate::cache::{CacheStats, ReviewCache};
use crate::config::{ProviderConfig, SkaldConfig};
use crate::metrics::{MetricsSummary, MetricsTracker};
use crate::providers::{GatewayClient, emergency_fallback};
use crate::random::{RandomSource, ThreadRngSource};
use crate::telemetry;
use crate::template::{TemplateEngine, TemplateGenerator};
use crate::Result;
use crate::types::{GenerationRequest, GenerationResult, Source};

/// Main entry point for creating generator instances.
pub struct Skald;

impl Skald {
    /// Create a new builder for configuring the generator.
    pub fn builder() -> SkaldBuilder {
        SkaldBuilder::new()
    }
}

/// Builder for configuring [`HybridGenerator`] instances.
pub struct SkaldBuilder {
    config: SkaldConfig,
    random: Option<Arc<dyn RandomSource>>,
    templates: Option<Arc<dyn TemplateEngine>>,
}

impl SkaldBuilder {
    pub fn new() -> Self {
        Self {
            config: SkaldConfig::default(),
            random: None,
            templates: None,
        }
    }

    /// Use the given configuration (replaces any previous settings).
    pub fn config(mut self, config: SkaldConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the network-boundary gateway URL.
    pub fn gateway_url(mut self, url: impl Into<String>) -> Self {
        self.config.gateway_url = url.into();
        self
    }

    /// Append a provider to the priority chain. The first provider is the
    /// primary tier, the second the fallback tier.
    pub fn provider(mut self, provider: ProviderConfig) -> Self {
        self.config.providers.push(provider);
        self
    }

    /// Inject a random source (tests supply a deterministic one).
    pub fn random_source(mut self, random: Arc<dyn RandomSource>) -> Self {
        self.random = Some(random);
        self
    }

    /// Inject a template engine (tests supply a failing one to exercise
    /// the emergency tier).
    pub fn template_engine(mut self, templates: Arc<dyn TemplateEngine>) -> Self {
        self.templates = Some(templates);
        self
    }

    /// Validate the configuration and build the generator.
    ///
    /// Spawns the cache-sweep and alert-check tasks, so this must be
    /// called within a tokio runtime.
    pub fn build(self) -> Result<HybridGenerator> {
        self.config.validate()?;

        let random = self.random.unwrap_or_else(|| Arc::new(ThreadRngSource));
        let templates = self
            .templates
            .unwrap_or_else(|| Arc::new(TemplateGenerator::new(random.clone())));
        let cache = Arc::new(ReviewCache::new(&self.config.cache));
        let metrics = Arc::new(MetricsTracker::new(
            self.config.monitoring.alert_thresholds.clone(),
        ));

        let mut tasks = Vec::new();
        if self.config.cache.enabled {
            let cache = cache.clone();
            let interval = self.config.cache.sweep_interval();
            tasks.push(tokio::spawn(async move {
                let mut ticker = tokio::time::interval(interval);
                ticker.tick().await; // immediate first tick
                loop {
                    ticker.tick().await;
                    let removed = cache.sweep();
                    if removed > 0 {
                        debug!(removed, "cache sweep purged expired entries");
                    }
                }
            }));
        }
        if self.config.monitoring.enabled {
            let metrics = metrics.clone();
            let interval = self.config.monitoring.alert_interval();
            tasks.push(tokio::spawn(async move {
                let mut ticker = tokio::time::interval(interval);
                ticker.tick().await;
                loop {
                    ticker.tick().await;
                    metrics.check_alert_thresholds();
                }
            }));
        }

        Ok(HybridGenerator {
            client: RwLock::new(GatewayClient::new(&self.config.gateway_url)),
            config: RwLock::new(self.config),
            cache,
            metrics,
            availability: RwLock::new(HashMap::new()),
            templates,
            random,
            tasks: Mutex::new(tasks),
        })
    }
}

impl Default for SkaldBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The orchestrator: cache, A/B routing, provider tiers, templates, and
/// the emergency literal behind one infallible `generate` operation.
pub struct HybridGenerator {
    config: RwLock<SkaldConfig>,
    client: RwLock<GatewayClient>,
    cache: Arc<ReviewCache>,
    metrics: Arc<MetricsTracker>,
    // Probed availability per provider name. Absent = never probed =
    // assumed available.
    availability: RwLock<HashMap<String, bool>>,
    templates: Arc<dyn TemplateEngine>,
    random: Arc<dyn RandomSource>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl HybridGenerator {
    /// Generate review text for a request.
    ///
    /// Never fails: tries cache, the provider tiers, templates, and
    /// finally the emergency literal, returning whichever succeeds first.
    #[instrument(skip_all, fields(subject = %request.subject_name, rating = request.rating))]
    pub async fn generate(&self, request: &GenerationRequest) -> GenerationResult {
        let start = Instant::now();
        let request_id = self.next_request_id();

        let (text, source, cost, cached) = self.run_tiers(request, &request_id).await;

        let latency = start.elapsed();
        self.metrics.record_request(latency);
        metrics::counter!(telemetry::REQUESTS_TOTAL, "source" => source.as_str()).increment(1);
        metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS, "source" => source.as_str())
            .record(latency.as_secs_f64());
        self.metrics.check_alert_thresholds();

        debug!(request_id, source = %source, latency_ms = latency.as_millis() as u64, "generated");
        GenerationResult {
            text,
            source,
            latency,
            cost,
            request_id,
            timestamp: SystemTime::now(),
            cached,
        }
    }

    /// Walk the tiers in order; first success wins.
    async fn run_tiers(
        &self,
        request: &GenerationRequest,
        request_id: &str,
    ) -> (String, Source, f64, bool) {
        // CACHE_LOOKUP
        if let Some(text) = self.cache.get(request) {
            debug!(request_id, "cache hit");
            return (text, Source::Cache, 0.0, true);
        }

        // AB_DECISION — snapshot config before awaiting anything.
        let (use_llm, providers, client) = {
            let config = self.config.read().unwrap();
            let use_llm = if config.ab_testing.enabled {
                self.random.percent() < f64::from(config.ab_testing.llm_percentage)
            } else {
                true
            };
            let providers: Vec<ProviderConfig> =
                config.providers.iter().take(2).cloned().collect();
            (use_llm, providers, self.client.read().unwrap().clone())
        };

        if use_llm {
            // PRIMARY, then FALLBACK: identical pattern, strict order.
            for (index, provider) in providers.iter().enumerate() {
                let source = if index == 0 {
                    Source::Primary
                } else {
                    Source::Fallback
                };
                if !self.is_available(&provider.name) {
                    debug!(request_id, provider = %provider.name, "skipping unavailable provider");
                    continue;
                }
                match client.complete(provider, request).await {
                    Ok(text) => {
                        self.cache.insert(request, text.clone());
                        let cost = provider.estimate_cost(&text);
                        self.metrics.track_cost(&provider.name, cost);
                        self.metrics
                            .record_counter(&format!("provider.{}.success", provider.name));
                        metrics::counter!(telemetry::PROVIDER_CALLS_TOTAL,
                            "provider" => provider.name.clone(),
                            "status" => "ok",
                        )
                        .increment(1);
                        return (text, source, cost, false);
                    }
                    Err(e) => {
                        self.metrics
                            .record_counter(&format!("provider.{}.failure", provider.name));
                        metrics::counter!(telemetry::PROVIDER_CALLS_TOTAL,
                            "provider" => provider.name.clone(),
                            "status" => "error",
                        )
                        .increment(1);
                        self.metrics.log_error(source.as_str(), &e, request_id);
                    }
                }
            }
        } else {
            debug!(request_id, "a/b decision routed to template tier");
        }

        // TEMPLATE, with EMERGENCY as the only escape hatch.
        match self.templates.render(request) {
            Ok(text) => (text, Source::Template, 0.0, false),
            Err(e) => {
                self.metrics.log_exhaustion(&e, request_id);
                (emergency_fallback(request), Source::Emergency, 0.0, false)
            }
        }
    }

    /// Probe every configured provider once and cache the results until
    /// the next explicit refresh. Failures mark a provider unavailable;
    /// this operation itself never errors.
    pub async fn refresh_availability(&self) {
        let (providers, client) = {
            let config = self.config.read().unwrap();
            (
                config.providers.clone(),
                self.client.read().unwrap().clone(),
            )
        };
        let mut probed = HashMap::new();
        for provider in &providers {
            let available = client.probe(provider).await;
            debug!(provider = %provider.name, available, "availability probe");
            probed.insert(provider.name.clone(), available);
        }
        *self.availability.write().unwrap() = probed;
    }

    /// Current availability per configured provider. Providers that have
    /// never been probed report as available.
    pub fn availability(&self) -> HashMap<String, bool> {
        let config = self.config.read().unwrap();
        let probed = self.availability.read().unwrap();
        config
            .providers
            .iter()
            .map(|p| {
                let available = probed.get(&p.name).copied().unwrap_or(true);
                (p.name.clone(), available)
            })
            .collect()
    }

    /// Current metrics snapshot.
    pub fn metrics_summary(&self) -> MetricsSummary {
        self.metrics.summary()
    }

    /// Current cache statistics.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Remove all cached entries.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Validate and apply a new configuration.
    ///
    /// The cache is reconfigured in place (the sweep task keeps running),
    /// alert thresholds are swapped, and the gateway client is rebuilt if
    /// the URL changed. Probed availability is kept; provider entries no
    /// longer configured simply stop being consulted.
    pub fn update_config(&self, new: SkaldConfig) -> Result<()> {
        new.validate()?;
        self.cache.reconfigure(&new.cache);
        self.metrics
            .set_thresholds(new.monitoring.alert_thresholds.clone());
        {
            let current = self.config.read().unwrap();
            if current.gateway_url != new.gateway_url {
                *self.client.write().unwrap() = GatewayClient::new(&new.gateway_url);
            }
        }
        *self.config.write().unwrap() = new;
        Ok(())
    }

    /// Stop the background sweep and alert tasks and release cache and
    /// metrics state.
    ///
    /// The instance must not be reused afterward; subsequent calls still
    /// answer (the template tier needs no background tasks) but expired
    /// cache entries are no longer swept.
    pub fn shutdown(&self) {
        for task in self.tasks.lock().unwrap().drain(..) {
            task.abort();
        }
        self.cache.clear();
        self.metrics.reset();
    }

    fn is_available(&self, provider: &str) -> bool {
        self.availability
            .read()
            .unwrap()
            .get(provider)
            .copied()
            .unwrap_or(true)
    }

    /// Epoch millis plus a short random suffix. Uniqueness is
    /// probabilistic; ids exist for log correlation only.
    fn next_request_id(&self) -> String {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        format!("{}-{}", millis, self.random.suffix())
    }
}

impl Drop for HybridGenerator {
    fn drop(&mut self) {
        for task in self.tasks.lock().unwrap().drain(..) {
            task.abort();
        }
    }
}
