//! Skald - resilient multi-tier review text generator
//!
//! This crate produces hotel review text from a structured request by
//! trying, in strict priority order: a cache lookup, an optional A/B
//! routing decision, a primary external generation backend, a secondary
//! backend, a deterministic template generator, and finally a synthetic
//! emergency string. The caller always receives a well-formed result —
//! [`HybridGenerator::generate`] cannot fail.
//!
//! External backends are reached through a single network-boundary gateway
//! that holds provider credentials; this crate knows only its URL and each
//! provider's timeout/cost metadata.
//!
//! # Example
//!
//! ```rust,no_run
//! use skald::{GenerationRequest, Skald, TripType};
//!
//! #[tokio::main]
//! async fn main() -> skald::Result<()> {
//!     let generator = Skald::builder()
//!         .gateway_url("https://gateway.internal")
//!         .build()?;
//!
//!     let request = GenerationRequest::new("Grand Hotel", 5, TripType::Leisure)?
//!         .highlights(["pool", "breakfast"])
//!         .stay_length(3);
//!
//!     let result = generator.generate(&request).await;
//!     println!("[{}] {}", result.source, result.text);
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod generator;
pub mod metrics;
pub mod providers;
pub mod random;
pub mod telemetry;
pub mod template;
pub mod types;

// Re-export main types at crate root
pub use cache::CacheStats;
pub use config::{
    AbTestingConfig, AlertThresholds, CacheConfig, MonitoringConfig, ProviderConfig, SkaldConfig,
};
pub use error::{Result, SkaldError};
pub use generator::{HybridGenerator, Skald, SkaldBuilder};
pub use metrics::{Alert, MetricsSummary};
pub use random::{RandomSource, ThreadRngSource};
pub use template::{TemplateEngine, TemplateGenerator};
pub use types::{GenerationRequest, GenerationResult, Source, TripType, Voice};
