//! HTTP client for the network-boundary gateway.
//!
//! The gateway accepts `{provider, model, messages, generation parameters}`
//! and forwards to the named external backend, handling credentials and
//! provider-side rate limiting. Each call here is bounded by the target
//! provider's own configured timeout; on expiry the request is aborted and
//! reported as [`SkaldError::Timeout`]. There is no retry at this layer —
//! retry/backoff policy belongs to the orchestrator, which by design has
//! none.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::prompt::{self, PromptMessage};
use crate::config::ProviderConfig;
use crate::{GenerationRequest, Result, SkaldError};

/// Upper bound for generated reviews; forwarded to the backend.
const MAX_TOKENS: u32 = 400;

/// Sampling temperature forwarded to the backend.
const TEMPERATURE: f32 = 0.8;

/// Probe calls use a short fixed timeout so an unresponsive backend
/// cannot stall an availability refresh.
const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    provider: &'a str,
    model: &'a str,
    messages: Vec<PromptMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    text: String,
}

/// Client for the single network-boundary endpoint.
#[derive(Clone)]
pub struct GatewayClient {
    http: Client,
    base_url: String,
}

impl GatewayClient {
    /// Create a client for the given gateway base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            // Per-request timeouts come from each provider's config; the
            // client itself carries no global timeout.
            http: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Request a completion from one provider, bounded by its timeout.
    pub async fn complete(
        &self,
        provider: &ProviderConfig,
        request: &GenerationRequest,
    ) -> Result<String> {
        let body = CompletionRequest {
            provider: &provider.name,
            model: &provider.model,
            messages: prompt::build_messages(request),
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };
        self.post_completion(&body, provider.timeout()).await
    }

    /// Issue one minimal completion as an availability probe.
    ///
    /// Any failure — timeout, transport error, non-success response —
    /// means unavailable. Never errors.
    pub async fn probe(&self, provider: &ProviderConfig) -> bool {
        let body = CompletionRequest {
            provider: &provider.name,
            model: &provider.model,
            messages: vec![PromptMessage {
                role: "user",
                content: "ping".to_string(),
            }],
            max_tokens: 1,
            temperature: 0.0,
        };
        match self.post_completion(&body, PROBE_TIMEOUT).await {
            Ok(_) => true,
            Err(e) => {
                debug!(provider = %provider.name, error = %e, "availability probe failed");
                false
            }
        }
    }

    async fn post_completion(
        &self,
        body: &CompletionRequest<'_>,
        timeout: Duration,
    ) -> Result<String> {
        let url = format!("{}/v1/complete", self.base_url);
        let response = self
            .http
            .post(&url)
            .timeout(timeout)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SkaldError::Timeout { limit: timeout }
                } else {
                    SkaldError::Http(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SkaldError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: CompletionResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                SkaldError::Timeout { limit: timeout }
            } else {
                SkaldError::Http(e.to_string())
            }
        })?;

        let text = parsed.text.trim().to_string();
        if text.is_empty() {
            return Err(SkaldError::EmptyResponse);
        }
        Ok(text)
    }
}
