//! Provider call layer.
//!
//! External backends are never called directly: every request goes through
//! a single network-boundary gateway that holds provider credentials and
//! performs the actual backend HTTP call. This crate knows only the
//! gateway URL and each provider's timeout/cost metadata.

pub mod client;
pub mod prompt;

pub use client::GatewayClient;

use crate::GenerationRequest;

/// Last-resort synthetic text, used only when the template tier itself
/// fails. Deliberately minimal and distinct from template output.
pub fn emergency_fallback(request: &GenerationRequest) -> String {
    format!(
        "Thank you for your stay at {}. We appreciate your feedback.",
        request.subject_name
    )
}
