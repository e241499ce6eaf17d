//! Injectable randomness.
//!
//! The generator draws randomness in three places: template choice within a
//! rating bucket, the A/B routing decision, and the request-id suffix.
//! All three go through [`RandomSource`] so tests can supply a
//! deterministic implementation and assert exact outputs.

use rand::Rng;
use rand::distr::Alphanumeric;

/// Abstract source of randomness for the generator.
pub trait RandomSource: Send + Sync {
    /// Uniform integer in `[0, bound)`. `bound` is always nonzero.
    fn pick(&self, bound: usize) -> usize;

    /// Uniform draw in `[0.0, 100.0)` for the A/B routing decision.
    fn percent(&self) -> f64;

    /// Short alphanumeric suffix for request ids.
    fn suffix(&self) -> String {
        let n = self.pick(usize::MAX);
        format!("{:06x}", n as u64 & 0xff_ffff)
    }
}

/// Production source backed by the thread-local rng.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngSource;

impl RandomSource for ThreadRngSource {
    fn pick(&self, bound: usize) -> usize {
        rand::rng().random_range(0..bound)
    }

    fn percent(&self) -> f64 {
        rand::rng().random_range(0.0..100.0)
    }

    fn suffix(&self) -> String {
        rand::rng()
            .sample_iter(&Alphanumeric)
            .take(6)
            .map(char::from)
            .collect()
    }
}
