//! Core request and result types.

pub mod request;
pub mod result;

pub use request::{GenerationRequest, TripType, Voice};
pub use result::{GenerationResult, Source};
