//! Telemetry sampling module
//!
//! Produces one resource-usage sample per device per call. Samplers are
//! pluggable; the synthetic generator stands in for a real collector and
//! honours the same range contract.

mod sample;
mod sampler;

pub use sample::*;
pub use sampler::*;
