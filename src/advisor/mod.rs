//! Optimization advisor module
//!
//! Turns a batch of telemetry samples into scaling recommendations:
//! 1. Standardize each feature over the batch (zero mean, unit variance)
//! 2. Cluster devices with deterministic k-means
//! 3. Relabel clusters into usage tiers (0 = lowest mean usage)
//! 4. Advise scaling down the lowest tier and scaling up the highest
//!
//! Nothing is retained between runs; each call fits a fresh model.

mod kmeans;
mod optimizer;
mod scaler;

pub use kmeans::*;
pub use optimizer::*;
pub use scaler::*;

/// Number of telemetry features per device
pub const FEATURES: usize = 3;

/// One device's (traffic, cpu, memory) features
pub type FeatureVector = [f64; FEATURES];
