//! Telemetry samplers
//!
//! `TelemetrySampler` is the collector seam. `SyntheticSampler` generates
//! range-bounded random readings; `FixedSampler` replays known readings.

use super::sample::{TelemetrySample, TRAFFIC_LIMIT, USAGE_LIMIT};
use crate::device::Device;
use crate::error::{NetFleetError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

/// Source of per-device resource usage
pub trait TelemetrySampler: Send {
    /// Produce one sample per device, in device order
    fn sample(&mut self, devices: &[Device]) -> Result<Vec<TelemetrySample>>;

    /// Sample and enforce the collector contract
    ///
    /// Fails if the sampler returned the wrong number of samples, a sample
    /// keyed to the wrong device, or a reading outside its range.
    fn sample_checked(&mut self, devices: &[Device]) -> Result<Vec<TelemetrySample>> {
        let samples = self.sample(devices)?;
        if samples.len() != devices.len() {
            return Err(NetFleetError::config(format!(
                "sampler returned {} samples for {} devices",
                samples.len(),
                devices.len()
            )));
        }
        for (device, sample) in devices.iter().zip(&samples) {
            if sample.device_name != device.name() {
                return Err(NetFleetError::MissingTelemetry(device.name().to_string()));
            }
            sample.validate()?;
        }
        Ok(samples)
    }
}

/// Random readings within the contract ranges
#[derive(Debug, Clone)]
pub struct SyntheticSampler {
    rng: StdRng,
}

impl SyntheticSampler {
    /// Create a sampler seeded from OS entropy
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a reproducible sampler
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for SyntheticSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetrySampler for SyntheticSampler {
    fn sample(&mut self, devices: &[Device]) -> Result<Vec<TelemetrySample>> {
        let samples = devices
            .iter()
            .map(|device| TelemetrySample {
                device_name: device.name().to_string(),
                traffic: self.rng.gen_range(0..TRAFFIC_LIMIT),
                cpu_usage: self.rng.gen_range(0..USAGE_LIMIT),
                memory_usage: self.rng.gen_range(0..USAGE_LIMIT),
            })
            .collect();
        Ok(samples)
    }
}

/// Replays fixed readings keyed by device name
#[derive(Debug, Clone, Default)]
pub struct FixedSampler {
    readings: HashMap<String, (u32, u32, u32)>,
}

impl FixedSampler {
    /// Create an empty sampler
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the reading for a device
    pub fn with_reading(mut self, device: impl Into<String>, traffic: u32, cpu: u32, memory: u32) -> Self {
        self.readings.insert(device.into(), (traffic, cpu, memory));
        self
    }

    /// Build from `(name, traffic, cpu, memory)` rows
    pub fn from_rows<S: Into<String>>(rows: impl IntoIterator<Item = (S, u32, u32, u32)>) -> Self {
        rows.into_iter()
            .fold(Self::new(), |sampler, (name, t, c, m)| sampler.with_reading(name, t, c, m))
    }
}

impl TelemetrySampler for FixedSampler {
    fn sample(&mut self, devices: &[Device]) -> Result<Vec<TelemetrySample>> {
        devices
            .iter()
            .map(|device| {
                let (traffic, cpu, memory) = self
                    .readings
                    .get(device.name())
                    .copied()
                    .ok_or_else(|| NetFleetError::MissingTelemetry(device.name().to_string()))?;
                Ok(TelemetrySample::new(device.name(), traffic, cpu, memory))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn devices(n: usize) -> Vec<Device> {
        (0..n)
            .map(|i| Device::router(format!("R{i}"), format!("10.0.0.{i}")))
            .collect()
    }

    #[test]
    fn test_synthetic_is_reproducible() {
        let fleet = devices(8);
        let a = SyntheticSampler::with_seed(7).sample(&fleet).unwrap();
        let b = SyntheticSampler::with_seed(7).sample(&fleet).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_fixed_sampler_missing_device() {
        let mut sampler = FixedSampler::new().with_reading("R0", 10, 5, 5);
        match sampler.sample(&devices(2)) {
            Err(NetFleetError::MissingTelemetry(name)) => assert_eq!(name, "R1"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_sample_checked_rejects_out_of_range() {
        let mut sampler = FixedSampler::from_rows([("R0", 10, 5, 5), ("R1", 10, 150, 5)]);
        let err = sampler.sample_checked(&devices(2)).unwrap_err();
        assert!(matches!(err, NetFleetError::InvalidSample { field: "cpu_usage", .. }));
    }

    struct Misaligned;

    impl TelemetrySampler for Misaligned {
        fn sample(&mut self, devices: &[Device]) -> Result<Vec<TelemetrySample>> {
            Ok(devices
                .iter()
                .rev()
                .map(|d| TelemetrySample::new(d.name(), 1, 1, 1))
                .collect())
        }
    }

    #[test]
    fn test_sample_checked_rejects_misaligned() {
        assert!(Misaligned.sample_checked(&devices(3)).is_err());
        assert!(Misaligned.sample_checked(&devices(1)).is_ok());
    }

    proptest! {
        #[test]
        fn prop_synthetic_within_contract(seed in any::<u64>(), n in 0usize..40) {
            let fleet = devices(n);
            let samples = SyntheticSampler::with_seed(seed).sample_checked(&fleet).unwrap();
            prop_assert_eq!(samples.len(), n);
            for (sample, device) in samples.iter().zip(&fleet) {
                prop_assert_eq!(sample.device_name.as_str(), device.name());
                prop_assert!(sample.traffic < TRAFFIC_LIMIT);
                prop_assert!(sample.cpu_usage < USAGE_LIMIT);
                prop_assert!(sample.memory_usage < USAGE_LIMIT);
            }
        }
    }
}
