//! Ordered device registry
//!
//! Owns the device list and coordinates bulk configure/export. Insertion
//! order is the order of every batch result, and duplicate names are kept.

use super::configurator::{DeviceConfigurator, SimulatedConfigurator};
use super::model::{ConfigSnapshot, Device};
use crate::error::{collect_errors, NetFleetError, Result};
use rayon::prelude::*;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

/// A device whose configuration failed during a batch
#[derive(Debug)]
pub struct DeviceFailure {
    /// Device name
    pub device: String,
    /// Underlying error
    pub error: NetFleetError,
}

/// Outcome of a `configure_all` pass
#[derive(Debug, Default)]
pub struct ConfigureReport {
    /// Devices configured successfully, in registry order
    pub configured: Vec<String>,
    /// Devices that failed, in registry order
    pub failures: Vec<DeviceFailure>,
    /// Wall time of the pass
    pub duration: Duration,
}

impl ConfigureReport {
    /// Check if every device configured
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of configure calls made
    pub fn attempted(&self) -> usize {
        self.configured.len() + self.failures.len()
    }

    /// Configured device names, or the failures folded into one error
    ///
    /// A single failure is returned as is; several become `MultipleErrors`.
    pub fn into_result(self) -> Result<Vec<String>> {
        let results = self
            .configured
            .into_iter()
            .map(Ok)
            .chain(self.failures.into_iter().map(|failure| Err(failure.error)))
            .collect();
        collect_errors(results)
    }

    /// Print summary to console
    pub fn print_summary(&self) {
        println!("\n=== Configure Summary ===");
        println!("Devices:     {}", self.attempted());
        println!("Configured:  {}", self.configured.len());
        println!("Duration:    {:.2?}", self.duration);

        if !self.failures.is_empty() {
            println!("\nFailures: {}", self.failures.len());
            for failure in &self.failures {
                println!("  {} - {}", failure.device, failure.error);
            }
        }
    }
}

/// Ordered collection of devices
#[derive(Debug, Clone, Default)]
pub struct DeviceRegistry {
    devices: Vec<Device>,
    parallel: bool,
}

impl DeviceRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Run per-device configuration on the rayon pool
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Append a device
    pub fn add(&mut self, device: Device) {
        tracing::debug!(device = device.name(), "Adding {}", device);
        self.devices.push(device);
    }

    /// Devices in insertion order
    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    /// Number of devices
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Check if the registry holds no devices
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// First device with the given name
    pub fn find(&self, name: &str) -> Option<&Device> {
        self.devices.iter().find(|d| d.name() == name)
    }

    /// Configure every device with the simulated configurator
    pub fn configure_all(&self) -> ConfigureReport {
        self.configure_all_with(&SimulatedConfigurator)
    }

    /// Configure every device exactly once
    ///
    /// A failing device is recorded in the report and does not stop the
    /// remaining devices.
    pub fn configure_all_with<C>(&self, configurator: &C) -> ConfigureReport
    where
        C: DeviceConfigurator + ?Sized,
    {
        let start = Instant::now();

        let outcomes: Vec<(&Device, Result<()>)> = if self.parallel {
            self.devices
                .par_iter()
                .map(|device| (device, configurator.configure(device)))
                .collect()
        } else {
            self.devices
                .iter()
                .map(|device| (device, configurator.configure(device)))
                .collect()
        };

        let mut report = ConfigureReport::default();
        for (device, outcome) in outcomes {
            match outcome {
                Ok(()) => report.configured.push(device.name().to_string()),
                Err(error) => {
                    tracing::warn!(device = device.name(), "Configuration failed: {}", error);
                    report.failures.push(DeviceFailure {
                        device: device.name().to_string(),
                        error,
                    });
                }
            }
        }
        report.duration = start.elapsed();

        tracing::info!(
            "Configured {}/{} devices in {:.2?}",
            report.configured.len(),
            report.attempted(),
            report.duration
        );
        report
    }

    /// Snapshots of every device, in insertion order
    pub fn export_configs(&self) -> Vec<ConfigSnapshot> {
        self.devices.iter().map(Device::get_config).collect()
    }
}

/// Registry shared between writers and readers
///
/// One lock guards the device list: `add` and `configure_all` take it
/// exclusively, exports and advisory passes take it shared.
#[derive(Debug, Clone, Default)]
pub struct SharedRegistry {
    inner: Arc<RwLock<DeviceRegistry>>,
}

impl SharedRegistry {
    /// Wrap an existing registry
    pub fn new(registry: DeviceRegistry) -> Self {
        Self {
            inner: Arc::new(RwLock::new(registry)),
        }
    }

    /// Append a device
    pub fn add(&self, device: Device) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .add(device);
    }

    /// Configure every device while holding the writer lock
    pub fn configure_all_with<C>(&self, configurator: &C) -> ConfigureReport
    where
        C: DeviceConfigurator + ?Sized,
    {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .configure_all_with(configurator)
    }

    /// Snapshots of every device
    pub fn export_configs(&self) -> Vec<ConfigSnapshot> {
        self.read(DeviceRegistry::export_configs)
    }

    /// Run a read-only operation against a consistent view of the registry
    pub fn read<R>(&self, f: impl FnOnce(&DeviceRegistry) -> R) -> R {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    /// Number of devices
    pub fn len(&self) -> usize {
        self.read(DeviceRegistry::len)
    }

    /// Check if the registry holds no devices
    pub fn is_empty(&self) -> bool {
        self.read(DeviceRegistry::is_empty)
    }
}
