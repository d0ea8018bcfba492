//! Fleet automation engine
//!
//! Ties the registry, telemetry sampler, advisor and config source into one
//! explicit context. Callers build an engine once and reuse it; nothing is
//! recreated per request.

use crate::advisor::{AdvisoryReport, OptimizationAdvisor};
use crate::config::FleetConfig;
use crate::device::{
    ConfigSnapshot, ConfigureReport, Device, DeviceConfigurator, DeviceRegistry, SharedRegistry,
    SimulatedConfigurator,
};
use crate::error::{NetFleetError, Result};
use crate::export::{ConfigExporter, ExportFormat, ExportSummary};
use crate::telemetry::{SyntheticSampler, TelemetrySample, TelemetrySampler};
use crate::transport::{fetch_device_config, ConfigSource, SimulatedNetconf, TimeoutSource};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

/// Result of one optimization pass
#[derive(Debug, Clone)]
pub struct OptimizationRun {
    /// Telemetry the advice was derived from
    pub samples: Vec<TelemetrySample>,
    /// Clustering outcome and recommendations
    pub report: AdvisoryReport,
}

/// Explicit context for fleet operations
pub struct AutomationEngine {
    registry: SharedRegistry,
    configurator: Box<dyn DeviceConfigurator>,
    sampler: Mutex<Box<dyn TelemetrySampler>>,
    advisor: OptimizationAdvisor,
    source: Arc<dyn ConfigSource>,
    config: FleetConfig,
}

impl AutomationEngine {
    /// Create an engine with the simulated collaborators
    ///
    /// The registry is populated from the configured devices. The config
    /// source is bounded by the transport timeout.
    pub fn from_config(config: FleetConfig) -> Self {
        let mut registry = DeviceRegistry::new().with_parallel(config.parallel_configure);
        for device in config.build_devices() {
            registry.add(device);
        }

        let sampler: Box<dyn TelemetrySampler> = match config.sampler_seed {
            Some(seed) => Box::new(SyntheticSampler::with_seed(seed)),
            None => Box::new(SyntheticSampler::new()),
        };
        let source: Arc<dyn ConfigSource> = Arc::new(TimeoutSource::new(
            Arc::new(SimulatedNetconf::new()),
            config.transport.timeout,
        ));

        Self {
            registry: SharedRegistry::new(registry),
            configurator: Box::new(SimulatedConfigurator),
            sampler: Mutex::new(sampler),
            advisor: OptimizationAdvisor::new(config.advisor.clone()),
            source,
            config,
        }
    }

    /// Replace the telemetry sampler
    pub fn with_sampler(mut self, sampler: impl TelemetrySampler + 'static) -> Self {
        self.sampler = Mutex::new(Box::new(sampler));
        self
    }

    /// Replace the device configurator
    pub fn with_configurator(mut self, configurator: impl DeviceConfigurator + 'static) -> Self {
        self.configurator = Box::new(configurator);
        self
    }

    /// Replace the config source; it is used as given, without a timeout wrapper
    pub fn with_source(mut self, source: Arc<dyn ConfigSource>) -> Self {
        self.source = source;
        self
    }

    /// Shared registry handle
    pub fn registry(&self) -> &SharedRegistry {
        &self.registry
    }

    /// Runtime settings
    pub fn config(&self) -> &FleetConfig {
        &self.config
    }

    /// Register a device
    pub fn add_device(&self, device: Device) {
        self.registry.add(device);
    }

    /// Configure every registered device
    pub fn configure_all(&self) -> ConfigureReport {
        self.registry.configure_all_with(self.configurator.as_ref())
    }

    /// Snapshots of every registered device
    pub fn export_configs(&self) -> Vec<ConfigSnapshot> {
        self.registry.export_configs()
    }

    /// Write the current registry state to the given targets
    ///
    /// Both documents come from one snapshot of the registry.
    pub fn export(&self, json: Option<PathBuf>, xml: Option<PathBuf>) -> Result<ExportSummary> {
        let mut targets = Vec::new();
        if let Some(path) = json {
            targets.push((ExportFormat::Json, path));
        }
        if let Some(path) = xml {
            targets.push((ExportFormat::Xml, path));
        }
        if targets.is_empty() {
            return Err(NetFleetError::config("no export target given"));
        }

        let exporter = self.registry.read(ConfigExporter::from_registry);
        exporter.write_targets(&targets)
    }

    /// Fetch the running configuration of a registered device
    pub fn fetch_config(&self, name: &str) -> Result<String> {
        let device = self
            .registry
            .read(|registry| registry.find(name).cloned())
            .ok_or_else(|| NetFleetError::DeviceNotFound(name.to_string()))?;

        fetch_device_config(self.source.as_ref(), &device, &self.config.transport)
    }

    /// Sample telemetry for the fleet and derive scaling advice
    ///
    /// Sampling happens under the registry read lock so samples line up
    /// with one consistent device list.
    pub fn optimize(&self) -> Result<OptimizationRun> {
        let samples = {
            let mut sampler = self.sampler.lock().unwrap_or_else(PoisonError::into_inner);
            self.registry
                .read(|registry| sampler.sample_checked(registry.devices()))?
        };

        tracing::debug!("Collected {} telemetry sample(s)", samples.len());
        let report = self.advisor.advise(&samples)?;

        Ok(OptimizationRun { samples, report })
    }
}
