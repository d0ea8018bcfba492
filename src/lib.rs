//! # NetFleet - Network Device Automation
//!
//! NetFleet manages a fleet of routers and switches: it applies their
//! configuration, exports configuration snapshots as JSON and XML, pulls
//! running configuration over a management protocol and clusters resource
//! telemetry into usage tiers to suggest scaling changes.
//!
//! ## Features
//!
//! - **Ordered Registry**: Insertion order drives every batch result
//! - **Failure Isolation**: One device failing never aborts a configure pass
//! - **Atomic Export**: JSON and XML documents replace their targets atomically
//! - **Deterministic Clustering**: Same telemetry, same tiers, sequential or parallel
//! - **Bounded Fetches**: Remote config retrieval runs under a deadline
//!
//! ## Quick Start
//!
//! ```no_run
//! use netfleet::device::{Device, DeviceRegistry};
//! use netfleet::export::ConfigExporter;
//! use std::path::Path;
//!
//! let mut registry = DeviceRegistry::new();
//! registry.add(Device::router("R1", "192.168.1.1"));
//! registry.add(Device::switch("S1", "192.168.1.2"));
//!
//! let report = registry.configure_all();
//! report.print_summary();
//!
//! let exporter = ConfigExporter::from_registry(&registry);
//! exporter.write_json(Path::new("network_config.json")).unwrap();
//! exporter.write_xml(Path::new("network_config.xml")).unwrap();
//! ```
//!
//! ## Optimization Advice
//!
//! ```no_run
//! use netfleet::advisor::OptimizationAdvisor;
//! use netfleet::telemetry::TelemetrySample;
//!
//! let samples = vec![
//!     TelemetrySample::new("R1", 10, 5, 5),
//!     TelemetrySample::new("R2", 500, 50, 50),
//!     TelemetrySample::new("S1", 900, 95, 90),
//! ];
//!
//! let report = OptimizationAdvisor::default().advise(&samples).unwrap();
//! for message in report.messages() {
//!     println!("{}", message);
//! }
//! ```
//!
//! ## Engine
//!
//! ```no_run
//! use netfleet::config::FleetConfig;
//! use netfleet::core::AutomationEngine;
//!
//! let engine = AutomationEngine::from_config(FleetConfig::default());
//! engine.configure_all().print_summary();
//! println!("{}", engine.fetch_config("MainRouter").unwrap());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod advisor;
pub mod config;
pub mod core;
pub mod device;
pub mod error;
pub mod export;
pub mod telemetry;
pub mod transport;

// Re-export commonly used types
pub use config::{AdvisorConfig, FleetConfig, TransportConfig};
pub use core::AutomationEngine;
pub use device::{Device, DeviceKind, DeviceRegistry};
pub use error::{NetFleetError, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    //! Convenient re-exports for common usage
    //!
    //! ```no_run
    //! use netfleet::prelude::*;
    //! ```

    pub use crate::advisor::{AdvisoryReport, OptimizationAdvisor, Recommendation, ScalingAction};
    pub use crate::config::{AdvisorConfig, FleetConfig, TransportConfig};
    pub use crate::core::{AutomationEngine, OptimizationRun};
    pub use crate::device::{ConfigSnapshot, ConfigureReport, Device, DeviceConfigurator, DeviceKind, DeviceRegistry, SharedRegistry};
    pub use crate::error::{NetFleetError, Result};
    pub use crate::export::{ConfigExporter, ExportFormat};
    pub use crate::telemetry::{FixedSampler, SyntheticSampler, TelemetrySample, TelemetrySampler};
    pub use crate::transport::{ConfigSource, Credentials, SimulatedNetconf, TimeoutSource};
}
