//! Error types for NetFleet
//!
//! This module defines all error types used throughout the crate,
//! providing detailed error information for batch reports and user feedback.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Main error type for NetFleet operations
#[derive(Error, Debug)]
pub enum NetFleetError {
    /// A single device failed to apply its configuration
    #[error("Configuration of device '{device}' failed: {message}")]
    Configuration { device: String, message: String },

    /// Construction request named an unknown device type
    #[error("Invalid device kind: '{0}' (expected 'router' or 'switch')")]
    InvalidDeviceKind(String),

    /// Export target could not be written
    #[error("Export I/O error at '{path}': {source}")]
    ExportIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Fewer telemetry samples than requested clusters
    #[error("Insufficient samples: {samples} device(s) for {clusters} cluster(s)")]
    InsufficientSamples { samples: usize, clusters: usize },

    /// Config retrieval collaborator could not be reached
    #[error("Transport unavailable for '{host}:{port}': {message}")]
    TransportUnavailable {
        host: String,
        port: u16,
        message: String,
    },

    /// Collaborator call exceeded its time budget
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),

    /// Telemetry sample outside its contract range
    #[error("Invalid sample for '{device}': {field}={value} outside [0, {limit})")]
    InvalidSample {
        device: String,
        field: &'static str,
        value: u32,
        limit: u32,
    },

    /// Sampler produced no reading for a device
    #[error("No telemetry available for device '{0}'")]
    MissingTelemetry(String),

    /// Collaborator returned no configuration text
    #[error("Empty configuration returned for device '{0}'")]
    EmptyConfig(String),

    /// No device with the given name in the registry
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    /// JSON or markup rendering failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Multiple errors occurred
    #[error("Multiple errors occurred ({count} errors)")]
    MultipleErrors {
        count: usize,
        errors: Vec<NetFleetError>,
    },

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<NetFleetError>,
    },
}

impl NetFleetError {
    /// Create an export I/O error with path context
    pub fn export_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ExportIo {
            path: path.into(),
            source,
        }
    }

    /// Create a per-device configuration error
    pub fn configuration(device: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            device: device.into(),
            message: message.into(),
        }
    }

    /// Create a transport error
    pub fn transport(host: impl Into<String>, port: u16, message: impl Into<String>) -> Self {
        Self::TransportUnavailable {
            host: host.into(),
            port,
            message: message.into(),
        }
    }

    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }

    /// Check if this error is transient and the caller may try again
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::TransportUnavailable { .. } | Self::Timeout(_) | Self::ExportIo { .. } => true,
            Self::WithContext { source, .. } => source.is_recoverable(),
            _ => false,
        }
    }

    /// Get the device name associated with this error, if any
    pub fn device(&self) -> Option<&str> {
        match self {
            Self::Configuration { device, .. } | Self::InvalidSample { device, .. } => {
                Some(device)
            }
            Self::EmptyConfig(device)
            | Self::DeviceNotFound(device)
            | Self::MissingTelemetry(device) => Some(device),
            Self::WithContext { source, .. } => source.device(),
            _ => None,
        }
    }
}

/// Result type alias for NetFleet operations
pub type Result<T> = std::result::Result<T, NetFleetError>;

impl From<serde_json::Error> for NetFleetError {
    fn from(err: serde_json::Error) -> Self {
        NetFleetError::Serialization(err.to_string())
    }
}

/// Extension trait for adding path context to std::io::Result
pub trait IoResultExt<T> {
    /// Add path context to an I/O error
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| NetFleetError::export_io(path, e))
    }
}

/// Collects multiple results into a single result
pub fn collect_errors<T>(results: Vec<Result<T>>) -> Result<Vec<T>> {
    let mut successes = Vec::new();
    let mut errors = Vec::new();

    for result in results {
        match result {
            Ok(value) => successes.push(value),
            Err(e) => errors.push(e),
        }
    }

    match errors.len() {
        0 => Ok(successes),
        1 => Err(errors.remove(0)),
        count => Err(NetFleetError::MultipleErrors { count, errors }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_io_keeps_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err = NetFleetError::export_io("/readonly/out.json", io_err);
        match &err {
            NetFleetError::ExportIo { path, .. } => {
                assert_eq!(path, &PathBuf::from("/readonly/out.json"))
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("/readonly/out.json"));
    }

    #[test]
    fn test_error_recoverability() {
        assert!(NetFleetError::transport("10.0.0.1", 830, "refused").is_recoverable());
        assert!(NetFleetError::Timeout(Duration::from_secs(5)).is_recoverable());
        assert!(!NetFleetError::InvalidDeviceKind("firewall".into()).is_recoverable());

        let wrapped = NetFleetError::transport("10.0.0.1", 830, "refused").with_context("fetching R1");
        assert!(wrapped.is_recoverable());
        assert!(!NetFleetError::config("bad").with_context("startup").is_recoverable());
    }

    #[test]
    fn test_device_through_context() {
        let err = NetFleetError::configuration("R1", "link down").with_context("batch");
        assert_eq!(err.device(), Some("R1"));
        assert_eq!(NetFleetError::config("bad").device(), None);
    }

    #[test]
    fn test_collect_errors() {
        let results: Vec<Result<i32>> = vec![Ok(1), Ok(2), Ok(3)];
        assert_eq!(collect_errors(results).unwrap(), vec![1, 2, 3]);

        let results: Vec<Result<i32>> = vec![
            Ok(1),
            Err(NetFleetError::DeviceNotFound("X".into())),
            Err(NetFleetError::Timeout(Duration::from_secs(1))),
        ];
        match collect_errors(results) {
            Err(NetFleetError::MultipleErrors { count, .. }) => assert_eq!(count, 2),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
