//! Telemetry sample and its range contract

use crate::error::{NetFleetError, Result};
use serde::{Deserialize, Serialize};

/// Exclusive upper bound for traffic readings
pub const TRAFFIC_LIMIT: u32 = 1000;

/// Exclusive upper bound for CPU and memory percentages
pub const USAGE_LIMIT: u32 = 100;

/// Resource usage of one device at sampling time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetrySample {
    /// Device the reading belongs to
    pub device_name: String,
    /// Traffic volume, in [0, 1000)
    pub traffic: u32,
    /// CPU usage percent, in [0, 100)
    pub cpu_usage: u32,
    /// Memory usage percent, in [0, 100)
    pub memory_usage: u32,
}

impl TelemetrySample {
    /// Create a sample
    pub fn new(device_name: impl Into<String>, traffic: u32, cpu_usage: u32, memory_usage: u32) -> Self {
        Self {
            device_name: device_name.into(),
            traffic,
            cpu_usage,
            memory_usage,
        }
    }

    /// Check every reading against its range
    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("traffic", self.traffic, TRAFFIC_LIMIT),
            ("cpu_usage", self.cpu_usage, USAGE_LIMIT),
            ("memory_usage", self.memory_usage, USAGE_LIMIT),
        ];
        for (field, value, limit) in checks {
            if value >= limit {
                return Err(NetFleetError::InvalidSample {
                    device: self.device_name.clone(),
                    field,
                    value,
                    limit,
                });
            }
        }
        Ok(())
    }

    /// Readings as a feature triple (traffic, cpu, memory)
    pub fn features(&self) -> [f64; 3] {
        [
            self.traffic as f64,
            self.cpu_usage as f64,
            self.memory_usage as f64,
        ]
    }
}
