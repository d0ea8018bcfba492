//! Device identity and configuration snapshots
//!
//! Every kind shares the same fields and behavior; the kind tag only
//! changes the `type` value carried by the snapshot.

use super::configurator::{DeviceConfigurator, SimulatedConfigurator};
use crate::error::{NetFleetError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of network device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceKind {
    /// Layer 3 router
    Router,
    /// Layer 2 switch
    Switch,
}

impl DeviceKind {
    /// Tag emitted in snapshots
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Router => "Router",
            Self::Switch => "Switch",
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts `Router` and `Switch` in any letter case, surrounding
/// whitespace ignored, so CLI declarations like `router:R1:10.0.0.1` work.
impl FromStr for DeviceKind {
    type Err = NetFleetError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "router" => Ok(Self::Router),
            "switch" => Ok(Self::Switch),
            _ => Err(NetFleetError::InvalidDeviceKind(s.to_string())),
        }
    }
}

/// A managed network device
///
/// Identity is fixed at construction; there are no setters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    name: String,
    ip_address: String,
    kind: DeviceKind,
}

impl Device {
    /// Create a device of the given kind
    pub fn new(name: impl Into<String>, ip_address: impl Into<String>, kind: DeviceKind) -> Self {
        Self {
            name: name.into(),
            ip_address: ip_address.into(),
            kind,
        }
    }

    /// Create a router
    pub fn router(name: impl Into<String>, ip_address: impl Into<String>) -> Self {
        Self::new(name, ip_address, DeviceKind::Router)
    }

    /// Create a switch
    pub fn switch(name: impl Into<String>, ip_address: impl Into<String>) -> Self {
        Self::new(name, ip_address, DeviceKind::Switch)
    }

    /// Create a device from a kind name such as "router" or "Switch"
    pub fn from_kind_name(
        kind: &str,
        name: impl Into<String>,
        ip_address: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self::new(name, ip_address, kind.parse()?))
    }

    /// Device name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Management IP address
    pub fn ip_address(&self) -> &str {
        &self.ip_address
    }

    /// Device kind
    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    /// Apply this device's configuration with the default simulated configurator
    pub fn configure(&self) -> Result<()> {
        SimulatedConfigurator.configure(self)
    }

    /// Point-in-time projection of the configurable state
    pub fn get_config(&self) -> ConfigSnapshot {
        ConfigSnapshot {
            name: self.name.clone(),
            ip: self.ip_address.clone(),
            kind: self.kind,
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.kind, self.name, self.ip_address)
    }
}

/// Read-only configuration snapshot of a device
///
/// Field order is the serialized key order for every export format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    /// Device name
    pub name: String,
    /// Management IP address
    pub ip: String,
    /// Device kind tag
    #[serde(rename = "type")]
    pub kind: DeviceKind,
}

impl ConfigSnapshot {
    /// Snapshot keys
    pub const KEYS: [&'static str; 3] = ["name", "ip", "type"];

    /// Key/value pairs in emission order
    pub fn fields(&self) -> [(&'static str, &str); 3] {
        [
            (Self::KEYS[0], self.name.as_str()),
            (Self::KEYS[1], self.ip.as_str()),
            (Self::KEYS[2], self.kind.as_str()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parsing() {
        assert_eq!("router".parse::<DeviceKind>().unwrap(), DeviceKind::Router);
        assert_eq!(" Switch ".parse::<DeviceKind>().unwrap(), DeviceKind::Switch);
        assert_eq!("ROUTER".parse::<DeviceKind>().unwrap(), DeviceKind::Router);
        assert!("".parse::<DeviceKind>().is_err());
        assert!("route r".parse::<DeviceKind>().is_err());
        assert!(matches!(
            "firewall".parse::<DeviceKind>(),
            Err(NetFleetError::InvalidDeviceKind(k)) if k == "firewall"
        ));
    }

    #[test]
    fn test_snapshot_differs_only_in_type() {
        let router = Device::router("X", "10.0.0.1").get_config();
        let switch = Device::switch("X", "10.0.0.1").get_config();
        assert_eq!(router.name, switch.name);
        assert_eq!(router.ip, switch.ip);
        assert_eq!(router.fields()[2], ("type", "Router"));
        assert_eq!(switch.fields()[2], ("type", "Switch"));
    }

    #[test]
    fn test_snapshot_json_key_order() {
        let snapshot = Device::router("R1", "192.168.1.1").get_config();
        let json = serde_json::to_string(&snapshot).unwrap();
        assert_eq!(json, r#"{"name":"R1","ip":"192.168.1.1","type":"Router"}"#);
    }

    #[test]
    fn test_get_config_is_pure() {
        let device = Device::switch("S1", "192.168.1.2");
        let before = device.clone();
        let _ = device.get_config();
        assert_eq!(device, before);
        assert_eq!(device.get_config(), device.get_config());
    }

    #[test]
    fn test_from_kind_name() {
        let device = Device::from_kind_name("ROUTER", "R9", "10.9.9.9").unwrap();
        assert_eq!(device.kind(), DeviceKind::Router);
        assert!(Device::from_kind_name("loadbalancer", "LB", "10.0.0.3").is_err());
    }
}
