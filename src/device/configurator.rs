//! Configuration apply step
//!
//! `DeviceConfigurator` is the seam a real transport plugs into. The
//! default implementation only logs what it would push.

use super::model::Device;
use crate::error::Result;

/// Applies a device's configuration
///
/// Implementations must not share mutable state between devices so that
/// the registry can call them in parallel. The registry puts no deadline
/// on `configure`; an implementation backed by a real transport bounds
/// each call itself, the way `TimeoutSource` bounds config fetches, and
/// reports expiry as a `Configuration` error for that device.
pub trait DeviceConfigurator: Send + Sync {
    /// Apply configuration to a single device
    fn configure(&self, device: &Device) -> Result<()>;
}

/// Configurator that simulates the apply step
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedConfigurator;

impl DeviceConfigurator for SimulatedConfigurator {
    fn configure(&self, device: &Device) -> Result<()> {
        tracing::info!(
            device = device.name(),
            ip = device.ip_address(),
            kind = device.kind().as_str(),
            "Configuring {} {} with IP {}",
            device.kind(),
            device.name(),
            device.ip_address()
        );
        Ok(())
    }
}

impl<F> DeviceConfigurator for F
where
    F: Fn(&Device) -> Result<()> + Send + Sync,
{
    fn configure(&self, device: &Device) -> Result<()> {
        self(device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NetFleetError;

    #[test]
    fn test_simulated_configurator_succeeds() {
        assert!(SimulatedConfigurator.configure(&Device::router("R1", "10.0.0.1")).is_ok());
        assert!(Device::switch("S1", "10.0.0.2").configure().is_ok());
    }

    #[test]
    fn test_closure_configurator() {
        let reject = |device: &Device| -> Result<()> {
            Err(NetFleetError::configuration(device.name(), "rejected"))
        };
        let err = reject.configure(&Device::router("R1", "10.0.0.1")).unwrap_err();
        assert_eq!(err.device(), Some("R1"));
    }
}
