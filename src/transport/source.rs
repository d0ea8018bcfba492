//! Configuration sources

use super::credentials::Credentials;
use crate::config::TransportConfig;
use crate::device::Device;
use crate::error::{NetFleetError, Result};
use crossbeam::channel::{bounded, RecvTimeoutError};
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Payload returned by the simulated NETCONF session
pub const SIMULATED_PAYLOAD: &str = "<simulated-netconf-data />";

/// Something that can fetch a device's running configuration
pub trait ConfigSource: Send + Sync {
    /// Fetch the raw configuration document from `host:port`
    fn fetch_remote_config(&self, host: &str, port: u16, credentials: &Credentials) -> Result<String>;
}

/// Simulated NETCONF endpoint
///
/// Every host answers with [`SIMULATED_PAYLOAD`] unless it was marked
/// unreachable.
#[derive(Debug, Clone, Default)]
pub struct SimulatedNetconf {
    unreachable: HashSet<String>,
    latency: Option<Duration>,
}

impl SimulatedNetconf {
    /// Create a source where every host answers
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse connections to `host`
    pub fn with_unreachable(mut self, host: impl Into<String>) -> Self {
        self.unreachable.insert(host.into());
        self
    }

    /// Delay every response
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }
}

impl ConfigSource for SimulatedNetconf {
    fn fetch_remote_config(&self, host: &str, port: u16, credentials: &Credentials) -> Result<String> {
        tracing::info!(
            "Fetching configuration from {}:{} as {}",
            host,
            port,
            credentials.username
        );

        if self.unreachable.contains(host) {
            return Err(NetFleetError::transport(host, port, "connection refused"));
        }
        if let Some(latency) = self.latency {
            thread::sleep(latency);
        }

        Ok(SIMULATED_PAYLOAD.to_string())
    }
}

/// Bounds every fetch of the inner source by a deadline
///
/// The call runs on a helper thread; on expiry the caller gets
/// `Timeout` and the late result is dropped. No retry is attempted.
pub struct TimeoutSource<S: ?Sized> {
    inner: Arc<S>,
    timeout: Duration,
}

impl<S: ConfigSource + ?Sized + 'static> TimeoutSource<S> {
    /// Wrap a shared source
    pub fn new(inner: Arc<S>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    /// Deadline per call
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl<S: ConfigSource + ?Sized + 'static> ConfigSource for TimeoutSource<S> {
    fn fetch_remote_config(&self, host: &str, port: u16, credentials: &Credentials) -> Result<String> {
        let (tx, rx) = bounded(1);
        let inner = Arc::clone(&self.inner);
        let host_owned = host.to_string();
        let creds = credentials.clone();

        thread::Builder::new()
            .name(format!("fetch-{host}"))
            .spawn(move || {
                let _ = tx.send(inner.fetch_remote_config(&host_owned, port, &creds));
            })
            .map_err(|e| NetFleetError::transport(host, port, e.to_string()))?;

        match rx.recv_timeout(self.timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => {
                tracing::warn!("Fetch from {}:{} timed out after {:?}", host, port, self.timeout);
                Err(NetFleetError::Timeout(self.timeout))
            }
            Err(RecvTimeoutError::Disconnected) => {
                Err(NetFleetError::transport(host, port, "fetch worker exited without a result"))
            }
        }
    }
}

/// Fetch one device's configuration using the transport settings
///
/// Transport failures reach the caller as their own variant
/// (`TransportUnavailable`, `Timeout`). An empty document is reported as
/// `EmptyConfig`.
pub fn fetch_device_config(source: &dyn ConfigSource, device: &Device, config: &TransportConfig) -> Result<String> {
    let credentials = Credentials::from_config(config);
    let payload = source
        .fetch_remote_config(device.ip_address(), config.port, &credentials)
        .map_err(|e| {
            tracing::warn!(device = device.name(), "Configuration fetch failed: {}", e);
            e
        })?;

    if payload.trim().is_empty() {
        return Err(NetFleetError::EmptyConfig(device.name().to_string()));
    }

    tracing::debug!("Fetched {} bytes from {}", payload.len(), device.name());
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds() -> Credentials {
        Credentials::new("admin", "admin")
    }

    #[test]
    fn test_simulated_payload() {
        let payload = SimulatedNetconf::new()
            .fetch_remote_config("10.0.0.1", 830, &creds())
            .unwrap();
        assert_eq!(payload, "<simulated-netconf-data />");
    }

    #[test]
    fn test_unreachable_host() {
        let source = SimulatedNetconf::new().with_unreachable("10.0.0.9");
        match source.fetch_remote_config("10.0.0.9", 830, &creds()) {
            Err(NetFleetError::TransportUnavailable { host, port, .. }) => {
                assert_eq!(host, "10.0.0.9");
                assert_eq!(port, 830);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_timeout_expires() {
        let slow = Arc::new(SimulatedNetconf::new().with_latency(Duration::from_millis(500)));
        let source = TimeoutSource::new(slow, Duration::from_millis(20));
        let err = source.fetch_remote_config("10.0.0.1", 830, &creds()).unwrap_err();
        assert!(matches!(err, NetFleetError::Timeout(d) if d == Duration::from_millis(20)));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_timeout_passes_through_result() {
        let source = TimeoutSource::new(Arc::new(SimulatedNetconf::new()), Duration::from_secs(5));
        assert_eq!(
            source.fetch_remote_config("10.0.0.1", 830, &creds()).unwrap(),
            SIMULATED_PAYLOAD
        );

        let down = TimeoutSource::new(
            Arc::new(SimulatedNetconf::new().with_unreachable("10.0.0.1")),
            Duration::from_secs(5),
        );
        assert!(matches!(
            down.fetch_remote_config("10.0.0.1", 830, &creds()),
            Err(NetFleetError::TransportUnavailable { .. })
        ));
    }

    struct Blank;

    impl ConfigSource for Blank {
        fn fetch_remote_config(&self, _host: &str, _port: u16, _credentials: &Credentials) -> Result<String> {
            Ok("  \n".to_string())
        }
    }

    #[test]
    fn test_fetch_device_config() {
        let device = Device::router("R1", "192.168.1.1");
        let config = TransportConfig::default();

        let payload = fetch_device_config(&SimulatedNetconf::new(), &device, &config).unwrap();
        assert_eq!(payload, SIMULATED_PAYLOAD);

        match fetch_device_config(&Blank, &device, &config) {
            Err(NetFleetError::EmptyConfig(name)) => assert_eq!(name, "R1"),
            other => panic!("unexpected result: {other:?}"),
        }

        let down = SimulatedNetconf::new().with_unreachable("192.168.1.1");
        let err = fetch_device_config(&down, &device, &config).unwrap_err();
        assert!(err.is_recoverable());
        match err {
            NetFleetError::TransportUnavailable { host, port, .. } => {
                assert_eq!(host, "192.168.1.1");
                assert_eq!(port, 830);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
