//! Configuration settings for NetFleet
//!
//! Defines CLI arguments, runtime settings and their defaults for the
//! configure, export, optimize and fetch operations.

use crate::device::{Device, DeviceKind};
use crate::error::{NetFleetError, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// NetFleet - network device configuration pipeline and optimization advisor
#[derive(Parser, Debug, Clone)]
#[command(name = "netfleet")]
#[command(author = "NetFleet Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Configure, export and right-size a fleet of network devices")]
#[command(long_about = r#"
NetFleet manages a fleet of routers and switches.

Features:
  - Bulk configuration with per-device failure isolation
  - JSON and XML configuration exports (atomic writes)
  - Telemetry sampling and k-means usage tiers
  - Scale-up / scale-down recommendations
  - NETCONF-style config retrieval behind a pluggable source

Examples:
  netfleet                                              # Demo run
  netfleet -d router:R1:192.168.1.1 -d switch:S1:192.168.1.2 show
  netfleet -d router:R1:10.0.0.1 export --json out.json --xml out.xml
  netfleet --seed 42 optimize --clusters 3
  netfleet fetch-config MainRouter --timeout 2s
"#)]
pub struct CliArgs {
    /// Device to manage as KIND:NAME:IP (repeatable; KIND is router or switch)
    #[arg(short = 'd', long = "device", value_name = "KIND:NAME:IP")]
    pub devices: Vec<String>,

    /// Number of worker threads (0 = auto-detect)
    #[arg(short = 't', long, default_value = "0", value_name = "NUM")]
    pub threads: usize,

    /// Seed for synthetic telemetry (random when omitted)
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Configure devices sequentially instead of in parallel
    #[arg(long)]
    pub sequential: bool,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Output format for reports
    #[arg(long, value_enum, default_value = "text")]
    pub output_format: OutputFormat,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List the managed devices and their configuration snapshots
    #[command(name = "show")]
    Show,

    /// Apply configuration to every device
    #[command(name = "configure")]
    Configure,

    /// Export configuration snapshots to files
    #[command(name = "export")]
    Export {
        /// JSON output path
        #[arg(long, value_name = "PATH")]
        json: Option<PathBuf>,
        /// XML output path
        #[arg(long, value_name = "PATH")]
        xml: Option<PathBuf>,
    },

    /// Sample telemetry and print scaling recommendations
    #[command(name = "optimize")]
    Optimize {
        /// Number of usage tiers
        #[arg(short, long, default_value = "3")]
        clusters: usize,
        /// Maximum k-means iterations
        #[arg(long, default_value = "300")]
        max_iter: usize,
    },

    /// Retrieve the running configuration of one device
    #[command(name = "fetch-config")]
    FetchConfig {
        /// Device name
        device: String,
        /// Management port
        #[arg(short, long, default_value = "830")]
        port: u16,
        /// Username
        #[arg(short, long, default_value = "admin")]
        username: String,
        /// Password
        #[arg(long, env = "NETFLEET_PASSWORD", default_value = "admin", hide_env_values = true)]
        password: String,
        /// Per-call timeout (e.g. 5s, 500ms)
        #[arg(long, default_value = "5s", value_parser = parse_duration)]
        timeout: Duration,
    },
}

/// Output format for reports
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON format
    Json,
}

/// Device declaration from the command line or a config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSpec {
    /// Device kind
    pub kind: DeviceKind,
    /// Device name
    pub name: String,
    /// Management IP address
    pub ip: String,
}

impl DeviceSpec {
    /// Build the device
    pub fn to_device(&self) -> Device {
        Device::new(self.name.clone(), self.ip.clone(), self.kind)
    }
}

/// Clustering parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorConfig {
    /// Number of usage tiers (k)
    pub clusters: usize,
    /// Maximum k-means iterations
    pub max_iter: usize,
    /// Centroid shift at which iteration stops
    pub tolerance: f64,
    /// Parallel cluster assignment
    pub parallel: bool,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            clusters: 3, // low / medium / high
            max_iter: 300,
            tolerance: 1e-4,
            parallel: true,
        }
    }
}

/// Config retrieval settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Management port
    pub port: u16,
    /// Username
    pub username: String,
    /// Password
    #[serde(skip_serializing, default)]
    pub password: String,
    /// Per-call timeout
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            port: 830, // NETCONF over SSH
            username: "admin".to_string(),
            password: "admin".to_string(),
            timeout: Duration::from_secs(5),
        }
    }
}

/// Runtime configuration derived from CLI args
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FleetConfig {
    /// Devices to manage, in insertion order
    pub devices: Vec<DeviceSpec>,
    /// Worker threads (0 = auto)
    pub threads: usize,
    /// Configure devices in parallel
    pub parallel_configure: bool,
    /// Seed for synthetic telemetry
    pub sampler_seed: Option<u64>,
    /// Advisor settings
    pub advisor: AdvisorConfig,
    /// Transport settings
    pub transport: TransportConfig,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            devices: demo_fleet(),
            threads: 0, // Auto-detect
            parallel_configure: true,
            sampler_seed: None,
            advisor: AdvisorConfig::default(),
            transport: TransportConfig::default(),
        }
    }
}

/// Devices used when none are given
pub fn demo_fleet() -> Vec<DeviceSpec> {
    vec![
        DeviceSpec {
            kind: DeviceKind::Router,
            name: "MainRouter".to_string(),
            ip: "10.0.0.1".to_string(),
        },
        DeviceSpec {
            kind: DeviceKind::Switch,
            name: "CoreSwitch".to_string(),
            ip: "10.0.0.2".to_string(),
        },
    ]
}

/// Parse a KIND:NAME:IP device declaration
///
/// The IP part may itself contain colons (IPv6).
pub fn parse_device_spec(spec: &str) -> Result<DeviceSpec> {
    let (kind, rest) = spec
        .split_once(':')
        .ok_or_else(|| NetFleetError::config(format!("Invalid device '{}': expected KIND:NAME:IP", spec)))?;
    let (name, ip) = rest
        .split_once(':')
        .ok_or_else(|| NetFleetError::config(format!("Invalid device '{}': expected KIND:NAME:IP", spec)))?;

    if name.trim().is_empty() || ip.trim().is_empty() {
        return Err(NetFleetError::config(format!(
            "Invalid device '{}': name and IP must not be empty",
            spec
        )));
    }

    Ok(DeviceSpec {
        kind: kind.parse()?,
        name: name.trim().to_string(),
        ip: ip.trim().to_string(),
    })
}

/// Parse a human-readable duration such as "5s" or "250ms"
pub fn parse_duration(value: &str) -> std::result::Result<Duration, String> {
    humantime::parse_duration(value).map_err(|e| format!("Invalid duration '{}': {}", value, e))
}

impl FleetConfig {
    /// Create config from CLI arguments
    pub fn from_cli(args: &CliArgs) -> Result<Self> {
        let mut config = Self::default();

        if !args.devices.is_empty() {
            config.devices = args
                .devices
                .iter()
                .map(|spec| parse_device_spec(spec))
                .collect::<Result<Vec<_>>>()?;
        }

        config.threads = args.threads;
        config.parallel_configure = !args.sequential;
        config.sampler_seed = args.seed;

        match &args.command {
            Some(Commands::Optimize { clusters, max_iter }) => {
                if *clusters == 0 {
                    return Err(NetFleetError::config("--clusters must be at least 1"));
                }
                config.advisor.clusters = *clusters;
                config.advisor.max_iter = *max_iter;
            }
            Some(Commands::FetchConfig {
                port,
                username,
                password,
                timeout,
                ..
            }) => {
                config.transport = TransportConfig {
                    port: *port,
                    username: username.clone(),
                    password: password.clone(),
                    timeout: *timeout,
                };
            }
            _ => {}
        }

        Ok(config)
    }

    /// Build the devices in declaration order
    pub fn build_devices(&self) -> Vec<Device> {
        self.devices.iter().map(DeviceSpec::to_device).collect()
    }

    /// Effective worker thread count
    pub fn effective_threads(&self) -> usize {
        if self.threads == 0 {
            num_cpus::get()
        } else {
            self.threads
        }
    }
}
