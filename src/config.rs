//! Gateway configuration
//!
//! Owned by the transport side: values come from an optional TOML file
//! with `MDC_*` environment overrides. The core dispatcher receives a
//! built [`FleetRegistry`] and [`SessionConfig`] and never reads the
//! environment or files itself.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::fleet::{DeviceEndpoint, FleetRegistry};
use crate::session::SessionConfig;
use crate::{Error, Result};

/// Default device control port
pub const DEFAULT_DEVICE_PORT: u16 = 1515;

/// Default HTTP API port
pub const DEFAULT_API_PORT: u16 = 5000;

/// Default per-phase session timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 2;

/// Fallback fleet used when no devices are configured
const DEFAULT_DEVICES: &str = "192.168.1.101,192.168.1.102,192.168.1.103,192.168.1.104";

/// Gateway configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Ordered device endpoint list
    pub devices: Vec<DeviceEndpoint>,

    /// Per-session timeout bounds
    pub session: SessionConfig,

    /// Port the HTTP API listens on
    pub api_port: u16,
}

/// On-disk configuration file shape
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    /// Device list as `host` or `host:port` entries
    devices: Option<Vec<String>>,
    /// Default port for entries without one
    device_port: Option<u16>,
    connect_timeout_secs: Option<u64>,
    io_timeout_secs: Option<u64>,
    api_port: Option<u16>,
}

impl Config {
    /// Load configuration from an optional TOML file, then apply `MDC_*`
    /// environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the file cannot be read or parsed,
    /// or when a device entry or override value is malformed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) => {
                let content = std::fs::read_to_string(p).map_err(|e| {
                    Error::Config(format!("failed to read {}: {e}", p.display()))
                })?;
                toml::from_str::<ConfigFile>(&content).map_err(|e| {
                    Error::Config(format!("failed to parse {}: {e}", p.display()))
                })?
            }
            None => ConfigFile::default(),
        };

        let device_port = match env_var("MDC_DEVICE_PORT")? {
            Some(raw) => parse_number(&raw, "MDC_DEVICE_PORT")?,
            None => file.device_port.unwrap_or(DEFAULT_DEVICE_PORT),
        };

        let devices = match env_var("MDC_DEVICES")? {
            Some(raw) => parse_device_list(&raw, device_port)?,
            None => match file.devices {
                Some(entries) => parse_device_entries(&entries, device_port)?,
                None => parse_device_list(DEFAULT_DEVICES, device_port)?,
            },
        };

        let connect_timeout_secs = match env_var("MDC_CONNECT_TIMEOUT_SECS")? {
            Some(raw) => parse_number(&raw, "MDC_CONNECT_TIMEOUT_SECS")?,
            None => file.connect_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        };

        let io_timeout_secs = match env_var("MDC_IO_TIMEOUT_SECS")? {
            Some(raw) => parse_number(&raw, "MDC_IO_TIMEOUT_SECS")?,
            None => file.io_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        };

        let api_port = match env_var("MDC_API_PORT")? {
            Some(raw) => parse_number(&raw, "MDC_API_PORT")?,
            None => file.api_port.unwrap_or(DEFAULT_API_PORT),
        };

        Ok(Self {
            devices,
            session: SessionConfig {
                connect_timeout: Duration::from_secs(connect_timeout_secs),
                io_timeout: Duration::from_secs(io_timeout_secs),
            },
            api_port,
        })
    }

    /// Build the immutable registry the dispatcher consumes
    #[must_use]
    pub fn registry(&self) -> FleetRegistry {
        FleetRegistry::new(self.devices.clone())
    }
}

/// Read an environment variable, treating empty values as unset
fn env_var(name: &str) -> Result<Option<String>> {
    match std::env::var(name) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(Error::Config(format!("invalid {name}: {e}"))),
    }
}

fn parse_number<T: std::str::FromStr>(raw: &str, name: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| Error::Config(format!("invalid {name}: {raw:?}")))
}

/// Parse a comma-separated `host[:port]` device list
fn parse_device_list(raw: &str, default_port: u16) -> Result<Vec<DeviceEndpoint>> {
    let entries: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect();
    parse_device_entries(&entries, default_port)
}

fn parse_device_entries(entries: &[String], default_port: u16) -> Result<Vec<DeviceEndpoint>> {
    entries.iter().map(|e| parse_endpoint(e, default_port)).collect()
}

fn parse_endpoint(entry: &str, default_port: u16) -> Result<DeviceEndpoint> {
    let entry = entry.trim();
    if entry.is_empty() {
        return Err(Error::Config("empty device entry".to_string()));
    }
    match entry.split_once(':') {
        Some((host, port)) => {
            let port = port
                .parse()
                .map_err(|_| Error::Config(format!("invalid device port in {entry:?}")))?;
            Ok(DeviceEndpoint::new(host, port))
        }
        None => Ok(DeviceEndpoint::new(entry, default_port)),
    }
}
