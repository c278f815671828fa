//! Fleet registry: the ordered list of managed display endpoints

use std::fmt;

use serde::{Deserialize, Serialize};

/// Network address of one display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceEndpoint {
    /// Host name or IP address
    pub host: String,
    /// TCP control port
    pub port: u16,
}

impl DeviceEndpoint {
    /// Create an endpoint from host and port
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for DeviceEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// 1-based ordinal position of a device within the registry.
///
/// Used purely for addressing, not identity: two registry loads may
/// assign the same index to different physical devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeviceIndex(u16);

impl DeviceIndex {
    /// Create an index from a 1-based ordinal.
    ///
    /// Returns `None` for zero, which is never a valid device position.
    #[must_use]
    pub const fn new(ordinal: u16) -> Option<Self> {
        if ordinal == 0 { None } else { Some(Self(ordinal)) }
    }

    /// The 1-based ordinal value
    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }
}

impl fmt::Display for DeviceIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "display_{}", self.0)
    }
}

/// Immutable ordered sequence of device endpoints
#[derive(Debug, Clone, Default)]
pub struct FleetRegistry {
    devices: Vec<DeviceEndpoint>,
}

impl FleetRegistry {
    /// Build a registry from an ordered endpoint list
    #[must_use]
    pub const fn new(devices: Vec<DeviceEndpoint>) -> Self {
        Self { devices }
    }

    /// Number of registered devices
    #[must_use]
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Whether the registry holds no devices
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Look up the endpoint at a 1-based index
    #[must_use]
    pub fn get(&self, index: DeviceIndex) -> Option<&DeviceEndpoint> {
        self.devices.get(usize::from(index.get()) - 1)
    }

    /// Iterate endpoints paired with their 1-based indices, in order
    pub fn iter_indexed(&self) -> impl Iterator<Item = (DeviceIndex, &DeviceEndpoint)> {
        self.devices.iter().enumerate().map(|(i, endpoint)| {
            let ordinal = u16::try_from(i + 1).unwrap_or(u16::MAX);
            (DeviceIndex(ordinal), endpoint)
        })
    }
}
