//! Fleet command dispatcher
//!
//! Fans one logical command out across the addressed subset of the fleet
//! and aggregates per-device outcomes into a single [`FleetResult`].
//! Device attempts are independent and run concurrently; one device's
//! failure never aborts or delays its siblings. Failure is data inside
//! the result, never an error for the whole call. Only request
//! validation (bad target, unknown input source) aborts before I/O.

use std::collections::BTreeMap;

use futures::future;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::fleet::registry::{DeviceEndpoint, DeviceIndex, FleetRegistry};
use crate::fleet::target::Target;
use crate::protocol::{Command, InputSource, response};
use crate::session::{self, SessionConfig};
use crate::{Error, Result};

/// Category of a per-device failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Device unreachable or connection refused
    Connect,
    /// No response within the configured bound
    Timeout,
    /// Payload could not be written
    Write,
    /// Response could not be read
    Read,
    /// Response was malformed or a device rejection
    Protocol,
}

/// Outcome of one command against one device
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeviceResult {
    /// The device acknowledged the command
    Ack {
        /// Raw acknowledgment frame, terminators stripped
        response: String,
    },
    /// The attempt failed; siblings are unaffected
    Failure {
        /// Failure category
        kind: FailureKind,
        /// Human-readable diagnostic
        message: String,
    },
}

impl DeviceResult {
    /// Whether this entry is an acknowledgment
    #[must_use]
    pub const fn is_ack(&self) -> bool {
        matches!(self, Self::Ack { .. })
    }

    fn from_error(error: &Error) -> Self {
        let kind = match error {
            Error::Connect(..) => FailureKind::Connect,
            Error::Timeout(..) => FailureKind::Timeout,
            Error::Write(..) => FailureKind::Write,
            Error::Read(..) => FailureKind::Read,
            _ => FailureKind::Protocol,
        };
        Self::Failure {
            kind,
            message: error.to_string(),
        }
    }
}

/// Per-device outcomes keyed by index, in registry order.
///
/// Created fresh per dispatcher call and fully populated before being
/// returned; never mutated afterwards. Serializes as a `display_N` keyed
/// map.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct FleetResult {
    entries: BTreeMap<DeviceIndex, DeviceResult>,
}

impl FleetResult {
    /// Number of devices the call addressed
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the call addressed no devices
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up the outcome for one device
    #[must_use]
    pub fn get(&self, index: DeviceIndex) -> Option<&DeviceResult> {
        self.entries.get(&index)
    }

    /// Iterate outcomes in registry order
    pub fn iter(&self) -> impl Iterator<Item = (DeviceIndex, &DeviceResult)> {
        self.entries.iter().map(|(index, result)| (*index, result))
    }
}

impl FromIterator<(DeviceIndex, DeviceResult)> for FleetResult {
    fn from_iter<I: IntoIterator<Item = (DeviceIndex, DeviceResult)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Serialize for FleetResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (index, result) in &self.entries {
            map.serialize_entry(&index.to_string(), result)?;
        }
        map.end()
    }
}

/// Fleet command dispatcher over an immutable device registry
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: FleetRegistry,
    session: SessionConfig,
}

impl Dispatcher {
    /// Create a dispatcher for the given registry and session bounds
    #[must_use]
    pub const fn new(registry: FleetRegistry, session: SessionConfig) -> Self {
        Self { registry, session }
    }

    /// The registry this dispatcher addresses
    #[must_use]
    pub const fn registry(&self) -> &FleetRegistry {
        &self.registry
    }

    /// Issue one command to the addressed devices.
    ///
    /// The command is encoded once and the identical payload sent to every
    /// resolved device concurrently. Per-device I/O and protocol failures
    /// are reported as [`DeviceResult::Failure`] entries.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTarget`] when the target index is outside
    /// the registry, before any connection is opened.
    pub async fn execute(&self, command: &Command, target: Target) -> Result<FleetResult> {
        let resolved = self.resolve(target)?;
        let payload = command.encode();

        tracing::debug!(
            command = %command,
            target = %target,
            devices = resolved.len(),
            "dispatching command"
        );

        let attempts = resolved.into_iter().map(|(index, endpoint)| {
            let payload = payload.as_slice();
            let session = &self.session;
            async move {
                let result = Self::attempt(index, endpoint, payload, session).await;
                (index, result)
            }
        });

        Ok(future::join_all(attempts).await.into_iter().collect())
    }

    /// Query per-device reachability.
    ///
    /// The wire table defines no status-read command, so status reports
    /// TCP reachability from a connect-only probe; no protocol bytes are
    /// sent and no telemetry is fabricated.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTarget`] as [`Self::execute`] does.
    pub async fn status(&self, target: Target) -> Result<FleetResult> {
        let resolved = self.resolve(target)?;

        let probes = resolved.into_iter().map(|(index, endpoint)| {
            let session = &self.session;
            async move {
                let result = match session::probe(endpoint, session).await {
                    Ok(()) => DeviceResult::Ack {
                        response: "reachable".to_string(),
                    },
                    Err(e) => {
                        tracing::warn!(device = %index, endpoint = %endpoint, error = %e, "probe failed");
                        DeviceResult::from_error(&e)
                    }
                };
                (index, result)
            }
        });

        Ok(future::join_all(probes).await.into_iter().collect())
    }

    /// Turn the addressed displays on or off.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTarget`] for an out-of-range target.
    pub async fn set_power(&self, target: Target, on: bool) -> Result<FleetResult> {
        self.execute(&Command::Power(on), target).await
    }

    /// Set the volume level; out-of-range levels are clamped to [0, 100].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTarget`] for an out-of-range target.
    pub async fn set_volume(&self, target: Target, level: i64) -> Result<FleetResult> {
        self.execute(&Command::Volume(level), target).await
    }

    /// Mute or unmute the addressed displays.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTarget`] for an out-of-range target.
    pub async fn set_mute(&self, target: Target, muted: bool) -> Result<FleetResult> {
        self.execute(&Command::Mute(muted), target).await
    }

    /// Switch the input source, given as a caller-facing name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInputSource`] for an unrecognized name and
    /// [`Error::InvalidTarget`] for an out-of-range target, both before
    /// any connection is opened.
    pub async fn set_input(&self, target: Target, source: &str) -> Result<FleetResult> {
        let source: InputSource = source.parse()?;
        self.execute(&Command::Input(source), target).await
    }

    /// One independent send-and-decode attempt against one device
    async fn attempt(
        index: DeviceIndex,
        endpoint: &DeviceEndpoint,
        payload: &[u8],
        session: &SessionConfig,
    ) -> DeviceResult {
        let raw = match session::send(endpoint, payload, session).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(device = %index, endpoint = %endpoint, error = %e, "command failed");
                return DeviceResult::from_error(&e);
            }
        };
        match response::decode(&raw) {
            Ok(ack) => DeviceResult::Ack {
                response: ack.response,
            },
            Err(e) => {
                tracing::warn!(device = %index, endpoint = %endpoint, error = %e, "bad response");
                DeviceResult::from_error(&e)
            }
        }
    }

    /// Resolve a target to (index, endpoint) pairs, failing before I/O
    fn resolve(&self, target: Target) -> Result<Vec<(DeviceIndex, &DeviceEndpoint)>> {
        match target {
            Target::All => Ok(self.registry.iter_indexed().collect()),
            Target::Device(index) => self
                .registry
                .get(index)
                .map(|endpoint| vec![(index, endpoint)])
                .ok_or_else(|| {
                    Error::InvalidTarget(format!(
                        "device {} is out of range (fleet has {} devices)",
                        index.get(),
                        self.registry.len()
                    ))
                }),
        }
    }
}
