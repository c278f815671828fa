//! Fleet addressing and command dispatch

pub mod dispatcher;
pub mod registry;
pub mod target;

pub use dispatcher::{DeviceResult, Dispatcher, FailureKind, FleetResult};
pub use registry::{DeviceEndpoint, DeviceIndex, FleetRegistry};
pub use target::Target;
