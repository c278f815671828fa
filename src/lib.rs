//! MDC Gateway - control gateway for networked MDC-style displays
//!
//! This library provides the core of the gateway:
//! - Command encoding and response decoding for the MDC wire protocol
//! - Single-use device sessions with per-phase timeouts
//! - Fleet dispatch: concurrent fan-out with per-device failure isolation
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                  Transport shim                      │
//! │        HTTP API (axum)  │  CLI (mdcgw)              │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                Fleet Dispatcher                      │
//! │   Target resolution │ Encode once │ Fan-out │ Join  │
//! └────────────────────┬────────────────────────────────┘
//!                      │ one session per device
//! ┌────────────────────▼────────────────────────────────┐
//! │              Device Sessions (TCP)                   │
//! │   connect → send frame → read frame → close         │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod fleet;
pub mod protocol;
pub mod session;

pub use config::Config;
pub use error::{Error, Result};
pub use fleet::{
    DeviceEndpoint, DeviceIndex, DeviceResult, Dispatcher, FailureKind, FleetRegistry,
    FleetResult, Target,
};
pub use protocol::{Ack, Command, InputSource};
pub use session::SessionConfig;
