//! Error types for the MDC gateway

use thiserror::Error;

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the MDC gateway
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid display target (bad index or selector); raised before any I/O
    #[error("invalid target: {0}")]
    InvalidTarget(String),

    /// Unrecognized input source name; raised before any I/O
    #[error("unknown input source: {0}")]
    InvalidInputSource(String),

    /// Device unreachable or connection refused
    #[error("connect to {0} failed: {1}")]
    Connect(String, String),

    /// No response from the device within the configured bound
    #[error("{0} timed out during {1}")]
    Timeout(String, &'static str),

    /// Failed to write the command payload
    #[error("write to {0} failed: {1}")]
    Write(String, String),

    /// Failed to read the device response
    #[error("read from {0} failed: {1}")]
    Read(String, String),

    /// Malformed or unexpected response bytes
    #[error("protocol error: {reason} (raw: {raw:02x?})")]
    Protocol {
        /// Why the response was rejected
        reason: String,
        /// The offending bytes, preserved for diagnostics
        raw: Vec<u8>,
    },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
