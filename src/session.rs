//! Single-use device sessions
//!
//! One session is one connect-send-receive-close cycle against one
//! display. Sessions are never pooled or reused; device command rates are
//! low and the protocol expects a fresh connection per request. The
//! connection is scoped to the call and closed on every exit path.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::fleet::DeviceEndpoint;
use crate::{Error, Result};

/// Largest response frame a device is expected to produce
const MAX_RESPONSE_BYTES: usize = 1024;

/// Per-session timeout bounds
#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    /// Bound on establishing the TCP connection
    pub connect_timeout: Duration,
    /// Bound on each of the write and read phases
    pub io_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(2),
            io_timeout: Duration::from_secs(2),
        }
    }
}

/// Send one framed command and read the framed response.
///
/// # Errors
///
/// Returns [`Error::Connect`] when the device is unreachable or refuses
/// the connection, [`Error::Timeout`] when any phase exceeds its bound,
/// and [`Error::Write`]/[`Error::Read`] for mid-stream I/O failures.
pub async fn send(
    endpoint: &DeviceEndpoint,
    payload: &[u8],
    config: &SessionConfig,
) -> Result<Vec<u8>> {
    let mut stream = connect(endpoint, config).await?;

    timeout(config.io_timeout, stream.write_all(payload))
        .await
        .map_err(|_| Error::Timeout(endpoint.to_string(), "write"))?
        .map_err(|e| Error::Write(endpoint.to_string(), e.to_string()))?;

    let raw = timeout(config.io_timeout, read_frame(&mut stream))
        .await
        .map_err(|_| Error::Timeout(endpoint.to_string(), "read"))?
        .map_err(|e| Error::Read(endpoint.to_string(), e.to_string()))?;

    tracing::trace!(endpoint = %endpoint, bytes = raw.len(), "response received");
    Ok(raw)
}

/// Connect-only reachability check, used by the fleet status query.
///
/// No protocol bytes are written; the connection is opened and dropped.
///
/// # Errors
///
/// Returns [`Error::Connect`] or [`Error::Timeout`] as [`send`] does.
pub async fn probe(endpoint: &DeviceEndpoint, config: &SessionConfig) -> Result<()> {
    connect(endpoint, config).await.map(drop)
}

async fn connect(endpoint: &DeviceEndpoint, config: &SessionConfig) -> Result<TcpStream> {
    timeout(
        config.connect_timeout,
        TcpStream::connect((endpoint.host.as_str(), endpoint.port)),
    )
    .await
    .map_err(|_| Error::Timeout(endpoint.to_string(), "connect"))?
    .map_err(|e| Error::Connect(endpoint.to_string(), e.to_string()))
}

/// Read until the `\r` frame terminator, EOF, or the response size cap
async fn read_frame(stream: &mut TcpStream) -> std::io::Result<Vec<u8>> {
    let mut frame = Vec::new();
    let mut chunk = [0u8; 256];
    loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        frame.extend_from_slice(&chunk[..n]);
        if chunk[..n].contains(&b'\r') || frame.len() >= MAX_RESPONSE_BYTES {
            break;
        }
    }
    Ok(frame)
}
