//! Shared test utilities: mock display devices
//!
//! Mock devices are real TCP listeners on loopback ports. Each variant
//! models one failure mode the dispatcher must isolate.

#![allow(dead_code)]

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use mdc_gateway::{DeviceEndpoint, FleetRegistry, SessionConfig};

/// Session bounds tight enough to keep timeout tests fast
#[must_use]
pub fn fast_session() -> SessionConfig {
    SessionConfig {
        connect_timeout: Duration::from_millis(500),
        io_timeout: Duration::from_millis(200),
    }
}

/// Build a registry from endpoints, preserving order
#[must_use]
pub fn registry_of(endpoints: Vec<DeviceEndpoint>) -> FleetRegistry {
    FleetRegistry::new(endpoints)
}

fn endpoint_of(listener: &TcpListener) -> DeviceEndpoint {
    let addr = listener.local_addr().expect("listener has no local addr");
    DeviceEndpoint::new(addr.ip().to_string(), addr.port())
}

/// Spawn a mock display that acks every command with `a 00 OK01\r`
pub async fn spawn_acking_device() -> DeviceEndpoint {
    spawn_device(|command| Some(format!("{} 00 OK01\r", command_group(&command)))).await
}

/// Spawn a mock display that rejects every command with an NG frame
pub async fn spawn_rejecting_device() -> DeviceEndpoint {
    spawn_device(|command| Some(format!("{} 00 NG\r", command_group(&command)))).await
}

/// Spawn a mock display that closes the connection without responding
pub async fn spawn_empty_reply_device() -> DeviceEndpoint {
    spawn_device(|_| None).await
}

/// Spawn a mock display that accepts connections but never responds
pub async fn spawn_silent_device() -> DeviceEndpoint {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let endpoint = endpoint_of(&listener);
    tokio::spawn(async move {
        loop {
            let Ok((mut sock, _)) = listener.accept().await else {
                return;
            };
            tokio::spawn(async move {
                let mut buf = [0u8; 64];
                let _ = sock.read(&mut buf).await;
                tokio::time::sleep(Duration::from_secs(30)).await;
            });
        }
    });
    endpoint
}

/// An endpoint whose port was bound and released, so connecting is refused
pub async fn closed_endpoint() -> DeviceEndpoint {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let endpoint = endpoint_of(&listener);
    drop(listener);
    endpoint
}

/// Echo the ack group letter of a received command frame
fn command_group(command: &str) -> char {
    command.chars().next().map_or('a', |c| match c {
        'k' | 'x' => command.chars().nth(1).unwrap_or('a'),
        other => other,
    })
}

async fn spawn_device<F>(respond: F) -> DeviceEndpoint
where
    F: Fn(String) -> Option<String> + Send + Sync + Copy + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let endpoint = endpoint_of(&listener);
    tokio::spawn(async move {
        loop {
            let Ok((mut sock, _)) = listener.accept().await else {
                return;
            };
            tokio::spawn(async move {
                let mut buf = [0u8; 64];
                let Ok(n) = sock.read(&mut buf).await else {
                    return;
                };
                let command = String::from_utf8_lossy(&buf[..n]).into_owned();
                if let Some(reply) = respond(command) {
                    let _ = sock.write_all(reply.as_bytes()).await;
                }
            });
        }
    });
    endpoint
}
