//! Fleet dispatch integration tests
//!
//! Exercise the dispatcher against real loopback mock devices: fan-out,
//! per-device failure isolation, fail-fast validation, idempotence.

use std::time::Instant;

use mdc_gateway::{
    Command, DeviceIndex, DeviceResult, Dispatcher, Error, FailureKind, FleetRegistry,
    InputSource, Target,
};

mod common;
use common::{
    closed_endpoint, fast_session, registry_of, spawn_acking_device, spawn_empty_reply_device,
    spawn_rejecting_device, spawn_silent_device,
};

fn index(ordinal: u16) -> DeviceIndex {
    DeviceIndex::new(ordinal).expect("ordinal must be nonzero")
}

#[tokio::test]
async fn fans_out_to_all_devices_in_order() {
    let devices = vec![
        spawn_acking_device().await,
        spawn_acking_device().await,
        spawn_acking_device().await,
    ];
    let dispatcher = Dispatcher::new(registry_of(devices), fast_session());

    let result = dispatcher.set_power(Target::All, true).await.unwrap();

    assert_eq!(result.len(), 3);
    let ordinals: Vec<u16> = result.iter().map(|(i, _)| i.get()).collect();
    assert_eq!(ordinals, vec![1, 2, 3]);
    assert!(result.iter().all(|(_, r)| r.is_ack()));
}

#[tokio::test]
async fn one_timeout_does_not_affect_siblings() {
    let devices = vec![
        spawn_acking_device().await,
        spawn_silent_device().await,
        spawn_acking_device().await,
    ];
    let dispatcher = Dispatcher::new(registry_of(devices), fast_session());

    let result = dispatcher.set_volume(Target::All, 50).await.unwrap();

    assert_eq!(result.len(), 3);
    assert!(result.get(index(1)).unwrap().is_ack());
    assert!(matches!(
        result.get(index(2)).unwrap(),
        DeviceResult::Failure {
            kind: FailureKind::Timeout,
            ..
        }
    ));
    assert!(result.get(index(3)).unwrap().is_ack());
}

#[tokio::test]
async fn stalled_devices_are_awaited_concurrently() {
    let devices = vec![
        spawn_silent_device().await,
        spawn_silent_device().await,
        spawn_silent_device().await,
    ];
    let session = fast_session();
    let dispatcher = Dispatcher::new(registry_of(devices), session);

    let start = Instant::now();
    let result = dispatcher.set_power(Target::All, false).await.unwrap();
    let elapsed = start.elapsed();

    assert_eq!(result.len(), 3);
    assert!(result
        .iter()
        .all(|(_, r)| matches!(r, DeviceResult::Failure { kind: FailureKind::Timeout, .. })));
    // Three sequential read timeouts would take >= 600ms
    assert!(
        elapsed < session.io_timeout * 2,
        "fan-out was not concurrent: {elapsed:?}"
    );
}

#[tokio::test]
async fn unreachable_device_is_a_connect_failure() {
    let devices = vec![spawn_acking_device().await, closed_endpoint().await];
    let dispatcher = Dispatcher::new(registry_of(devices), fast_session());

    let result = dispatcher.set_mute(Target::All, true).await.unwrap();

    assert!(result.get(index(1)).unwrap().is_ack());
    assert!(matches!(
        result.get(index(2)).unwrap(),
        DeviceResult::Failure {
            kind: FailureKind::Connect,
            ..
        }
    ));
}

#[tokio::test]
async fn device_nak_is_a_protocol_failure() {
    let devices = vec![spawn_rejecting_device().await];
    let dispatcher = Dispatcher::new(registry_of(devices), fast_session());

    let result = dispatcher.set_power(Target::All, true).await.unwrap();

    assert!(matches!(
        result.get(index(1)).unwrap(),
        DeviceResult::Failure {
            kind: FailureKind::Protocol,
            ..
        }
    ));
}

#[tokio::test]
async fn empty_response_is_a_protocol_failure() {
    let devices = vec![spawn_empty_reply_device().await];
    let dispatcher = Dispatcher::new(registry_of(devices), fast_session());

    let result = dispatcher.set_power(Target::All, true).await.unwrap();

    assert!(matches!(
        result.get(index(1)).unwrap(),
        DeviceResult::Failure {
            kind: FailureKind::Protocol,
            ..
        }
    ));
}

#[tokio::test]
async fn single_device_target_addresses_only_that_device() {
    let devices = vec![spawn_acking_device().await, spawn_acking_device().await];
    let dispatcher = Dispatcher::new(registry_of(devices), fast_session());

    let result = dispatcher
        .execute(&Command::Input(InputSource::Hdmi2), Target::Device(index(2)))
        .await
        .unwrap();

    assert_eq!(result.len(), 1);
    assert!(result.get(index(1)).is_none());
    assert!(result.get(index(2)).unwrap().is_ack());
}

#[tokio::test]
async fn out_of_range_target_fails_without_io() {
    let devices = vec![spawn_acking_device().await];
    let dispatcher = Dispatcher::new(registry_of(devices), fast_session());

    let err = dispatcher
        .set_power(Target::Device(index(5)), true)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::InvalidTarget(_)));
}

#[tokio::test]
async fn unknown_input_source_fails_without_io() {
    let devices = vec![spawn_acking_device().await];
    let dispatcher = Dispatcher::new(registry_of(devices), fast_session());

    let err = dispatcher.set_input(Target::All, "bogus").await.unwrap_err();

    assert!(matches!(err, Error::InvalidInputSource(_)));
}

#[tokio::test]
async fn empty_registry_yields_empty_result() {
    let dispatcher = Dispatcher::new(FleetRegistry::default(), fast_session());

    let result = dispatcher.set_power(Target::All, true).await.unwrap();

    assert!(result.is_empty());
}

#[tokio::test]
async fn repeated_dispatch_is_idempotent() {
    let devices = vec![spawn_acking_device().await, spawn_acking_device().await];
    let dispatcher = Dispatcher::new(registry_of(devices), fast_session());

    let first = dispatcher.set_power(Target::All, true).await.unwrap();
    let second = dispatcher.set_power(Target::All, true).await.unwrap();

    assert_eq!(first, second);
}
