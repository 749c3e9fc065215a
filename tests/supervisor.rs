mod common;

use common::{fake_supervisor, fake_supervisor_probing, free_port, port_is_open, TEST_GRACE_PERIOD, TEST_POLL_INTERVAL};
use rollups_node::errors::ServiceError;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Integration tests driving the `fake-service` binary through a real supervisor

#[tokio::test]
async fn test_service_stops_when_cancelled() {
    let port = free_port();
    let supervisor = fake_supervisor("fake-service", port);
    let token = CancellationToken::new();

    let running = tokio::spawn({
        let supervisor = supervisor.clone();
        let token = token.clone();
        async move { supervisor.start(token).await }
    });

    supervisor
        .ready(token.clone(), Duration::from_secs(5))
        .await
        .expect("service never became ready");

    let cancelled_at = Instant::now();
    token.cancel();
    let result = running.await.expect("supervisor task panicked");

    assert!(result.is_ok(), "service exited for the wrong reason: {:?}", result);
    assert!(cancelled_at.elapsed() < TEST_GRACE_PERIOD, "service needed to be killed");
    assert!(!port_is_open(port).await, "listener still open after shutdown");
}

#[tokio::test]
async fn test_cancel_right_after_start() {
    let supervisor = fake_supervisor("fake-service", free_port());
    let token = CancellationToken::new();

    let running = tokio::spawn({
        let supervisor = supervisor.clone();
        let token = token.clone();
        async move { supervisor.start(token).await }
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    token.cancel();

    let result = tokio::time::timeout(TEST_GRACE_PERIOD * 2, running)
        .await
        .expect("supervisor did not return within the grace period")
        .expect("supervisor task panicked");
    assert!(result.is_ok(), "service exited for the wrong reason: {:?}", result);
}

#[tokio::test]
async fn test_ready_times_out_on_wrong_port() {
    // The probe points at a port the service never listens on.
    let supervisor = fake_supervisor_probing("fake-service", free_port(), free_port());
    let token = CancellationToken::new();

    let running = tokio::spawn({
        let supervisor = supervisor.clone();
        let token = token.clone();
        async move { supervisor.start(token).await }
    });

    let timeout = Duration::from_millis(500);
    let started = Instant::now();
    let result = supervisor.ready(token.clone(), timeout).await;
    let elapsed = started.elapsed();

    assert!(matches!(result, Err(ServiceError::ReadyTimeout { .. })), "expected timeout, got {:?}", result);
    assert!(elapsed >= timeout);
    assert!(elapsed < timeout + TEST_POLL_INTERVAL + Duration::from_millis(100));

    token.cancel();
    let result = running.await.expect("supervisor task panicked");
    assert!(result.is_ok(), "service exited for the wrong reason: {:?}", result);
}

#[tokio::test]
async fn test_ready_soon_after_delayed_bind() {
    let port = free_port();
    let supervisor = fake_supervisor("fake-service", port).with_env("FAKE_SERVICE_DELAY_MS", "50");
    let token = CancellationToken::new();

    let launched_at = Instant::now();
    let running = tokio::spawn({
        let supervisor = supervisor.clone();
        let token = token.clone();
        async move { supervisor.start(token).await }
    });

    let result = supervisor.ready(token.clone(), Duration::from_millis(500)).await;
    let elapsed = launched_at.elapsed();

    assert!(result.is_ok(), "service timed out: {:?}", result);
    assert!(elapsed >= Duration::from_millis(50));
    assert!(elapsed < Duration::from_millis(400), "ready took {:?}", elapsed);
    assert!(!running.is_finished(), "start returned while the service was running");

    token.cancel();
    let result = running.await.expect("supervisor task panicked");
    assert!(result.is_ok(), "service exited for the wrong reason: {:?}", result);
    assert!(!port_is_open(port).await);
}

#[tokio::test]
async fn test_unexpected_exit_is_reported() {
    let supervisor = fake_supervisor("fake-service", free_port())
        .with_env("FAKE_SERVICE_EXIT_AFTER_MS", "50")
        .with_env("FAKE_SERVICE_EXIT_CODE", "3");
    let token = CancellationToken::new();

    let result = tokio::time::timeout(Duration::from_secs(5), supervisor.start(token))
        .await
        .expect("start did not return after the service exited");

    match result {
        Err(ServiceError::UnexpectedExit { service, status }) => {
            assert_eq!(service, "fake-service");
            assert_eq!(status.code(), Some(3));
        }
        other => panic!("expected unexpected exit, got {:?}", other),
    }
}

#[cfg(unix)]
#[tokio::test]
async fn test_service_ignoring_sigterm_is_killed() {
    let port = free_port();
    let supervisor = fake_supervisor("stubborn-service", port).with_env("FAKE_SERVICE_IGNORE_SIGTERM", "1");
    let token = CancellationToken::new();

    let running = tokio::spawn({
        let supervisor = supervisor.clone();
        let token = token.clone();
        async move { supervisor.start(token).await }
    });

    supervisor
        .ready(token.clone(), Duration::from_secs(5))
        .await
        .expect("service never became ready");

    let cancelled_at = Instant::now();
    token.cancel();
    let result = running.await.expect("supervisor task panicked");
    let elapsed = cancelled_at.elapsed();

    assert!(result.is_ok(), "cancellation must not be reported as an error: {:?}", result);
    assert!(elapsed >= TEST_GRACE_PERIOD, "service stopped before the grace period: {:?}", elapsed);
    assert!(elapsed < TEST_GRACE_PERIOD + Duration::from_secs(2));
    assert!(!port_is_open(port).await, "killed service still listening");
}

#[tokio::test]
async fn test_concurrent_services_are_independent() {
    let ports = [free_port(), free_port(), free_port()];
    let token = CancellationToken::new();

    let supervisors: Vec<_> = ports
        .iter()
        .enumerate()
        .map(|(i, port)| fake_supervisor(&format!("fake-service-{}", i), *port))
        .collect();

    let running: Vec<_> = supervisors
        .iter()
        .cloned()
        .map(|supervisor| {
            let token = token.clone();
            tokio::spawn(async move { supervisor.start(token).await })
        })
        .collect();

    for supervisor in &supervisors {
        supervisor
            .ready(token.clone(), Duration::from_secs(5))
            .await
            .expect("service never became ready");
    }

    token.cancel();
    for handle in running {
        let result = handle.await.expect("supervisor task panicked");
        assert!(result.is_ok(), "service exited for the wrong reason: {:?}", result);
    }
    for port in ports {
        assert!(!port_is_open(port).await);
    }
}
