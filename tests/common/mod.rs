#![allow(dead_code)]

use rollups_node::services::{ServiceDescriptor, Supervisor};
use std::time::Duration;

/// Grace period used by the tests, short enough to keep kill escalation fast.
pub const TEST_GRACE_PERIOD: Duration = Duration::from_millis(500);

/// Readiness polling interval used by the tests.
pub const TEST_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Path of the `fake-service` helper built alongside the tests.
pub fn fake_service_binary() -> &'static str {
    env!("CARGO_BIN_EXE_fake-service")
}

/// Returns a port nothing is listening on right now.
pub fn free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("failed to bind ephemeral port");
    listener.local_addr().expect("listener has no address").port()
}

/// Supervisor for a fake service that listens on `port` once started.
pub fn fake_supervisor(name: &str, port: u16) -> Supervisor {
    fake_supervisor_probing(name, port, port)
}

/// Supervisor whose readiness probe targets `probe_port` while the fake
/// service listens on `listen_port`.
pub fn fake_supervisor_probing(name: &str, probe_port: u16, listen_port: u16) -> Supervisor {
    Supervisor::new(ServiceDescriptor::new(name, fake_service_binary(), probe_port))
        .with_grace_period(TEST_GRACE_PERIOD)
        .with_poll_interval(TEST_POLL_INTERVAL)
        .with_env("FAKE_SERVICE_ADDRESS", format!("0.0.0.0:{}", listen_port))
}

/// True if something accepts TCP connections on `localhost:port`.
pub async fn port_is_open(port: u16) -> bool {
    tokio::net::TcpStream::connect(("127.0.0.1", port)).await.is_ok()
}
