use std::time::Duration;

/// Prefix shared by every node-level configuration variable
pub const ENV_PREFIX: &str = "CARTESI_";
/// Healthcheck port used when a service has no port variable set
pub const DEFAULT_HEALTHCHECK_PORT: u16 = 8080;
/// gRPC port of the state server when `SS_SERVER_ADDRESS` is unset
pub const DEFAULT_STATE_SERVER_PORT: u16 = 50051;
/// Time a child gets to exit after SIGTERM before it is killed
pub const DEFAULT_SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_secs(5);
/// Delay between two readiness connection attempts
pub const DEFAULT_READY_POLL_INTERVAL: Duration = Duration::from_millis(100);
/// Default readiness timeout, in seconds, for the node orchestrator
pub const DEFAULT_READY_TIMEOUT_SECS: &str = "30";
/// Default log level for the node binary
pub const DEFAULT_LOG_LEVEL: &str = "info";
