// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Child process supervision for a single service.
//!
//! A [`Supervisor`] knows how to launch one service binary, how to tell when it
//! is ready, and how to stop it. It holds no process handle between calls: the
//! handle lives inside [`Supervisor::start`] for exactly as long as the child
//! runs.
//!
//! # Lifecycle
//!
//! ```text
//! NotStarted -> Starting -> Running -> Exited                  (child exits on its own)
//!                                   -> Stopping -> Stopped      (token cancelled)
//!                                      Stopping -> killed -> Stopped   (grace period expired)
//! ```
//!
//! # Cancellation
//!
//! Both operations take a `CancellationToken`. Cancelling it makes `start` send
//! SIGTERM to the child and wait up to the grace period before sending SIGKILL.
//! `start` reports a cancelled shutdown as success. `ready` returns
//! [`ServiceError::Cancelled`] instead of polling further.
//!
//! # Example
//!
//! ```no_run
//! use rollups_node::services::{ServiceDescriptor, Supervisor};
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> Result<(), rollups_node::errors::ServiceError> {
//! let supervisor = Supervisor::new(ServiceDescriptor::new(
//!     "indexer",
//!     "cartesi-rollups-indexer",
//!     8080,
//! ));
//! let token = CancellationToken::new();
//!
//! let running = tokio::spawn({
//!     let supervisor = supervisor.clone();
//!     let token = token.clone();
//!     async move { supervisor.start(token).await }
//! });
//!
//! supervisor.ready(token.clone(), Duration::from_secs(10)).await?;
//! token.cancel();
//! running.await.expect("supervisor task panicked")?;
//! # Ok(())
//! # }
//! ```

use crate::config::consts::{DEFAULT_READY_POLL_INTERVAL, DEFAULT_SHUTDOWN_GRACE_PERIOD};
use crate::errors::ServiceError;
use crate::observability::messages::service::{
    ReadinessProbeFailed, ServiceExited, ServiceKilled, ServiceLaunching, ServiceReady,
    ServiceStarted, ServiceStopped, ServiceStopping,
};
use crate::observability::messages::StructuredLog;
use crate::services::descriptor::ServiceDescriptor;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::process::{Child, Command};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

/// Host probed by [`Supervisor::ready`].
const READY_HOST: &str = "localhost";

/// Starts, probes, and stops one service.
///
/// Cloning is cheap and gives an independent supervisor for the same service,
/// which is how `start` and `ready` are usually driven from separate tasks.
#[derive(Debug, Clone)]
pub struct Supervisor {
    descriptor: ServiceDescriptor,
    grace_period: Duration,
    poll_interval: Duration,
    env: Vec<(String, String)>,
}

/// Live child process owned by one `start` call.
struct ServiceRuntime<'a> {
    service: &'a str,
    child: Child,
    pid: Option<u32>,
}

impl Supervisor {
    pub fn new(descriptor: ServiceDescriptor) -> Self {
        Self {
            descriptor,
            grace_period: DEFAULT_SHUTDOWN_GRACE_PERIOD,
            poll_interval: DEFAULT_READY_POLL_INTERVAL,
            env: Vec::new(),
        }
    }

    /// Time the child gets to exit after SIGTERM before it is killed.
    pub fn with_grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = grace_period;
        self
    }

    /// Delay between readiness connection attempts.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Adds a variable to the child's environment, on top of the inherited one.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn descriptor(&self) -> &ServiceDescriptor {
        &self.descriptor
    }

    pub fn grace_period(&self) -> Duration {
        self.grace_period
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Runs the service until it exits or `cancellation` fires.
    ///
    /// Returns `Ok(())` when the child stopped because of cancellation, even if
    /// it had to be killed. Returns [`ServiceError::Launch`] if the binary could
    /// not be spawned and [`ServiceError::UnexpectedExit`] if the child exited
    /// on its own.
    pub async fn start(&self, cancellation: CancellationToken) -> Result<(), ServiceError> {
        let launching = ServiceLaunching {
            service: self.descriptor.name(),
            binary: self.descriptor.binary_name(),
        };
        let span = launching.span("start");
        launching.log();

        self.run(cancellation).instrument(span).await
    }

    async fn run(&self, cancellation: CancellationToken) -> Result<(), ServiceError> {
        let mut runtime = self.launch()?;

        tokio::select! {
            status = runtime.child.wait() => {
                let status = status.map_err(|source| self.wait_error(source))?;
                // A child that dies together with the node (e.g. SIGINT sent to
                // the whole process group) is part of the requested shutdown.
                if cancellation.is_cancelled() {
                    return Ok(());
                }
                ServiceExited { service: runtime.service, status: &status }.log();
                Err(ServiceError::UnexpectedExit {
                    service: self.descriptor.name().to_string(),
                    status,
                })
            }
            _ = cancellation.cancelled() => {
                runtime.terminate(self.grace_period).await.map_err(|source| self.wait_error(source))?;
                Ok(())
            }
        }
    }

    /// Waits until the healthcheck port accepts a TCP connection.
    ///
    /// Fails with [`ServiceError::ReadyTimeout`] once `timeout` has elapsed and
    /// with [`ServiceError::Cancelled`] if `cancellation` fires first. Never
    /// touches the service process.
    pub async fn ready(&self, cancellation: CancellationToken, timeout: Duration) -> Result<(), ServiceError> {
        let service = self.descriptor.name();
        let port = self.descriptor.healthcheck_port();
        let started = Instant::now();
        let deadline = started + timeout;

        loop {
            tokio::select! {
                biased;
                _ = cancellation.cancelled() => return Err(self.cancelled()),
                _ = tokio::time::sleep_until(deadline) => return Err(self.ready_timeout(timeout)),
                connected = TcpStream::connect((READY_HOST, port)) => match connected {
                    Ok(_) => {
                        ServiceReady { service, port, elapsed: started.elapsed() }.log();
                        return Ok(());
                    }
                    Err(error) => ReadinessProbeFailed { service, port, error: &error }.log(),
                },
            }

            tokio::select! {
                biased;
                _ = cancellation.cancelled() => return Err(self.cancelled()),
                _ = tokio::time::sleep_until(deadline) => return Err(self.ready_timeout(timeout)),
                _ = tokio::time::sleep(self.poll_interval) => {}
            }
        }
    }

    fn launch(&self) -> Result<ServiceRuntime<'_>, ServiceError> {
        let child = Command::new(self.descriptor.binary_name())
            .envs(self.env.iter().map(|(key, value)| (key.as_str(), value.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ServiceError::Launch {
                service: self.descriptor.name().to_string(),
                binary: self.descriptor.binary_name().to_string(),
                source,
            })?;

        let pid = child.id();
        ServiceStarted { service: self.descriptor.name(), pid }.log();

        Ok(ServiceRuntime {
            service: self.descriptor.name(),
            child,
            pid,
        })
    }

    fn wait_error(&self, source: std::io::Error) -> ServiceError {
        ServiceError::Wait {
            service: self.descriptor.name().to_string(),
            source,
        }
    }

    fn cancelled(&self) -> ServiceError {
        ServiceError::Cancelled {
            service: self.descriptor.name().to_string(),
        }
    }

    fn ready_timeout(&self, timeout: Duration) -> ServiceError {
        ServiceError::ReadyTimeout {
            service: self.descriptor.name().to_string(),
            timeout,
        }
    }
}

impl ServiceRuntime<'_> {
    /// SIGTERM, then SIGKILL if the child outlives `grace_period`.
    async fn terminate(mut self, grace_period: Duration) -> std::io::Result<ExitStatus> {
        let stopping = Instant::now();
        ServiceStopping {
            service: self.service,
            pid: self.pid,
            grace_period,
        }
        .log();

        if let Err(error) = self.request_shutdown() {
            // The child is already gone; the wait below collects its status.
            tracing::debug!(service = self.service, %error, "termination signal not delivered");
        }

        let status = match tokio::time::timeout(grace_period, self.child.wait()).await {
            Ok(status) => status?,
            Err(_) => {
                ServiceKilled {
                    service: self.service,
                    grace_period,
                }
                .log();
                self.child.kill().await?;
                self.child.wait().await?
            }
        };

        ServiceStopped {
            service: self.service,
            status: &status,
            duration: stopping.elapsed(),
        }
        .log();
        Ok(status)
    }

    #[cfg(unix)]
    fn request_shutdown(&mut self) -> std::io::Result<()> {
        use nix::sys::signal::{kill, Signal};
        use nix::unistd::Pid;

        match self.child.id() {
            Some(pid) => kill(Pid::from_raw(pid as i32), Signal::SIGTERM).map_err(std::io::Error::from),
            None => Ok(()),
        }
    }

    #[cfg(not(unix))]
    fn request_shutdown(&mut self) -> std::io::Result<()> {
        self.child.start_kill()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn supervisor(binary: &str, port: u16) -> Supervisor {
        Supervisor::new(ServiceDescriptor::new("test-service", binary, port))
            .with_poll_interval(Duration::from_millis(50))
    }

    fn unused_port() -> u16 {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    }

    #[test]
    fn test_defaults() {
        let supervisor = Supervisor::new(ServiceDescriptor::new("indexer", "cartesi-rollups-indexer", 8080));
        assert_eq!(supervisor.grace_period(), DEFAULT_SHUTDOWN_GRACE_PERIOD);
        assert_eq!(supervisor.poll_interval(), DEFAULT_READY_POLL_INTERVAL);
        assert_eq!(supervisor.descriptor().healthcheck_port(), 8080);
    }

    #[tokio::test]
    async fn test_missing_binary_is_launch_error() {
        let supervisor = supervisor("cartesi-rollups-this-binary-does-not-exist", 8080);
        let token = CancellationToken::new();

        match supervisor.start(token).await {
            Err(ServiceError::Launch { service, binary, .. }) => {
                assert_eq!(service, "test-service");
                assert_eq!(binary, "cartesi-rollups-this-binary-does-not-exist");
            }
            other => panic!("expected launch error, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_process_exiting_on_its_own_is_unexpected() {
        let supervisor = supervisor("true", 8080);
        let token = CancellationToken::new();

        let err = supervisor.start(token).await.unwrap_err();
        assert!(err.is_unexpected_exit(), "got {:?}", err);
        assert_eq!(err.service(), "test-service");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_process_reports_exit_status() {
        let supervisor = supervisor("false", 8080);
        let token = CancellationToken::new();

        match supervisor.start(token).await {
            Err(ServiceError::UnexpectedExit { status, .. }) => assert_eq!(status.code(), Some(1)),
            other => panic!("expected unexpected exit, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_ready_times_out_without_listener() {
        let supervisor = supervisor("unused", unused_port());
        let token = CancellationToken::new();
        let timeout = Duration::from_millis(300);

        let started = std::time::Instant::now();
        let result = supervisor.ready(token, timeout).await;
        let elapsed = started.elapsed();

        assert!(matches!(result, Err(ServiceError::ReadyTimeout { .. })), "got {:?}", result);
        assert!(elapsed >= timeout, "returned early after {:?}", elapsed);
        assert!(
            elapsed < timeout + supervisor.poll_interval() + Duration::from_millis(100),
            "returned late after {:?}",
            elapsed
        );
    }

    #[tokio::test]
    async fn test_ready_is_cancellable() {
        let supervisor = supervisor("unused", unused_port());
        let token = CancellationToken::new();

        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            canceller.cancel();
        });

        let started = std::time::Instant::now();
        let result = supervisor.ready(token, Duration::from_secs(10)).await;

        assert!(matches!(result, Err(ServiceError::Cancelled { .. })), "got {:?}", result);
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_ready_with_listener() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let supervisor = supervisor("unused", port);

        let result = supervisor
            .ready(CancellationToken::new(), Duration::from_secs(2))
            .await;
        assert!(result.is_ok(), "got {:?}", result);
    }

    #[tokio::test]
    async fn test_ready_after_late_bind() {
        let port = unused_port();
        let supervisor = supervisor("unused", port);

        let binder = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(150)).await;
            let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await.unwrap();
            tokio::time::sleep(Duration::from_secs(2)).await;
            drop(listener);
        });

        let started = std::time::Instant::now();
        let result = supervisor
            .ready(CancellationToken::new(), Duration::from_secs(2))
            .await;
        let elapsed = started.elapsed();

        assert!(result.is_ok(), "got {:?}", result);
        assert!(elapsed >= Duration::from_millis(150));
        assert!(elapsed < Duration::from_millis(150) + supervisor.poll_interval() + Duration::from_millis(250));
        binder.abort();
    }
}
