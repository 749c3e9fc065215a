// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for supervised service lifecycle events.
//!
//! This module contains message types for logging events related to:
//! * Child process launch
//! * Readiness probing
//! * Exit, graceful termination, and forced kill
//!
//! Failures are returned to the caller as `ServiceError`, so nothing here is
//! logged above `warn!`.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::process::ExitStatus;
use std::time::Duration;
use tracing::Span;

/// Supervisor is about to spawn the service binary.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use rollups_node::observability::messages::service::ServiceLaunching;
///
/// let msg = ServiceLaunching {
///     service: "indexer",
///     binary: "cartesi-rollups-indexer",
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct ServiceLaunching<'a> {
    pub service: &'a str,
    pub binary: &'a str,
}

impl Display for ServiceLaunching<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Launching service '{}' ({})", self.service, self.binary)
    }
}

impl StructuredLog for ServiceLaunching<'_> {
    fn log(&self) {
        tracing::info!(service = self.service, binary = self.binary, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "service",
            span_name = name,
            service = self.service,
            binary = self.binary,
        )
    }
}

/// Child process is running.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ServiceStarted<'a> {
    pub service: &'a str,
    pub pid: Option<u32>,
}

impl Display for ServiceStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self.pid {
            Some(pid) => write!(f, "Service '{}' started with pid {}", self.service, pid),
            None => write!(f, "Service '{}' started", self.service),
        }
    }
}

impl StructuredLog for ServiceStarted<'_> {
    fn log(&self) {
        tracing::info!(service = self.service, pid = ?self.pid, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("service_running", span_name = name, service = self.service, pid = ?self.pid)
    }
}

/// Child process exited while nobody asked it to stop.
///
/// # Log Level
/// `debug!` - The exit is reported to the caller as an error
pub struct ServiceExited<'a> {
    pub service: &'a str,
    pub status: &'a ExitStatus,
}

impl Display for ServiceExited<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Service '{}' exited on its own: {}", self.service, self.status)
    }
}

impl StructuredLog for ServiceExited<'_> {
    fn log(&self) {
        tracing::debug!(service = self.service, status = %self.status, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("service_exited", span_name = name, service = self.service, status = %self.status)
    }
}

/// Termination requested, waiting for the child to exit.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use rollups_node::observability::messages::service::ServiceStopping;
/// use std::time::Duration;
///
/// let msg = ServiceStopping {
///     service: "dispatcher",
///     pid: Some(4242),
///     grace_period: Duration::from_secs(5),
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct ServiceStopping<'a> {
    pub service: &'a str,
    pub pid: Option<u32>,
    pub grace_period: Duration,
}

impl Display for ServiceStopping<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Stopping service '{}' (grace period {:?})",
            self.service, self.grace_period
        )
    }
}

impl StructuredLog for ServiceStopping<'_> {
    fn log(&self) {
        tracing::info!(
            service = self.service,
            pid = ?self.pid,
            grace_period_ms = self.grace_period.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "service_stopping",
            span_name = name,
            service = self.service,
            pid = ?self.pid,
            grace_period = ?self.grace_period,
        )
    }
}

/// Child ignored the termination request and was killed.
///
/// # Log Level
/// `warn!` - Service did not shut down cleanly
pub struct ServiceKilled<'a> {
    pub service: &'a str,
    pub grace_period: Duration,
}

impl Display for ServiceKilled<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Service '{}' did not exit within {:?}, killed",
            self.service, self.grace_period
        )
    }
}

impl StructuredLog for ServiceKilled<'_> {
    fn log(&self) {
        tracing::warn!(
            service = self.service,
            grace_period_ms = self.grace_period.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("service_killed", span_name = name, service = self.service)
    }
}

/// Child exited after a termination request.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ServiceStopped<'a> {
    pub service: &'a str,
    pub status: &'a ExitStatus,
    pub duration: Duration,
}

impl Display for ServiceStopped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Service '{}' stopped in {:?}: {}",
            self.service, self.duration, self.status
        )
    }
}

impl StructuredLog for ServiceStopped<'_> {
    fn log(&self) {
        tracing::info!(
            service = self.service,
            status = %self.status,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("service_stopped", span_name = name, service = self.service, status = %self.status)
    }
}

/// Healthcheck port accepted a connection.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ServiceReady<'a> {
    pub service: &'a str,
    pub port: u16,
    pub elapsed: Duration,
}

impl Display for ServiceReady<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Service '{}' is ready on port {} after {:?}",
            self.service, self.port, self.elapsed
        )
    }
}

impl StructuredLog for ServiceReady<'_> {
    fn log(&self) {
        tracing::info!(
            service = self.service,
            port = self.port,
            elapsed_ms = self.elapsed.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("service_ready", span_name = name, service = self.service, port = self.port)
    }
}

/// One readiness connection attempt failed.
///
/// # Log Level
/// `trace!` - Emitted once per polling interval
pub struct ReadinessProbeFailed<'a> {
    pub service: &'a str,
    pub port: u16,
    pub error: &'a std::io::Error,
}

impl Display for ReadinessProbeFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Service '{}' not accepting connections on port {}: {}",
            self.service, self.port, self.error
        )
    }
}

impl StructuredLog for ReadinessProbeFailed<'_> {
    fn log(&self) {
        tracing::trace!(service = self.service, port = self.port, error = %self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::trace_span!("readiness_probe", span_name = name, service = self.service, port = self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_started_without_pid() {
        let msg = ServiceStarted { service: "indexer", pid: None };
        assert_eq!(msg.to_string(), "Service 'indexer' started");
    }

    #[test]
    fn test_killed_message() {
        let msg = ServiceKilled {
            service: "dispatcher",
            grace_period: Duration::from_secs(5),
        };
        assert_eq!(msg.to_string(), "Service 'dispatcher' did not exit within 5s, killed");
    }
}
