// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for node orchestration events.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// Node is launching its services.
///
/// # Log Level
/// `info!` - Important operational event
pub struct NodeStarting {
    pub service_count: usize,
}

impl Display for NodeStarting {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Starting node with {} services", self.service_count)
    }
}

impl StructuredLog for NodeStarting {
    fn log(&self) {
        tracing::info!(service_count = self.service_count, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("node", span_name = name, service_count = self.service_count)
    }
}

/// A service did not open its healthcheck port in time.
///
/// # Log Level
/// `warn!` - The service keeps running, but something may be wrong
pub struct ServiceNotReady<'a> {
    pub service: &'a str,
    pub timeout: Duration,
}

impl Display for ServiceNotReady<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Service '{}' is still not ready after {:?}",
            self.service, self.timeout
        )
    }
}

impl StructuredLog for ServiceNotReady<'_> {
    fn log(&self) {
        tracing::warn!(
            service = self.service,
            timeout_ms = self.timeout.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("service_not_ready", span_name = name, service = self.service)
    }
}

/// A service failed and the node is going down because of it.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use rollups_node::observability::messages::node::ServiceFailed;
///
/// let error = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
/// let msg = ServiceFailed {
///     service: "indexer",
///     error: &error,
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct ServiceFailed<'a> {
    pub service: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for ServiceFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Service '{}' failed: {}", self.service, self.error)
    }
}

impl StructuredLog for ServiceFailed<'_> {
    fn log(&self) {
        tracing::error!(service = self.service, error = %self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!("service_failed", span_name = name, service = self.service)
    }
}

/// Shutdown of every service has begun.
///
/// # Log Level
/// `info!` - Important operational event
pub struct NodeShuttingDown<'a> {
    pub reason: &'a str,
}

impl Display for NodeShuttingDown<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Shutting down node: {}", self.reason)
    }
}

impl StructuredLog for NodeShuttingDown<'_> {
    fn log(&self) {
        tracing::info!(reason = self.reason, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("node_shutdown", span_name = name, reason = self.reason)
    }
}

/// Every supervisor has returned.
///
/// # Log Level
/// `info!` - Important operational event
pub struct NodeStopped {
    pub uptime: Duration,
    pub failed: bool,
}

impl Display for NodeStopped {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        if self.failed {
            write!(f, "Node stopped after a service failure (uptime {:?})", self.uptime)
        } else {
            write!(f, "Node stopped (uptime {:?})", self.uptime)
        }
    }
}

impl StructuredLog for NodeStopped {
    fn log(&self) {
        tracing::info!(
            uptime_ms = self.uptime.as_millis() as u64,
            failed = self.failed,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("node_stopped", span_name = name, failed = self.failed)
    }
}
