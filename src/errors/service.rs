// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors returned by the service supervisor.
//!
//! Every variant names the service it belongs to so the orchestrator can report
//! failures without extra context. Cancellation of `start` is not an error and
//! has no variant here.

use std::process::ExitStatus;
use std::time::Duration;
use thiserror::Error;

/// Failure of a single supervised service.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The binary could not be found or spawned.
    #[error("failed to launch service '{service}' ({binary}): {source}")]
    Launch {
        service: String,
        binary: String,
        #[source]
        source: std::io::Error,
    },

    /// The child process exited while running and no cancellation was requested.
    #[error("service '{service}' exited unexpectedly: {status}")]
    UnexpectedExit { service: String, status: ExitStatus },

    /// The healthcheck port did not accept a connection in time.
    #[error("service '{service}' was not ready after {timeout:?}")]
    ReadyTimeout { service: String, timeout: Duration },

    /// The readiness wait was cancelled before the service became ready.
    #[error("readiness check for service '{service}' was cancelled")]
    Cancelled { service: String },

    /// The OS could not report the child's status.
    #[error("failed to wait for service '{service}': {source}")]
    Wait {
        service: String,
        #[source]
        source: std::io::Error,
    },
}

impl ServiceError {
    /// Name of the service this error belongs to.
    pub fn service(&self) -> &str {
        match self {
            ServiceError::Launch { service, .. }
            | ServiceError::UnexpectedExit { service, .. }
            | ServiceError::ReadyTimeout { service, .. }
            | ServiceError::Cancelled { service }
            | ServiceError::Wait { service, .. } => service,
        }
    }

    /// True when the process crashed or exited on its own while running.
    pub fn is_unexpected_exit(&self) -> bool {
        matches!(self, ServiceError::UnexpectedExit { .. })
    }
}
