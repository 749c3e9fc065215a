// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Node orchestration: every registry entry run as one unit.
//!
//! The node starts one supervisor per service on a `JoinSet`, all sharing a
//! child of the caller's cancellation token. Readiness is watched on separate
//! tasks and only logged; it never gates or stops anything.
//!
//! The first service that fails while the node is running takes the whole node
//! down: its error is logged, the shared token is cancelled, every other
//! supervisor stops its child, and `run` returns that first error. There is no
//! restart policy here.

use crate::config::NodeConfig;
use crate::errors::{NodeError, ServiceError};
use crate::observability::messages::node::{
    NodeShuttingDown, NodeStarting, NodeStopped, ServiceFailed, ServiceNotReady,
};
use crate::observability::messages::StructuredLog;
use crate::services::{ServiceRegistry, Supervisor};
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

type SupervisorSetup = Arc<dyn Fn(Supervisor) -> Supervisor + Send + Sync>;

/// Runs every service of a registry until cancellation or the first failure.
pub struct Node {
    registry: ServiceRegistry,
    config: NodeConfig,
    setup: SupervisorSetup,
}

impl Node {
    pub fn new(registry: ServiceRegistry, config: NodeConfig) -> Self {
        Self {
            registry,
            config,
            setup: Arc::new(|supervisor| supervisor),
        }
    }

    /// Customizes each supervisor before it is started (grace period, extra env, ...).
    pub fn with_supervisor_setup<F>(mut self, setup: F) -> Self
    where
        F: Fn(Supervisor) -> Supervisor + Send + Sync + 'static,
    {
        self.setup = Arc::new(setup);
        self
    }

    pub fn registry(&self) -> &ServiceRegistry {
        &self.registry
    }

    /// Starts every service and waits for all of them to stop.
    ///
    /// Returns `Ok(())` when the node was stopped through `cancellation` and the
    /// first service failure otherwise. Dropping the returned future cancels
    /// every service as well.
    pub async fn run(&self, cancellation: CancellationToken) -> Result<(), NodeError> {
        let started = Instant::now();
        let shutdown = cancellation.child_token();
        let _stop_on_drop = shutdown.clone().drop_guard();
        let mut services = JoinSet::new();
        let mut watchers = JoinSet::new();

        NodeStarting {
            service_count: self.registry.len(),
        }
        .log();

        for descriptor in &self.registry {
            let supervisor = (self.setup)(Supervisor::new(descriptor.clone()));

            let token = shutdown.clone();
            let ready_timeout = self.config.ready_timeout;
            let watcher = supervisor.clone();
            watchers.spawn(async move { watch_readiness(watcher, token, ready_timeout).await });

            // The inner task turns a panicking supervisor into a JoinError that
            // still carries the service name.
            let token = shutdown.clone();
            let name = descriptor.name().to_string();
            services.spawn(async move {
                let outcome = tokio::spawn(async move { supervisor.start(token).await }).await;
                (name, outcome)
            });
        }

        let mut first_error: Option<NodeError> = None;
        let mut stopping = false;
        loop {
            let joined = tokio::select! {
                joined = services.join_next() => joined,
                _ = shutdown.cancelled(), if !stopping => {
                    stopping = true;
                    if first_error.is_none() {
                        NodeShuttingDown { reason: "cancellation requested" }.log();
                    }
                    continue;
                }
            };
            let Some(joined) = joined else {
                break;
            };

            let (name, error) = match joined {
                Ok((_, Ok(Ok(())))) => continue,
                Ok((name, Ok(Err(error)))) => (name, NodeError::Service(error)),
                Ok((name, Err(source))) => (
                    name.clone(),
                    NodeError::Task {
                        service: name,
                        source,
                    },
                ),
                Err(source) => (
                    "node".to_string(),
                    NodeError::Task {
                        service: "node".to_string(),
                        source,
                    },
                ),
            };

            ServiceFailed {
                service: &name,
                error: &error,
            }
            .log();

            if first_error.is_none() && !shutdown.is_cancelled() {
                NodeShuttingDown {
                    reason: "a service failed",
                }
                .log();
                stopping = true;
                shutdown.cancel();
            }
            first_error.get_or_insert(error);
        }

        shutdown.cancel();
        while watchers.join_next().await.is_some() {}

        NodeStopped {
            uptime: started.elapsed(),
            failed: first_error.is_some(),
        }
        .log();

        match first_error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

/// Logs a warning if the service is not ready in time. Success is logged by
/// the supervisor and cancellation means the node is already stopping.
async fn watch_readiness(supervisor: Supervisor, token: CancellationToken, timeout: std::time::Duration) {
    if let Err(ServiceError::ReadyTimeout { service, timeout }) = supervisor.ready(token, timeout).await {
        ServiceNotReady {
            service: &service,
            timeout,
        }
        .log();
    }
}
