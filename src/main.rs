// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::{Context, Result};
use rollups_node::config::{EnvCache, NodeConfig};
use rollups_node::node::Node;
use rollups_node::services::ServiceRegistry;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. `RUST_LOG`, when set, wins over `CARTESI_LOG_LEVEL`.
fn init_tracing(config: &NodeConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_filter()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(config.log_enable_color)
        .init();
}

/// Resolves once SIGINT or SIGTERM is received.
async fn shutdown_signal() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate = signal(SignalKind::terminate()).context("failed to install SIGTERM handler")?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => result.context("failed to listen for SIGINT")?,
            _ = terminate.recv() => {}
        }
    }

    #[cfg(not(unix))]
    tokio::signal::ctrl_c().await.context("failed to listen for Ctrl-C")?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let env = EnvCache::new();
    let config = NodeConfig::load(&env).context("invalid node configuration")?;
    init_tracing(&config);

    let registry = ServiceRegistry::from_env().context("invalid service configuration")?;
    let node = Node::new(registry, config);

    let cancellation = CancellationToken::new();
    let signal_token = cancellation.clone();
    tokio::spawn(async move {
        if let Err(error) = shutdown_signal().await {
            tracing::error!(%error, "signal handling failed, shutting down");
        }
        signal_token.cancel();
    });

    node.run(cancellation).await.context("node stopped because a service failed")?;
    Ok(())
}
