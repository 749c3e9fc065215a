// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Stand-in for a node service, used by the integration tests.
//!
//! Behaviour is driven by environment variables:
//! * `FAKE_SERVICE_ADDRESS` - address to listen on (no listener when unset)
//! * `FAKE_SERVICE_DELAY_MS` - wait before binding the listener
//! * `FAKE_SERVICE_EXIT_AFTER_MS` - exit on its own after this long
//! * `FAKE_SERVICE_EXIT_CODE` - exit code used with `FAKE_SERVICE_EXIT_AFTER_MS` (default 1)
//! * `FAKE_SERVICE_IGNORE_SIGTERM` - set to `1` to survive SIGTERM

use anyhow::{Context, Result};
use std::time::Duration;
use tokio::net::TcpListener;

fn env_millis(name: &str) -> Result<Option<Duration>> {
    std::env::var(name)
        .ok()
        .map(|value| {
            value
                .parse::<u64>()
                .map(Duration::from_millis)
                .with_context(|| format!("invalid {}", name))
        })
        .transpose()
}

#[cfg(unix)]
fn ignore_sigterm() -> Result<()> {
    use nix::sys::signal::{signal, SigHandler, Signal};

    // SAFETY: installs SIG_IGN, which runs no handler code.
    unsafe { signal(Signal::SIGTERM, SigHandler::SigIgn) }.context("failed to ignore SIGTERM")?;
    Ok(())
}

#[cfg(not(unix))]
fn ignore_sigterm() -> Result<()> {
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    if std::env::var("FAKE_SERVICE_IGNORE_SIGTERM").as_deref() == Ok("1") {
        ignore_sigterm()?;
    }

    if let Some(after) = env_millis("FAKE_SERVICE_EXIT_AFTER_MS")? {
        let code = std::env::var("FAKE_SERVICE_EXIT_CODE")
            .ok()
            .and_then(|code| code.parse::<i32>().ok())
            .unwrap_or(1);
        tokio::spawn(async move {
            tokio::time::sleep(after).await;
            std::process::exit(code);
        });
    }

    if let Some(delay) = env_millis("FAKE_SERVICE_DELAY_MS")? {
        tokio::time::sleep(delay).await;
    }

    let Ok(address) = std::env::var("FAKE_SERVICE_ADDRESS") else {
        std::future::pending::<()>().await;
        return Ok(());
    };

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {}", address))?;
    loop {
        // Connections are accepted and dropped; only reachability matters.
        let _ = listener.accept().await?;
    }
}
