// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::{DEFAULT_LOG_LEVEL, DEFAULT_READY_TIMEOUT_SECS};
use crate::config::env::{to_bool, to_duration, to_log_level, EnvCache, LogLevel};
use crate::errors::ConfigError;
use std::time::Duration;

/// Settings of the node process itself.
///
/// Loaded from `CARTESI_*` variables through an [`EnvCache`]. Service-specific
/// ports are not part of this struct; they are resolved by the service registry.
///
/// # Fields
/// * `log_level` - `CARTESI_LOG_LEVEL` (`debug`, `info`, `warning`, `error`), defaults to `info`
/// * `log_enable_color` - `CARTESI_LOG_ENABLE_COLOR`, defaults to `false`
/// * `ready_timeout` - `CARTESI_NODE_READY_TIMEOUT` in seconds, defaults to 30
#[derive(Debug, Clone, PartialEq)]
pub struct NodeConfig {
    pub log_level: LogLevel,
    pub log_enable_color: bool,
    pub ready_timeout: Duration,
}

impl NodeConfig {
    pub fn load(env: &EnvCache) -> Result<Self, ConfigError> {
        Ok(Self {
            log_level: env.get("LOG_LEVEL", Some(DEFAULT_LOG_LEVEL), to_log_level)?,
            log_enable_color: env.get("LOG_ENABLE_COLOR", Some("false"), to_bool)?,
            ready_timeout: env.get("NODE_READY_TIMEOUT", Some(DEFAULT_READY_TIMEOUT_SECS), to_duration)?,
        })
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            log_enable_color: false,
            ready_timeout: Duration::from_secs(30),
        }
    }
}
