// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised while reading node and service configuration from the environment.

use thiserror::Error;

/// Errors that can occur while resolving configuration values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is not set and has no default.
    #[error("missing required {variable} env var")]
    Missing {
        /// Full variable name, including any prefix
        variable: String,
    },

    /// A variable is set but its value could not be parsed.
    #[error("invalid value {value:?} for {variable}: {reason}")]
    Invalid {
        /// Full variable name, including any prefix
        variable: String,
        /// The raw value that failed to parse
        value: String,
        /// Why the value was rejected
        reason: String,
    },

    /// A healthcheck port could not be derived from the configured value.
    #[error("invalid healthcheck port for service '{service}' in {variable}={value:?}: {reason}")]
    InvalidPort {
        /// Logical service name
        service: String,
        /// The variable the value came from
        variable: String,
        /// The raw value that failed to parse
        value: String,
        /// Why the value was rejected
        reason: String,
    },
}
