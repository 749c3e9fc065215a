// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Healthcheck port resolution.
//!
//! Each service reads its healthcheck port from a variable derived from its
//! name: `<NAME>_HEALTHCHECK_PORT`, or `<NAME>_HTTP_SERVER_PORT` for the
//! services that expose their HTTP API directly. The state server is the
//! exception: its port is the part after the first `:` of `SS_SERVER_ADDRESS`.
//!
//! Values may be given either as a bare port (`8081`) or as `host:port`
//! (`0.0.0.0:8081`). Either way the resolver returns the port as a `u16`.

use crate::config::consts::{DEFAULT_HEALTHCHECK_PORT, DEFAULT_STATE_SERVER_PORT};
use crate::errors::ConfigError;

/// Logical name of the state server.
pub const STATE_SERVER: &str = "state-server";

/// Variable holding the state server's `host:port` address.
pub const STATE_SERVER_ADDRESS_ENV: &str = "SS_SERVER_ADDRESS";

/// Services whose healthcheck is their HTTP control API.
const HTTP_SERVER_SERVICES: [&str; 2] = ["dispatcher", "authority-claimer"];

/// Name of the variable that configures the healthcheck port of `service_name`.
pub fn healthcheck_variable(service_name: &str) -> String {
    if service_name == STATE_SERVER {
        return STATE_SERVER_ADDRESS_ENV.to_string();
    }

    let suffix = if HTTP_SERVER_SERVICES.contains(&service_name) {
        "_HTTP_SERVER_PORT"
    } else {
        "_HEALTHCHECK_PORT"
    };
    format!("{}{}", service_name.replace('-', "_").to_uppercase(), suffix)
}

/// Resolves the healthcheck port of `service_name` from the process environment.
pub fn resolve_healthcheck_port(service_name: &str) -> Result<u16, ConfigError> {
    resolve_healthcheck_port_with(service_name, |name| std::env::var(name).ok())
}

/// Resolves the healthcheck port of `service_name` using `lookup` to read variables.
///
/// Unset variables fall back to the defaults (`8080`, or `50051` for the state
/// server). A value that is set but malformed is an error.
pub fn resolve_healthcheck_port_with<F>(service_name: &str, lookup: F) -> Result<u16, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let variable = healthcheck_variable(service_name);
    let Some(value) = lookup(&variable) else {
        return Ok(if service_name == STATE_SERVER {
            DEFAULT_STATE_SERVER_PORT
        } else {
            DEFAULT_HEALTHCHECK_PORT
        });
    };

    let invalid = |reason: &str| ConfigError::InvalidPort {
        service: service_name.to_string(),
        variable: variable.clone(),
        value: value.clone(),
        reason: reason.to_string(),
    };

    let port = match value.split_once(':') {
        Some((_, port)) => port,
        None if service_name == STATE_SERVER => return Err(invalid("expected host:port")),
        None => value.as_str(),
    };

    if port.is_empty() {
        return Err(invalid("port is empty"));
    }
    port.parse::<u16>()
        .map_err(|_| invalid("port must be a number between 0 and 65535"))
}
