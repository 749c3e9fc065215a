// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;

/// Immutable identity of one supervisable service.
///
/// # Fields
/// * `name` - Logical identifier, used in logs and for port lookup (e.g. `dispatcher`)
/// * `binary_name` - Executable looked up on `PATH`; a path is used as-is
/// * `healthcheck_port` - TCP port probed on `localhost` for readiness
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceDescriptor {
    name: String,
    binary_name: String,
    healthcheck_port: u16,
}

impl ServiceDescriptor {
    pub fn new(name: impl Into<String>, binary_name: impl Into<String>, healthcheck_port: u16) -> Self {
        Self {
            name: name.into(),
            binary_name: binary_name.into(),
            healthcheck_port,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn binary_name(&self) -> &str {
        &self.binary_name
    }

    pub fn healthcheck_port(&self) -> u16 {
        self.healthcheck_port
    }
}

impl fmt::Display for ServiceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, healthcheck port {})", self.name, self.binary_name, self.healthcheck_port)
    }
}
