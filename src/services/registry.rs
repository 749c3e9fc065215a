// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::ConfigError;
use crate::services::descriptor::ServiceDescriptor;
use crate::services::port::resolve_healthcheck_port_with;

/// Logical names of the services composing a validator node, in registry order.
pub const VALIDATOR_SERVICES: [&str; 7] = [
    "state-server",
    "advance-runner",
    "authority-claimer",
    "dispatcher",
    "graphql-server",
    "indexer",
    "inspect-server",
];

/// Prefix shared by every service executable.
pub const BINARY_PREFIX: &str = "cartesi-rollups-";

/// Read-only, ordered set of the services making up one node deployment.
///
/// Order is declarative only: services are started concurrently and no entry
/// waits on another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRegistry(Vec<ServiceDescriptor>);

impl ServiceRegistry {
    /// Registry over an explicit list of descriptors.
    pub fn new(descriptors: Vec<ServiceDescriptor>) -> Self {
        Self(descriptors)
    }

    /// Builds the validator registry from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the validator registry, reading port variables through `lookup`.
    ///
    /// Unset ports fall back to their defaults; only malformed values fail.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        VALIDATOR_SERVICES
            .iter()
            .map(|name| {
                let port = resolve_healthcheck_port_with(name, &lookup)?;
                Ok(ServiceDescriptor::new(*name, format!("{}{}", BINARY_PREFIX, name), port))
            })
            .collect::<Result<Vec<_>, ConfigError>>()
            .map(Self)
    }

    /// Get a descriptor by logical name
    pub fn get(&self, name: &str) -> Option<&ServiceDescriptor> {
        self.0.iter().find(|descriptor| descriptor.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ServiceDescriptor> {
        self.0.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(ServiceDescriptor::name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a ServiceRegistry {
    type Item = &'a ServiceDescriptor;
    type IntoIter = std::slice::Iter<'a, ServiceDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
