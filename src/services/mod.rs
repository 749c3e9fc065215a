// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod descriptor;
mod registry;
mod supervisor;

pub mod port;

pub use descriptor::ServiceDescriptor;
pub use port::{healthcheck_variable, resolve_healthcheck_port, resolve_healthcheck_port_with};
pub use registry::{ServiceRegistry, BINARY_PREFIX, VALIDATOR_SERVICES};
pub use supervisor::Supervisor;
