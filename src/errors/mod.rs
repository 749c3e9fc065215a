// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod config;
mod node;
mod service;

pub use config::ConfigError;
pub use node::NodeError;
pub use service::ServiceError;
