// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod config;     // env-backed node settings
pub mod errors;     // error handling
pub mod node;       // orchestration of all services
pub mod observability;
pub mod services;   // descriptors, registry, supervisor
