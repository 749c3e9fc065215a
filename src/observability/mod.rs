// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! This module provides centralized message types for diagnostic and operational
//! logging throughout the node. Message types follow a struct-based pattern with
//! `Display` implementations so log text lives in one place instead of being
//! scattered through the supervisor and orchestrator.
//!
//! # Usage
//!
//! ```rust
//! use rollups_node::observability::messages::service::ServiceReady;
//! use rollups_node::observability::messages::StructuredLog;
//! use std::time::Duration;
//!
//! let msg = ServiceReady {
//!     service: "dispatcher",
//!     port: 8080,
//!     elapsed: Duration::from_millis(120),
//! };
//!
//! msg.log();
//! ```

pub mod messages;
