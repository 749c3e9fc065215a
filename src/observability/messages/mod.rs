// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Messages are organized by subsystem:
//!
//! * `service` - child process lifecycle and readiness, emitted by the supervisor
//! * `node` - orchestration events covering the whole set of services

use tracing::Span;

pub mod node;
pub mod service;

/// A message that knows its own level and structured fields.
///
/// `log` emits the message as a single event; `span` opens a span carrying the
/// same fields so nested events inherit them.
pub trait StructuredLog {
    fn log(&self);

    fn span(&self, name: &str) -> Span;
}
