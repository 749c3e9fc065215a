// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::ServiceError;
use thiserror::Error;

/// Errors that bring the whole node down.
#[derive(Error, Debug)]
pub enum NodeError {
    /// The first service failure observed before shutdown was requested.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// A supervisor task panicked or was aborted.
    #[error("supervisor task for service '{service}' failed: {source}")]
    Task {
        service: String,
        #[source]
        source: tokio::task::JoinError,
    },
}
