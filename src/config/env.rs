// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Cached, typed access to `CARTESI_*` environment variables.
//!
//! Every variable is read at most once. The first value observed (or the default
//! applied when the variable is unset) is kept in the cache, so every component
//! of the node sees the same configuration even if the process environment
//! changes later.
//!
//! # Example
//! ```
//! use rollups_node::config::{to_int, EnvCache};
//!
//! let env = EnvCache::with_lookup(|name| {
//!     (name == "CARTESI_WORKERS").then(|| "4".to_string())
//! });
//!
//! assert_eq!(env.get("WORKERS", None, to_int).unwrap(), 4);
//! ```

use crate::config::consts::ENV_PREFIX;
use crate::errors::ConfigError;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// Parsing function for one configuration value.
pub type Parser<T> = fn(&str) -> Result<T, String>;

type Lookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Severity threshold for the node's logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`.
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
        };
        f.write_str(name)
    }
}

pub fn to_bool(s: &str) -> Result<bool, String> {
    match s {
        "true" | "TRUE" | "True" | "1" | "t" | "T" => Ok(true),
        "false" | "FALSE" | "False" | "0" | "f" | "F" => Ok(false),
        _ => Err(format!("invalid boolean \"{}\"", s)),
    }
}

pub fn to_int(s: &str) -> Result<i64, String> {
    s.parse::<i64>().map_err(|e| e.to_string())
}

pub fn to_string(s: &str) -> Result<String, String> {
    Ok(s.to_string())
}

/// Durations are expressed in seconds, integral or fractional.
pub fn to_duration(s: &str) -> Result<Duration, String> {
    let seconds = s
        .parse::<f64>()
        .map_err(|_| format!("invalid duration \"{}\"", s))?;
    Duration::try_from_secs_f64(seconds).map_err(|e| format!("invalid duration \"{}\": {}", s, e))
}

pub fn to_log_level(s: &str) -> Result<LogLevel, String> {
    match s {
        "debug" => Ok(LogLevel::Debug),
        "info" => Ok(LogLevel::Info),
        "warning" => Ok(LogLevel::Warning),
        "error" => Ok(LogLevel::Error),
        _ => Err(format!("invalid log level \"{}\"", s)),
    }
}

/// Internally synchronized cache of configuration values.
///
/// Names passed to the accessors are unprefixed (`LOG_LEVEL`); the cache looks
/// up `CARTESI_LOG_LEVEL` in the underlying source.
pub struct EnvCache {
    lookup: Lookup,
    values: Mutex<HashMap<String, String>>,
}

impl EnvCache {
    /// Cache backed by the process environment.
    pub fn new() -> Self {
        Self::with_lookup(|name| std::env::var(name).ok())
    }

    /// Cache backed by an arbitrary variable source.
    pub fn with_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            lookup: Box::new(lookup),
            values: Mutex::new(HashMap::new()),
        }
    }

    fn values(&self) -> MutexGuard<'_, HashMap<String, String>> {
        // The map is never left half-updated, so a poisoned lock is still usable.
        self.values.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Returns the raw value of a variable, loading it into the cache on first use.
    pub fn read(&self, name: &str) -> Option<String> {
        let mut values = self.values();
        if let Some(value) = values.get(name) {
            return Some(value.clone());
        }
        let value = (self.lookup)(&format!("{}{}", ENV_PREFIX, name))?;
        values.insert(name.to_string(), value.clone());
        Some(value)
    }

    /// Returns `None` when the variable is unset and has no default.
    ///
    /// A default that gets applied is stored in the cache like a real value.
    pub fn get_optional<T>(
        &self,
        name: &str,
        default: Option<&str>,
        parser: Parser<T>,
    ) -> Result<Option<T>, ConfigError> {
        if let Some(value) = self.read(name) {
            return parse(name, &value, parser).map(Some);
        }

        match default {
            Some(default) => {
                self.values().insert(name.to_string(), default.to_string());
                parse(name, default, parser).map(Some)
            }
            None => Ok(None),
        }
    }

    /// Same as [`EnvCache::get_optional`], but a missing value is an error.
    pub fn get<T>(
        &self,
        name: &str,
        default: Option<&str>,
        parser: Parser<T>,
    ) -> Result<T, ConfigError> {
        self.get_optional(name, default, parser)?
            .ok_or_else(|| ConfigError::Missing {
                variable: format!("{}{}", ENV_PREFIX, name),
            })
    }

    /// Copy of every cached value, keyed by unprefixed name.
    pub fn snapshot(&self) -> HashMap<String, String> {
        self.values().clone()
    }
}

impl Default for EnvCache {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EnvCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvCache")
            .field("cached", &self.values().len())
            .finish()
    }
}

fn parse<T>(name: &str, value: &str, parser: Parser<T>) -> Result<T, ConfigError> {
    parser(value).map_err(|reason| ConfigError::Invalid {
        variable: format!("{}{}", ENV_PREFIX, name),
        value: value.to_string(),
        reason,
    })
}
