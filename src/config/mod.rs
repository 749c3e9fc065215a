// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod env;
mod node;

pub mod consts;

pub use env::{
    to_bool, to_duration, to_int, to_log_level, to_string, EnvCache, LogLevel, Parser,
};
pub use node::NodeConfig;
