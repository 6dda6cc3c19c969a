// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! All diagnostic and operational log output goes through message types
//! defined under [`messages`]. Each message is a struct implementing
//! `Display` plus [`messages::StructuredLog`], which:
//!
//! * keeps magic strings out of the runtime and backends
//! * attaches typed fields to every record for the JSON format
//! * gives each subsystem one place to see everything it can say
//!
//! Messages are organized by subsystem:
//! * `messages::component` - execution cycle lifecycle and lineage events
//! * `messages::store` - payload check-in/check-out events
//! * `messages::config` - configuration loading warnings

pub mod messages;

use tracing_subscriber::EnvFilter;

use crate::config::consts::DEFAULT_LOG_LEVEL;
use crate::config::{Config, LogFormat};

/// Install the global log subscriber according to configuration.
///
/// Safe to call more than once; later calls leave the first subscriber in
/// place.
pub fn init(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_level)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    let result = match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .try_init(),
        LogFormat::Txt => tracing_subscriber::fmt().with_env_filter(filter).try_init(),
    };

    if result.is_err() {
        tracing::debug!("log subscriber already installed, keeping the existing one");
    }
}
