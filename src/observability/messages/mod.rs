// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for human-readable output and
//! [`StructuredLog`] for emission with typed fields. Usage pattern:
//!
//! ```rust
//! use gantry::observability::messages::component::NoOutputMessages;
//! use gantry::observability::messages::StructuredLog;
//!
//! NoOutputMessages {}.log();
//! ```

pub mod component;
pub mod config;
pub mod store;

use tracing::Span;

/// A log message with typed fields.
pub trait StructuredLog {
    /// Emit the message at its designated level with its fields attached.
    fn log(&self);

    /// A span carrying the message's fields, for wrapping the work the
    /// message describes.
    fn span(&self, name: &str) -> Span {
        tracing::info_span!("unit", span_name = name)
    }
}
