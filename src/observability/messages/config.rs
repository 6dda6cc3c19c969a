// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for configuration loading warnings.

use std::fmt::{Display, Formatter};

use crate::observability::messages::StructuredLog;

/// A passthrough configuration key looks like a misspelled core option.
///
/// # Log Level
/// `warn!` - likely a typo in the deployment
pub struct UnrecognizedConfigOption<'a> {
    pub option: &'a str,
}

impl Display for UnrecognizedConfigOption<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Using unrecognised config option '{}'", self.option)
    }
}

impl StructuredLog for UnrecognizedConfigOption<'_> {
    fn log(&self) {
        tracing::warn!(option = self.option, "{}", self);
    }
}
