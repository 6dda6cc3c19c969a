// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for payload check-in/check-out events.

use std::fmt::{Display, Formatter};

use crate::observability::messages::StructuredLog;

/// A message crossed the offload threshold and its body was checked in.
///
/// # Log Level
/// `info!` - important operational event
pub struct MessageCheckedIn<'a> {
    pub locator: &'a str,
    pub approx_size: usize,
}

impl Display for MessageCheckedIn<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Message too large ({} bytes), checked payload in at '{}'",
            self.approx_size, self.locator
        )
    }
}

impl StructuredLog for MessageCheckedIn<'_> {
    fn log(&self) {
        tracing::info!(
            locator = self.locator,
            approx_size = self.approx_size,
            "{}", self
        );
    }
}

/// A checked-in input message was rehydrated before execution.
///
/// # Log Level
/// `info!` - important operational event
pub struct MessageCheckedOut<'a> {
    pub locator: &'a str,
}

impl Display for MessageCheckedOut<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Checked message payload out from '{}'", self.locator)
    }
}

impl StructuredLog for MessageCheckedOut<'_> {
    fn log(&self) {
        tracing::info!(locator = self.locator, "{}", self);
    }
}

/// Check-in was skipped because the message is already checked in.
///
/// # Log Level
/// `debug!` - expected on relays that forward checked-in messages
pub struct AlreadyCheckedIn {}

impl Display for AlreadyCheckedIn {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Message is already checked in, not checking in again")
    }
}

impl StructuredLog for AlreadyCheckedIn {
    fn log(&self) {
        tracing::debug!("{}", self);
    }
}
