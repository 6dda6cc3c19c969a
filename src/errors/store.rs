// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised by payload store adapters.

use thiserror::Error;

use crate::errors::CodecError;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Check-out was attempted on a message that was never checked in.
    /// This is a programming error in the caller, not a transport failure.
    #[error("message is not checked in to any payload store")]
    NotCheckedIn,

    /// The locator does not follow the `scheme://name/key` shape the store
    /// writes.
    #[error("malformed payload store locator \"{locator}\"")]
    MalformedLocator { locator: String },

    /// The store has no payload under the given locator.
    #[error("no payload found at locator \"{locator}\"")]
    MissingPayload { locator: String },

    /// The retrieved payload failed to rebuild into a message body.
    #[error("failed to rebuild message body after check-out: {0}")]
    Codec(#[from] CodecError),

    #[error("payload store io failure: {0}")]
    Io(#[from] std::io::Error),
}
