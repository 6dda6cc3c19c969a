// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised by source and sink adapters.
//!
//! "No messages available" is deliberately *not* an error here: sources
//! report an empty fetch through `Fetch::Empty` so callers are forced to
//! handle it as the expected outcome it is.

use thiserror::Error;

use crate::errors::CodecError;

/// Failures while fetching or acknowledging a message.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The transport handed over bytes that do not decode into a message.
    #[error("malformed message at \"{location}\": {source}")]
    MalformedMessage {
        location: String,
        source: serde_json::Error,
    },

    /// The envelope decoded structurally but violated the codec contract.
    #[error("failed to decode message from transport: {0}")]
    Decode(#[from] CodecError),

    /// An acknowledgement referenced a delivery the source does not know.
    #[error("unknown delivery receipt \"{receipt}\"")]
    UnknownReceipt { receipt: String },

    #[error("source io failure: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures while handing messages to a sink.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The transport refused the message because it exceeds its size limit.
    #[error("message of approximately {approx_size} bytes exceeds the transport limit of {limit} bytes")]
    TooLarge { approx_size: usize, limit: usize },

    /// The message could not be encoded into an envelope.
    #[error("failed to encode message for transport: {0}")]
    Encode(#[from] CodecError),

    /// The envelope could not be serialized into the transport's file/frame
    /// format.
    #[error("failed to serialize envelope: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("sink io failure: {0}")]
    Io(#[from] std::io::Error),
}
