// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised by the envelope codec.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    /// A fixed attribute expected on every envelope was missing.
    #[error("required attribute \"{name}\" missing from message envelope")]
    MissingAttribute { name: &'static str },

    /// The `objectType` attribute carried a tag this build does not know.
    #[error("unknown object type tag \"{tag}\"")]
    UnknownObjectType { tag: String },

    /// A structured body failed to serialize to its wire form.
    #[error("failed to serialize {object_type} body: {source}")]
    SerializeBody {
        object_type: &'static str,
        source: serde_json::Error,
    },

    /// A structured body failed to deserialize from its wire form.
    #[error("failed to deserialize {object_type} body: {source}")]
    DeserializeBody {
        object_type: &'static str,
        source: serde_json::Error,
    },
}
