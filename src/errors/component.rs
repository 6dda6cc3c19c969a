// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The per-cycle error type of the component runtime.
//!
//! Apart from configuration errors (which surface at construction) every
//! failure a cycle can hit funnels into `ComponentError`. `run_once`
//! contains these per cycle; `try_run_once` propagates them for synchronous
//! invocation boundaries.

use thiserror::Error;

use crate::errors::{CodecError, ConfigError, SinkError, SourceError, StoreError};

#[derive(Debug, Error)]
pub enum ComponentError {
    /// A message was rejected by the sink for its size, even after the
    /// offload eligibility checks ran. The operator needs to configure (or
    /// lower) the offload options.
    #[error(
        "failed to send message because it is too large. Try using \
         store_destination and store_min_message_bytes to check in the body \
         of large messages before sending them"
    )]
    MessageTooLarge {
        #[source]
        source: SinkError,
    },

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Sink(SinkError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The user-supplied core function returned an error.
    #[error("core function failed: {0:#}")]
    Core(anyhow::Error),
}

// Routed by hand so the too-large case keeps its actionable message while
// every other sink failure passes through unchanged.
impl From<SinkError> for ComponentError {
    fn from(error: SinkError) -> Self {
        match error {
            SinkError::TooLarge { .. } => ComponentError::MessageTooLarge { source: error },
            other => ComponentError::Sink(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_large_sink_errors_gain_offload_guidance() {
        let error: ComponentError = SinkError::TooLarge {
            approx_size: 300_000,
            limit: 262_144,
        }
        .into();

        let text = error.to_string();
        assert!(text.contains("store_destination"));
        assert!(text.contains("store_min_message_bytes"));
        assert!(matches!(error, ComponentError::MessageTooLarge { .. }));
    }

    #[test]
    fn other_sink_errors_pass_through() {
        let error: ComponentError =
            SinkError::Io(std::io::Error::new(std::io::ErrorKind::Other, "boom")).into();
        assert!(matches!(error, ComponentError::Sink(_)));
    }
}
