use async_trait::async_trait;

use crate::errors::SinkError;
use crate::messages::Message;

/// Where a component's output goes.
#[async_trait]
pub trait MessageSink: Send + Sync {
    /// Hand a prepared sequence of messages to the transport.
    ///
    /// Implementations report an over-limit message through
    /// [`SinkError::TooLarge`] rather than a generic transport failure so
    /// the runtime can point operators at the offload configuration.
    async fn send(&self, messages: &[Message]) -> Result<(), SinkError>;
}
