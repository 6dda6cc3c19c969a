use async_trait::async_trait;

use crate::errors::SourceError;
use crate::messages::Message;

/// Opaque token identifying one delivery for acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt(String);

impl Receipt {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One message taken from a source, plus the receipt that commits it.
#[derive(Debug, Clone)]
pub struct Delivery {
    pub message: Message,
    pub receipt: Receipt,
}

/// The outcome of a fetch. An empty source is an expected, non-error
/// outcome and gets its own variant so callers must handle it.
#[derive(Debug)]
pub enum Fetch {
    Message(Delivery),
    Empty,
}

/// Where a component's input comes from.
///
/// Acquisition is scoped: a fetched message is only considered delivered
/// once the caller acknowledges its receipt. Until then the transport is
/// free to redeliver it to a later cycle or another process.
#[async_trait]
pub trait MessageSource: Send + Sync {
    /// Obtain at most one message.
    async fn get_message(&self) -> Result<Fetch, SourceError>;

    /// Commit a delivery, instructing the transport to delete the message.
    async fn ack(&self, receipt: &Receipt) -> Result<(), SourceError>;
}
