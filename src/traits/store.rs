use async_trait::async_trait;

use crate::errors::StoreError;
use crate::messages::{Message, MessageBody};

/// A blob collaborator holding offloaded message bodies.
///
/// Both operations are pure with respect to their input: the caller's
/// message is never mutated, a modified copy is returned.
#[async_trait]
pub trait PayloadStore: Send + Sync {
    /// Serialize the body, write it under a freshly generated key, and
    /// return a copy whose body and `payload_store_key` both hold the
    /// locator.
    async fn check_in(&self, message: &Message) -> Result<Message, StoreError>;

    /// Retrieve the payload at `payload_store_key`, rebuild the body
    /// according to the object type, and return a copy with the key
    /// cleared. Fails with [`StoreError::NotCheckedIn`] if the message was
    /// never checked in.
    async fn check_out(&self, message: &Message) -> Result<Message, StoreError>;
}

/// The checked-in copy of a message: body and store key both hold the
/// locator. Store implementations call this after writing the payload.
pub fn checked_in_copy(message: &Message, locator: String) -> Message {
    let mut out = message.clone();
    out.body = MessageBody::Raw(locator.clone());
    out.payload_store_key = Some(locator);
    out
}

/// The checked-out copy of a message: body rebuilt from the retrieved
/// bytes, store key cleared. Non-UTF-8 payloads are carried into the raw
/// body lossily; the bundled stores only ever persist UTF-8 text.
pub fn checked_out_copy(message: &Message, bytes: Vec<u8>) -> Result<Message, StoreError> {
    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(error) => String::from_utf8_lossy(error.as_bytes()).into_owned(),
    };

    let mut out = message.clone();
    out.body = MessageBody::reconstruct(out.object_type, text)?;
    out.payload_store_key = None;
    Ok(out)
}
