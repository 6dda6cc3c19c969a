// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The message model shared by every component on a pipeline.
//!
//! A [`Message`] is the unit of work: an opaque, tagged body plus a closed
//! set of fixed wire fields and one open, ordered map of custom attributes.
//! The fixed field list is explicit and versioned by this module; only the
//! fields named here travel on the wire (see [`envelope`]).

mod body;
mod ingestion;

pub mod envelope;

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde_json::Value;

use crate::errors::CodecError;

pub use body::{DataAsset, MessageBody};
pub use ingestion::IngestionStep;

/// Tag identifying which body variant a message carries.
///
/// The tag travels as the `objectType` wire attribute and drives the
/// conditional (de)serialization of the body on decode and check-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    DataAsset,
    IngestionStep,
    UrlResource,
    UpdateNotification,
    RawContent,
    PlatformEvent,
    Null,
}

impl ObjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::DataAsset => "dataAsset",
            ObjectType::IngestionStep => "ingestionStep",
            ObjectType::UrlResource => "urlResource",
            ObjectType::UpdateNotification => "updateNotification",
            ObjectType::RawContent => "rawContent",
            ObjectType::PlatformEvent => "platformEvent",
            ObjectType::Null => "null",
        }
    }
}

impl FromStr for ObjectType {
    type Err = CodecError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "dataAsset" => Ok(ObjectType::DataAsset),
            "ingestionStep" => Ok(ObjectType::IngestionStep),
            "urlResource" => Ok(ObjectType::UrlResource),
            "updateNotification" => Ok(ObjectType::UpdateNotification),
            "rawContent" => Ok(ObjectType::RawContent),
            "platformEvent" => Ok(ObjectType::PlatformEvent),
            "null" => Ok(ObjectType::Null),
            other => Err(CodecError::UnknownObjectType {
                tag: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A custom attribute value as producers see it in memory.
///
/// On the wire every attribute is a plain string; non-string values are
/// coerced through the sentinel markers defined in [`envelope`] and
/// recovered on decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    Str(String),
    Bool(bool),
    Absent,
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Str(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Str(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

/// The unit of work flowing between components.
#[derive(Debug, Clone)]
pub struct Message {
    pub body: MessageBody,
    pub payload_mime_type: String,
    pub object_type: ObjectType,

    /// Producer-supplied attributes, carried alongside the fixed fields.
    /// Insertion order is preserved on the wire.
    pub custom_attributes: IndexMap<String, AttributeValue>,

    /// Locator of the offloaded body. Non-`None` means the message is
    /// checked in: `body` holds the locator, never the real content.
    pub payload_store_key: Option<String>,

    pub ingestion_id: Option<String>,

    /// Lineage link back to the step that produced this message. In-memory
    /// only; the runtime derives it from `ingestion_id` on the consuming
    /// side, so it does not travel on the wire.
    pub parent_ingestion_id: Option<String>,

    pub artifact_name: Option<String>,
    pub artifact_version: Option<String>,
}

impl Message {
    fn base(object_type: ObjectType, payload_mime_type: &str, body: MessageBody) -> Self {
        Self {
            body,
            payload_mime_type: payload_mime_type.to_string(),
            object_type,
            custom_attributes: IndexMap::new(),
            payload_store_key: None,
            ingestion_id: None,
            parent_ingestion_id: None,
            artifact_name: None,
            artifact_version: None,
        }
    }

    /// A message carrying raw text with the given content-type hint.
    pub fn raw_content(body: impl Into<String>, payload_mime_type: &str) -> Self {
        Self::base(
            ObjectType::RawContent,
            payload_mime_type,
            MessageBody::Raw(body.into()),
        )
    }

    /// A message carrying a structured tabular data asset.
    pub fn data_asset(asset: DataAsset) -> Self {
        Self::base(ObjectType::DataAsset, "text/json", MessageBody::Data(asset))
    }

    /// A message whose sole payload is an ingestion step record, for
    /// components that publish lineage itself.
    pub fn ingestion_step(step: IngestionStep) -> Self {
        Self::base(
            ObjectType::IngestionStep,
            "text/json",
            MessageBody::Ingestion(step),
        )
    }

    /// A message naming a remote resource to fetch, as JSON text.
    pub fn url_resource(body: impl Into<String>) -> Self {
        Self::base(
            ObjectType::UrlResource,
            "text/json",
            MessageBody::Raw(body.into()),
        )
    }

    /// A change-notification message, as JSON text.
    pub fn update_notification(body: impl Into<String>) -> Self {
        Self::base(
            ObjectType::UpdateNotification,
            "text/json",
            MessageBody::Raw(body.into()),
        )
    }

    /// A message wrapping an inbound platform event.
    pub fn platform_event(event: Value) -> Self {
        Self::base(
            ObjectType::PlatformEvent,
            "text/json",
            MessageBody::Event(event),
        )
    }

    /// An empty message, for components that only need to be triggered.
    pub fn null() -> Self {
        Self::base(ObjectType::Null, "text", MessageBody::Empty)
    }

    /// A message is checked in if and only if its payload store key is set.
    pub fn is_checked_in(&self) -> bool {
        self.payload_store_key.is_some()
    }

    /// Approximate wire size of the message: the sum of the string lengths
    /// of every serialized field name and value. Most messaging queues and
    /// topics have a size limit; payloads which are too big should be
    /// checked in to a payload store before transmitting.
    pub fn approx_size(&self) -> usize {
        use crate::messages::envelope::attribute;

        let mut size = "body".len() + self.body.approx_len();
        size += attribute::PAYLOAD_MIME_TYPE.len() + self.payload_mime_type.len();
        size += attribute::OBJECT_TYPE.len() + self.object_type.as_str().len();
        size += attribute::INGESTION_ID.len() + self.ingestion_id.as_deref().map_or(0, str::len);
        size += attribute::ARTIFACT_NAME.len() + self.artifact_name.as_deref().map_or(0, str::len);
        size +=
            attribute::ARTIFACT_VERSION.len() + self.artifact_version.as_deref().map_or(0, str::len);
        size += attribute::PAYLOAD_STORE_KEY.len()
            + self.payload_store_key.as_deref().map_or(0, str::len);

        for (key, value) in &self.custom_attributes {
            size += key.len() + value.encoded_len();
        }

        size
    }
}

// Equality covers the wire fields plus the body; the in-memory lineage link
// is excluded, matching what survives an encode/decode round trip.
impl PartialEq for Message {
    fn eq(&self, other: &Self) -> bool {
        self.body == other.body
            && self.payload_mime_type == other.payload_mime_type
            && self.object_type == other.object_type
            && self.custom_attributes == other.custom_attributes
            && self.payload_store_key == other.payload_store_key
            && self.ingestion_id == other.ingestion_id
            && self.artifact_name == other.artifact_name
            && self.artifact_version == other.artifact_version
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body = self.body.snippet(10);
        write!(f, "<Message objectType={} body=\"{}\">", self.object_type, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checked_in_iff_store_key_present() {
        let mut message = Message::raw_content("hello", "text");
        assert!(!message.is_checked_in());

        message.payload_store_key = Some("folder:///tmp/abc".to_string());
        assert!(message.is_checked_in());
    }

    #[test]
    fn approx_size_counts_names_and_values() {
        let empty = Message::null();
        let baseline = empty.approx_size();
        assert!(baseline > 0);

        let mut message = Message::raw_content("0123456789", "text");
        let sized = message.approx_size();
        message
            .custom_attributes
            .insert("country".to_string(), AttributeValue::from("AU"));
        assert_eq!(message.approx_size(), sized + "country".len() + "AU".len());
    }

    #[test]
    fn equality_ignores_in_memory_lineage_link() {
        let mut left = Message::raw_content("hello", "text");
        let mut right = left.clone();
        left.parent_ingestion_id = Some("earlier".to_string());
        assert_eq!(left, right);

        right.ingestion_id = Some("other".to_string());
        assert_ne!(left, right);
    }

    #[test]
    fn object_type_tags_round_trip() {
        for object_type in [
            ObjectType::DataAsset,
            ObjectType::IngestionStep,
            ObjectType::UrlResource,
            ObjectType::UpdateNotification,
            ObjectType::RawContent,
            ObjectType::PlatformEvent,
            ObjectType::Null,
        ] {
            assert_eq!(object_type.as_str().parse::<ObjectType>().unwrap(), object_type);
        }

        assert!("telegram".parse::<ObjectType>().is_err());
    }

    #[test]
    fn display_truncates_long_bodies() {
        let message = Message::raw_content("a very long body indeed", "text");
        assert_eq!(
            message.to_string(),
            "<Message objectType=rawContent body=\"a very lon...\">"
        );
    }
}
