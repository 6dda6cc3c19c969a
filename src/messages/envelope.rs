// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The envelope codec: one wire format for every transport.
//!
//! An [`Envelope`] is the transport-neutral rendering of a [`Message`]: a
//! string body plus a string-keyed, string-valued attribute map. Every
//! adapter, bundled or external, moves envelopes, so producers and
//! consumers agree on the wire regardless of whether the bytes travel
//! through a queue, a topic, or a directory of files.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::errors::CodecError;
use crate::messages::{AttributeValue, Message, MessageBody, ObjectType};

/// Names of the fixed wire attributes.
pub mod attribute {
    pub const PAYLOAD_MIME_TYPE: &str = "payloadMimeType";
    pub const OBJECT_TYPE: &str = "objectType";
    pub const INGESTION_ID: &str = "ingestionId";
    pub const ARTIFACT_NAME: &str = "artifactName";
    pub const ARTIFACT_VERSION: &str = "artifactVersion";
    pub const PAYLOAD_STORE_KEY: &str = "payloadStoreKey";
}

/// Substituted for an empty serialized body; many transports reject empty
/// payloads outright.
pub const EMPTY_BODY_PLACEHOLDER: &str = "filling message body with a string so it is not empty";

// Sentinel markers for non-string attribute values. Attribute values are
// always strings on the wire; these three fixed markers carry true/false/
// absent across it. A custom attribute whose string value equals one of
// the markers will decode as the corresponding non-string value, so do not
// use them for anything else.
const TRUE_MARKER: &str = r"gantry//~|~True~|~\\gantry";
const FALSE_MARKER: &str = r"gantry//~|~False~|~\\gantry";
const NONE_MARKER: &str = r"gantry//~|~None~|~\\gantry";

impl AttributeValue {
    /// The wire string for this value.
    pub fn encode(&self) -> String {
        match self {
            AttributeValue::Str(text) => text.clone(),
            AttributeValue::Bool(true) => TRUE_MARKER.to_string(),
            AttributeValue::Bool(false) => FALSE_MARKER.to_string(),
            AttributeValue::Absent => NONE_MARKER.to_string(),
        }
    }

    /// Recover a value that has been encoded into a wire string.
    pub fn recover(text: String) -> Self {
        match text.as_str() {
            TRUE_MARKER => AttributeValue::Bool(true),
            FALSE_MARKER => AttributeValue::Bool(false),
            NONE_MARKER => AttributeValue::Absent,
            _ => AttributeValue::Str(text),
        }
    }

    pub(crate) fn encoded_len(&self) -> usize {
        match self {
            AttributeValue::Str(text) => text.len(),
            AttributeValue::Bool(true) => TRUE_MARKER.len(),
            AttributeValue::Bool(false) => FALSE_MARKER.len(),
            AttributeValue::Absent => NONE_MARKER.len(),
        }
    }
}

/// The transport-neutral `{body, attributes}` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub body: String,
    pub attributes: IndexMap<String, String>,
}

/// Encode a message into its envelope.
pub fn encode(message: &Message) -> Result<Envelope, CodecError> {
    let mut attributes = IndexMap::new();
    attributes.insert(
        attribute::PAYLOAD_MIME_TYPE.to_string(),
        message.payload_mime_type.clone(),
    );
    attributes.insert(
        attribute::OBJECT_TYPE.to_string(),
        message.object_type.as_str().to_string(),
    );
    attributes.insert(
        attribute::INGESTION_ID.to_string(),
        encode_optional(&message.ingestion_id),
    );
    attributes.insert(
        attribute::ARTIFACT_NAME.to_string(),
        encode_optional(&message.artifact_name),
    );
    attributes.insert(
        attribute::ARTIFACT_VERSION.to_string(),
        encode_optional(&message.artifact_version),
    );

    for (key, value) in &message.custom_attributes {
        attributes.insert(key.clone(), value.encode());
    }

    let mut body = message.body.serialize()?;
    if body.is_empty() {
        body = EMPTY_BODY_PLACEHOLDER.to_string();
    }

    if let Some(key) = &message.payload_store_key {
        attributes.insert(attribute::PAYLOAD_STORE_KEY.to_string(), key.clone());
    }

    Ok(Envelope { body, attributes })
}

/// Decode an envelope back into a message.
///
/// The five fixed attributes are popped in a fixed order, then the optional
/// store key; everything remaining in the map becomes a custom attribute.
/// The body is only reconstructed when the message is not checked in:
/// while checked in, the body is the store locator and stays raw.
pub fn decode(
    body: String,
    mut attributes: IndexMap<String, String>,
) -> Result<Message, CodecError> {
    let payload_mime_type = pop_required(&mut attributes, attribute::PAYLOAD_MIME_TYPE)?;
    let object_type: ObjectType =
        pop_required(&mut attributes, attribute::OBJECT_TYPE)?.parse()?;
    let ingestion_id = recover_optional(pop_required(&mut attributes, attribute::INGESTION_ID)?);
    let artifact_name = recover_optional(pop_required(&mut attributes, attribute::ARTIFACT_NAME)?);
    let artifact_version =
        recover_optional(pop_required(&mut attributes, attribute::ARTIFACT_VERSION)?);

    let payload_store_key = attributes.shift_remove(attribute::PAYLOAD_STORE_KEY);

    let body = if body == EMPTY_BODY_PLACEHOLDER {
        String::new()
    } else {
        body
    };

    let body = if payload_store_key.is_some() {
        MessageBody::Raw(body)
    } else {
        MessageBody::reconstruct(object_type, body)?
    };

    let custom_attributes = attributes
        .into_iter()
        .map(|(key, value)| (key, AttributeValue::recover(value)))
        .collect();

    Ok(Message {
        body,
        payload_mime_type,
        object_type,
        custom_attributes,
        payload_store_key,
        ingestion_id,
        parent_ingestion_id: None,
        artifact_name,
        artifact_version,
    })
}

fn encode_optional(value: &Option<String>) -> String {
    match value {
        Some(text) => text.clone(),
        None => NONE_MARKER.to_string(),
    }
}

fn recover_optional(text: String) -> Option<String> {
    if text == NONE_MARKER {
        None
    } else {
        Some(text)
    }
}

fn pop_required(
    attributes: &mut IndexMap<String, String>,
    name: &'static str,
) -> Result<String, CodecError> {
    attributes
        .shift_remove(name)
        .ok_or(CodecError::MissingAttribute { name })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::messages::{DataAsset, IngestionStep};
    use serde_json::{json, Map};

    fn round_trip(message: &Message) -> Message {
        let envelope = encode(message).unwrap();
        decode(envelope.body, envelope.attributes).unwrap()
    }

    #[test]
    fn raw_content_round_trips() {
        let mut message = Message::raw_content("hello", "text");
        message.ingestion_id = Some("abc-123".to_string());
        message.artifact_name = Some("fetcher".to_string());
        message.artifact_version = Some("2.0".to_string());
        message
            .custom_attributes
            .insert("country".to_string(), AttributeValue::from("AU"));

        assert_eq!(round_trip(&message), message);
    }

    #[test]
    fn data_asset_round_trips() {
        let mut row = Map::new();
        row.insert("foo".to_string(), json!(1));
        let asset = DataAsset::from_rows(
            "foobar",
            "1",
            "AU",
            vec!["foo".to_string()],
            vec![],
            vec![row],
        );
        let message = Message::data_asset(asset);

        assert_eq!(round_trip(&message), message);
    }

    #[test]
    fn ingestion_step_round_trips() {
        let step = IngestionStep::begin(&Config::default(), Some("parent".to_string()));
        let message = Message::ingestion_step(step);

        assert_eq!(round_trip(&message), message);
    }

    #[test]
    fn platform_event_round_trips() {
        let message = Message::platform_event(json!({"Records": [{"s3": {"key": "x"}}]}));
        assert_eq!(round_trip(&message), message);
    }

    #[test]
    fn null_message_round_trips() {
        let message = Message::null();
        assert_eq!(round_trip(&message), message);
    }

    #[test]
    fn url_resource_round_trips() {
        let message = Message::url_resource("{\"url\": \"https://example.com\"}");
        assert_eq!(round_trip(&message), message);
    }

    #[test]
    fn empty_bodies_travel_as_the_placeholder() {
        let envelope = encode(&Message::null()).unwrap();
        assert_eq!(envelope.body, EMPTY_BODY_PLACEHOLDER);
    }

    #[test]
    fn raw_content_scenario_encodes_expected_attributes() {
        let message = Message::raw_content("hello", "text");
        let envelope = encode(&message).unwrap();

        assert_eq!(envelope.body, "hello");
        assert_eq!(envelope.attributes[attribute::OBJECT_TYPE], "rawContent");
        assert_eq!(envelope.attributes[attribute::PAYLOAD_MIME_TYPE], "text");
        assert_eq!(envelope.attributes[attribute::INGESTION_ID], NONE_MARKER);
        assert!(!envelope.attributes.contains_key(attribute::PAYLOAD_STORE_KEY));

        assert_eq!(decode(envelope.body, envelope.attributes).unwrap(), message);
    }

    #[test]
    fn checked_in_messages_carry_their_locator() {
        let mut message = Message::raw_content("folder:///tmp/store/abc", "text");
        message.payload_store_key = Some("folder:///tmp/store/abc".to_string());

        let envelope = encode(&message).unwrap();
        assert_eq!(
            envelope.attributes[attribute::PAYLOAD_STORE_KEY],
            "folder:///tmp/store/abc"
        );

        let decoded = decode(envelope.body, envelope.attributes).unwrap();
        assert!(decoded.is_checked_in());
        assert_eq!(
            decoded.body,
            MessageBody::Raw("folder:///tmp/store/abc".to_string())
        );
    }

    #[test]
    fn checked_in_structured_bodies_are_not_reconstructed() {
        // While checked in the body is a locator, not JSON: decode must not
        // try to parse it as a data asset.
        let mut message = Message::raw_content("mem://store/xyz", "text/json");
        message.object_type = ObjectType::DataAsset;
        message.payload_store_key = Some("mem://store/xyz".to_string());

        let envelope = encode(&message).unwrap();
        let decoded = decode(envelope.body, envelope.attributes).unwrap();
        assert_eq!(decoded.body, MessageBody::Raw("mem://store/xyz".to_string()));
    }

    #[test]
    fn boolean_and_absent_attributes_survive_the_wire() {
        let mut message = Message::raw_content("hello", "text");
        message
            .custom_attributes
            .insert("fresh".to_string(), AttributeValue::Bool(true));
        message
            .custom_attributes
            .insert("stale".to_string(), AttributeValue::Bool(false));
        message
            .custom_attributes
            .insert("region".to_string(), AttributeValue::Absent);

        let envelope = encode(&message).unwrap();
        assert_eq!(envelope.attributes["fresh"], TRUE_MARKER);
        assert_eq!(envelope.attributes["stale"], FALSE_MARKER);
        assert_eq!(envelope.attributes["region"], NONE_MARKER);

        assert_eq!(decode(envelope.body, envelope.attributes).unwrap(), message);
    }

    #[test]
    fn literal_none_text_is_not_special() {
        // The sentinel policy leaves the plain string "None" alone; only the
        // fixed markers are recovered.
        let mut message = Message::raw_content("hello", "text");
        message
            .custom_attributes
            .insert("label".to_string(), AttributeValue::from("None"));

        assert_eq!(round_trip(&message), message);
    }

    #[test]
    fn custom_attribute_order_is_preserved() {
        let mut message = Message::raw_content("hello", "text");
        for key in ["zulu", "alpha", "mike"] {
            message
                .custom_attributes
                .insert(key.to_string(), AttributeValue::from(key));
        }

        let decoded = round_trip(&message);
        let keys: Vec<&String> = decoded.custom_attributes.keys().collect();
        assert_eq!(keys, ["zulu", "alpha", "mike"]);
    }

    #[test]
    fn missing_fixed_attribute_is_an_error() {
        let envelope = encode(&Message::raw_content("hello", "text")).unwrap();
        let mut attributes = envelope.attributes;
        attributes.shift_remove(attribute::OBJECT_TYPE);

        let result = decode(envelope.body, attributes);
        assert!(matches!(
            result,
            Err(CodecError::MissingAttribute { name: "objectType" })
        ));
    }

    #[test]
    fn unknown_object_type_is_an_error() {
        let envelope = encode(&Message::raw_content("hello", "text")).unwrap();
        let mut attributes = envelope.attributes;
        attributes.insert(attribute::OBJECT_TYPE.to_string(), "carrier".to_string());

        assert!(matches!(
            decode(envelope.body, attributes),
            Err(CodecError::UnknownObjectType { .. })
        ));
    }
}
