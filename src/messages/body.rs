// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message body variants and the structured tabular payload.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::CodecError;
use crate::messages::{IngestionStep, ObjectType};

/// The payload of a message, tagged by [`ObjectType`].
#[derive(Debug, Clone, PartialEq)]
pub enum MessageBody {
    /// Raw text, used for `rawContent` and the JSON-text variants
    /// (`urlResource`, `updateNotification`). While a message is checked
    /// in, the store locator also travels here.
    Raw(String),
    /// A structured tabular data asset.
    Data(DataAsset),
    /// An ingestion step record.
    Ingestion(IngestionStep),
    /// An inbound platform event, kept as uninterpreted JSON.
    Event(Value),
    /// No payload at all.
    Empty,
}

impl MessageBody {
    /// The wire form of the body: structured variants serialize to JSON
    /// text, raw text passes through, an empty body serializes to the
    /// empty string.
    pub fn serialize(&self) -> Result<String, CodecError> {
        match self {
            MessageBody::Raw(text) => Ok(text.clone()),
            MessageBody::Data(asset) => {
                serde_json::to_string(asset).map_err(|source| CodecError::SerializeBody {
                    object_type: ObjectType::DataAsset.as_str(),
                    source,
                })
            }
            MessageBody::Ingestion(step) => {
                serde_json::to_string(step).map_err(|source| CodecError::SerializeBody {
                    object_type: ObjectType::IngestionStep.as_str(),
                    source,
                })
            }
            MessageBody::Event(event) => {
                serde_json::to_string(event).map_err(|source| CodecError::SerializeBody {
                    object_type: ObjectType::PlatformEvent.as_str(),
                    source,
                })
            }
            MessageBody::Empty => Ok(String::new()),
        }
    }

    /// Rebuild a body from its wire form, driven by the object type tag.
    /// Only the structured variants are reconstructed; everything else
    /// stays raw text.
    pub fn reconstruct(object_type: ObjectType, text: String) -> Result<Self, CodecError> {
        match object_type {
            ObjectType::DataAsset => {
                let asset = serde_json::from_str(&text).map_err(|source| {
                    CodecError::DeserializeBody {
                        object_type: ObjectType::DataAsset.as_str(),
                        source,
                    }
                })?;
                Ok(MessageBody::Data(asset))
            }
            ObjectType::IngestionStep => {
                let step = serde_json::from_str(&text).map_err(|source| {
                    CodecError::DeserializeBody {
                        object_type: ObjectType::IngestionStep.as_str(),
                        source,
                    }
                })?;
                Ok(MessageBody::Ingestion(step))
            }
            ObjectType::PlatformEvent => {
                let event = serde_json::from_str(&text).map_err(|source| {
                    CodecError::DeserializeBody {
                        object_type: ObjectType::PlatformEvent.as_str(),
                        source,
                    }
                })?;
                Ok(MessageBody::Event(event))
            }
            ObjectType::Null => Ok(MessageBody::Empty),
            ObjectType::UrlResource | ObjectType::UpdateNotification | ObjectType::RawContent => {
                Ok(MessageBody::Raw(text))
            }
        }
    }

    /// Length of the wire form, used by the approximate size estimate.
    /// Serialization failures count as zero here; the codec proper reports
    /// them when the message is actually encoded.
    pub(crate) fn approx_len(&self) -> usize {
        match self {
            MessageBody::Raw(text) => text.len(),
            MessageBody::Empty => 0,
            other => other.serialize().map_or(0, |text| text.len()),
        }
    }

    pub(crate) fn snippet(&self, width: usize) -> String {
        let text = match self {
            MessageBody::Raw(text) => text.clone(),
            MessageBody::Empty => String::new(),
            other => other.serialize().unwrap_or_default(),
        };
        if text.len() > width {
            let head: String = text.chars().take(width).collect();
            format!("{head}...")
        } else {
            text
        }
    }
}

/// A structured tabular payload: named, versioned, partitioned rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataAsset {
    pub data_asset_name: String,
    pub data_asset_country: String,
    pub data_asset_version: String,

    /// Ordered list of data asset fields by which the data is partitioned.
    pub data_asset_partition_keys: Vec<String>,

    /// Unordered list of data asset fields used for deduplication. Two
    /// records are considered identical if their values for each of these
    /// keys match.
    pub data_asset_unique_keys: Vec<String>,

    /// The rows, each mapping data asset fields to their values.
    pub data: Vec<Map<String, Value>>,

    /// The id of the ingestion step that produced this asset.
    pub ingestion_id: Option<String>,
}

impl DataAsset {
    pub fn from_rows(
        name: impl Into<String>,
        version: impl Into<String>,
        country: impl Into<String>,
        partition_keys: Vec<String>,
        unique_keys: Vec<String>,
        rows: Vec<Map<String, Value>>,
    ) -> Self {
        let name = name.into();
        tracing::info!(rows = rows.len(), name = %name, "Creating data asset");

        Self {
            data_asset_name: name,
            data_asset_country: country.into(),
            data_asset_version: version.into(),
            data_asset_partition_keys: partition_keys,
            data_asset_unique_keys: unique_keys,
            data: rows,
            ingestion_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_asset() -> DataAsset {
        let mut row = Map::new();
        row.insert("foo".to_string(), json!(1));
        row.insert("bar".to_string(), json!("two"));

        DataAsset::from_rows(
            "foobar",
            "1",
            "AU",
            vec!["foo".to_string()],
            vec!["bar".to_string()],
            vec![row],
        )
    }

    #[test]
    fn data_asset_serializes_camel_case() {
        let text = serde_json::to_string(&sample_asset()).unwrap();
        assert!(text.contains("\"dataAssetName\":\"foobar\""));
        assert!(text.contains("\"dataAssetPartitionKeys\":[\"foo\"]"));
        assert!(text.contains("\"ingestionId\":null"));
    }

    #[test]
    fn data_asset_round_trips_through_json() {
        let asset = sample_asset();
        let text = serde_json::to_string(&asset).unwrap();
        let back: DataAsset = serde_json::from_str(&text).unwrap();
        assert_eq!(back, asset);
    }

    #[test]
    fn reconstruct_leaves_raw_variants_untouched() {
        let body =
            MessageBody::reconstruct(ObjectType::UrlResource, "{\"url\": \"x\"}".to_string())
                .unwrap();
        assert_eq!(body, MessageBody::Raw("{\"url\": \"x\"}".to_string()));
    }

    #[test]
    fn reconstruct_rejects_bad_structured_bodies() {
        let result = MessageBody::reconstruct(ObjectType::DataAsset, "not json".to_string());
        assert!(result.is_err());
    }

    #[test]
    fn empty_body_serializes_to_empty_string() {
        assert_eq!(MessageBody::Empty.serialize().unwrap(), "");
    }
}
