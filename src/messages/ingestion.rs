// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The per-cycle lineage record.

use chrono::{Datelike, Timelike, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::config::Config;
use crate::observability::messages::component::MissingArtifactIdentity;
use crate::observability::messages::StructuredLog;

/// Lineage and metadata for one execution cycle.
///
/// Created exactly once per cycle, mutated only by the runtime during that
/// cycle, and serialized to the log at teardown. `metadata` is append-only:
/// keys are merged in over the lifetime of the step, never removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestionStep {
    pub ingestion_id: String,
    pub parent_ingestion_id: Option<String>,
    pub artifact_name: String,
    pub artifact_version: String,

    /// Seconds since the epoch, captured at creation.
    #[serde(rename = "dimUTCTimestamp")]
    pub dim_utc_timestamp: i64,

    /// Calendar date id (YYYYMMDD), captured at creation.
    #[serde(rename = "dimUTCDateId")]
    pub dim_utc_date_id: u32,

    /// Hour of day (0-23), captured at creation.
    #[serde(rename = "dimUTCHour")]
    pub dim_utc_hour: u32,

    pub metadata: IndexMap<String, Value>,
}

impl IngestionStep {
    /// Begin the lineage record for a new cycle.
    ///
    /// The ingestion id is freshly generated; the parent links back to the
    /// step that produced the input message, if any. Artifact identity comes
    /// from configuration; a missing value logs a warning and leaves the
    /// field empty rather than failing the cycle.
    pub fn begin(config: &Config, parent_ingestion_id: Option<String>) -> Self {
        let ingestion_id = Uuid::new_v4().to_string();

        let artifact_name = match &config.artifact_name {
            Some(name) => name.clone(),
            None => {
                MissingArtifactIdentity {
                    option: "artifact_name",
                    ingestion_id: &ingestion_id,
                }
                .log();
                String::new()
            }
        };
        let artifact_version = match &config.artifact_version {
            Some(version) => version.clone(),
            None => {
                MissingArtifactIdentity {
                    option: "artifact_version",
                    ingestion_id: &ingestion_id,
                }
                .log();
                String::new()
            }
        };

        let now = Utc::now();
        let dim_utc_date_id =
            now.year() as u32 * 10_000 + now.month() * 100 + now.day();

        let mut step = Self {
            ingestion_id,
            parent_ingestion_id,
            artifact_name,
            artifact_version,
            dim_utc_timestamp: now.timestamp(),
            dim_utc_date_id,
            dim_utc_hour: now.hour(),
            metadata: IndexMap::new(),
        };

        if !config.ingestion_attrs.is_empty() {
            step.merge_metadata(config.ingestion_attrs.clone());
        }

        step
    }

    /// Merge new keys and values into the step's metadata. Existing keys
    /// are overwritten, nothing is ever removed.
    pub fn merge_metadata(&mut self, entries: impl IntoIterator<Item = (String, Value)>) {
        self.metadata.extend(entries);
    }

    /// The single-line JSON form logged at teardown.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config_with_identity() -> Config {
        let mut config = Config::default();
        config.artifact_name = Some("asx-fetcher".to_string());
        config.artifact_version = Some("1.4.2".to_string());
        config
    }

    #[test]
    fn begin_captures_identity_and_time_dimensions() {
        let step = IngestionStep::begin(&config_with_identity(), Some("parent-id".to_string()));

        assert!(!step.ingestion_id.is_empty());
        assert_eq!(step.parent_ingestion_id.as_deref(), Some("parent-id"));
        assert_eq!(step.artifact_name, "asx-fetcher");
        assert_eq!(step.artifact_version, "1.4.2");
        assert!(step.dim_utc_timestamp > 0);
        assert!(step.dim_utc_date_id >= 20_000_101);
        assert!(step.dim_utc_hour < 24);
    }

    #[test]
    fn begin_without_identity_leaves_fields_empty() {
        let step = IngestionStep::begin(&Config::default(), None);
        assert_eq!(step.artifact_name, "");
        assert_eq!(step.artifact_version, "");
        assert_eq!(step.parent_ingestion_id, None);
    }

    #[test]
    fn fresh_steps_have_distinct_ids() {
        let config = config_with_identity();
        let first = IngestionStep::begin(&config, None);
        let second = IngestionStep::begin(&config, None);
        assert_ne!(first.ingestion_id, second.ingestion_id);
    }

    #[test]
    fn metadata_merges_are_append_only() {
        let mut step = IngestionStep::begin(&config_with_identity(), None);
        step.merge_metadata([("rows".to_string(), json!(40))]);
        step.merge_metadata([("duration_seconds".to_string(), json!(1.25))]);

        assert_eq!(step.metadata["rows"], json!(40));
        assert_eq!(step.metadata["duration_seconds"], json!(1.25));
    }

    #[test]
    fn seed_metadata_comes_from_configuration() {
        let mut config = config_with_identity();
        config
            .ingestion_attrs
            .insert("environment".to_string(), json!("staging"));

        let step = IngestionStep::begin(&config, None);
        assert_eq!(step.metadata["environment"], json!("staging"));
    }

    #[test]
    fn serializes_with_upper_case_dimension_names() {
        let step = IngestionStep::begin(&config_with_identity(), None);
        let text = step.to_json().unwrap();
        assert!(text.contains("\"dimUTCTimestamp\""));
        assert!(text.contains("\"dimUTCDateId\""));
        assert!(text.contains("\"dimUTCHour\""));
        assert!(text.contains("\"parentIngestionId\":null"));
    }
}
