// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Loading and shaping the component configuration.
//!
//! The whole configuration is one JSON document, taken from the
//! `GANTRY_CONFIG` environment variable either inline or through a
//! `file://` locator. Remote locators (`ssm://`, `s3://`) are recognised
//! but their clients live in external provider crates.
//!
//! # Example
//! ```json
//! {
//!   "input": "folder:///var/spool/inbound",
//!   "output": "folder:///var/spool/outbound",
//!   "log_level": "info",
//!   "log_format": "json",
//!   "loop_sleep_seconds": 30,
//!   "store_destination": "folder:///var/spool/payloads",
//!   "store_min_message_bytes": 256000,
//!   "artifact_name": "price-normalizer",
//!   "artifact_version": "3.1.0"
//! }
//! ```
//!
//! Keys outside the recognised set are kept and handed to the core
//! function verbatim, so components can carry their own options in the
//! same document.

use std::env;
use std::fs;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::config::consts::{
    CONFIG_ENV_VAR, DEFAULT_LOG_LEVEL, DEFAULT_LOOP_SLEEP_SECONDS, DEFAULT_STORE_MIN_MESSAGE_BYTES,
};
use crate::errors::ConfigError;
use crate::observability::messages::config::UnrecognizedConfigOption;
use crate::observability::messages::StructuredLog;

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Txt,
    Json,
}

/// The immutable configuration consumed by the component runtime.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Source adapter URI. Absent means the component declares no input.
    #[serde(default)]
    pub input: Option<String>,

    /// Sink adapter URI. Absent means the component declares no output.
    #[serde(default)]
    pub output: Option<String>,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Pause between cycles in `run_forever`.
    #[serde(default = "default_loop_sleep_seconds")]
    pub loop_sleep_seconds: u64,

    /// Payload store adapter URI. Offload is disabled while this is absent.
    #[serde(default)]
    pub store_destination: Option<String>,

    /// Offload threshold in approximate wire bytes.
    #[serde(default = "default_store_min_message_bytes")]
    pub store_min_message_bytes: Option<usize>,

    /// Identity of the running component, stamped into every ingestion
    /// step and outgoing message.
    #[serde(default)]
    pub artifact_name: Option<String>,

    #[serde(default)]
    pub artifact_version: Option<String>,

    /// Seed metadata merged into every ingestion step at creation.
    #[serde(default)]
    pub ingestion_attrs: IndexMap<String, Value>,

    /// Everything else in the document, passed through to the core
    /// function untouched.
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_loop_sleep_seconds() -> u64 {
    DEFAULT_LOOP_SLEEP_SECONDS
}

fn default_store_min_message_bytes() -> Option<usize> {
    Some(DEFAULT_STORE_MIN_MESSAGE_BYTES)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: None,
            output: None,
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            loop_sleep_seconds: default_loop_sleep_seconds(),
            store_destination: None,
            store_min_message_bytes: default_store_min_message_bytes(),
            artifact_name: None,
            artifact_version: None,
            ingestion_attrs: IndexMap::new(),
            extra: IndexMap::new(),
        }
    }
}

impl Config {
    /// Load configuration from the `GANTRY_CONFIG` environment variable.
    ///
    /// A value starting with `{` is parsed as inline JSON; otherwise it is
    /// treated as a locator pointing at the document.
    pub fn load() -> Result<Self, ConfigError> {
        let value = env::var(CONFIG_ENV_VAR).map_err(|_| ConfigError::MissingEnv {
            name: CONFIG_ENV_VAR,
        })?;

        if value.trim_start().starts_with('{') {
            return Self::from_json(&value);
        }

        let document = fetch_document(&value)?;
        Self::from_json(&document)
    }

    /// Parse a configuration document.
    pub fn from_json(document: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(document)?;
        Ok(config)
    }

    /// Warn about passthrough keys that look like misspelled core options.
    /// Call after the log subscriber is installed.
    pub fn warn_unrecognized_options(&self) {
        for key in self.extra.keys() {
            if key.to_ascii_lowercase().starts_with("gantry") {
                UnrecognizedConfigOption { option: key }.log();
            }
        }
    }
}

fn fetch_document(locator: &str) -> Result<String, ConfigError> {
    if let Some(path) = locator.strip_prefix("file://") {
        return fs::read_to_string(path).map_err(|source| ConfigError::UnreadableFile {
            path: path.to_string(),
            source,
        });
    }

    for scheme in ["ssm", "s3"] {
        if locator.starts_with(&format!("{scheme}://")) {
            return Err(ConfigError::ExternalConfigSource {
                scheme: scheme.to_string(),
            });
        }
    }

    Err(ConfigError::UnrecognizedLocation {
        value: locator.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gets_defaults() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config.input, None);
        assert_eq!(config.output, None);
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_format, LogFormat::Txt);
        assert_eq!(config.loop_sleep_seconds, 60);
        assert_eq!(config.store_destination, None);
        assert_eq!(config.store_min_message_bytes, Some(256_000));
    }

    #[test]
    fn full_document_parses() {
        let config = Config::from_json(
            r#"{
                "input": "folder:///tmp/in",
                "output": "mem://out",
                "log_level": "debug",
                "log_format": "json",
                "loop_sleep_seconds": 5,
                "store_destination": "folder:///tmp/payloads",
                "store_min_message_bytes": 1024,
                "artifact_name": "normalizer",
                "artifact_version": "0.9.1",
                "ingestion_attrs": {"environment": "staging"},
                "fetch_url": "https://example.com/prices"
            }"#,
        )
        .unwrap();

        assert_eq!(config.input.as_deref(), Some("folder:///tmp/in"));
        assert_eq!(config.output.as_deref(), Some("mem://out"));
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.loop_sleep_seconds, 5);
        assert_eq!(config.store_min_message_bytes, Some(1024));
        assert_eq!(config.artifact_name.as_deref(), Some("normalizer"));
        assert_eq!(
            config.extra["fetch_url"],
            Value::String("https://example.com/prices".to_string())
        );
    }

    #[test]
    fn malformed_document_is_rejected() {
        assert!(matches!(
            Config::from_json("{not json"),
            Err(ConfigError::Malformed(_))
        ));
    }

    #[test]
    fn file_locator_reads_the_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"artifact_name": "from-file"}"#).unwrap();

        let document = fetch_document(&format!("file://{}", path.display())).unwrap();
        let config = Config::from_json(&document).unwrap();
        assert_eq!(config.artifact_name.as_deref(), Some("from-file"));
    }

    #[test]
    fn remote_locators_point_at_external_providers() {
        assert!(matches!(
            fetch_document("ssm:///teams/pricing/config"),
            Err(ConfigError::ExternalConfigSource { .. })
        ));
        assert!(matches!(
            fetch_document("s3://config-bucket/pricing.json"),
            Err(ConfigError::ExternalConfigSource { .. })
        ));
    }

    #[test]
    fn unknown_locators_are_rejected() {
        assert!(matches!(
            fetch_document("dynamo://nope"),
            Err(ConfigError::UnrecognizedLocation { .. })
        ));
    }
}
