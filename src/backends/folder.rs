// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! A local directory as a simple file-based queue and payload store.
//!
//! Each message is one `<uuid>.json` file holding the serialized envelope.
//! Fetch picks the lexicographically first visible file; acknowledgement
//! deletes it. Useful for development, tests, and single-host pipelines.
//! There is no cross-process locking, so concurrent consumers on one
//! directory will race.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use uuid::Uuid;

use crate::errors::{SinkError, SourceError, StoreError};
use crate::messages::envelope::{self, Envelope};
use crate::messages::Message;
use crate::traits::store::{checked_in_copy, checked_out_copy};
use crate::traits::{Delivery, Fetch, MessageSink, MessageSource, PayloadStore, Receipt};

/// Queue-style folder backend: source and sink over one directory.
pub struct FolderBackend {
    path: PathBuf,
}

impl FolderBackend {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, std::io::Error> {
        let path = path.into();
        std::fs::create_dir_all(&path)?;
        Ok(Self { path })
    }

    async fn first_visible_file(&self) -> Result<Option<PathBuf>, std::io::Error> {
        let mut names: Vec<String> = Vec::new();
        let mut entries = fs::read_dir(&self.path).await?;
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }
            names.push(name);
        }

        names.sort();
        Ok(names.into_iter().next().map(|name| self.path.join(name)))
    }
}

#[async_trait]
impl MessageSource for FolderBackend {
    async fn get_message(&self) -> Result<Fetch, SourceError> {
        let Some(path) = self.first_visible_file().await? else {
            return Ok(Fetch::Empty);
        };

        let raw = fs::read_to_string(&path).await?;
        let envelope: Envelope =
            serde_json::from_str(&raw).map_err(|source| SourceError::MalformedMessage {
                location: path.display().to_string(),
                source,
            })?;

        let message = envelope::decode(envelope.body, envelope.attributes)?;
        tracing::debug!(path = %path.display(), "Fetched message file");

        Ok(Fetch::Message(Delivery {
            message,
            receipt: Receipt::new(path.display().to_string()),
        }))
    }

    async fn ack(&self, receipt: &Receipt) -> Result<(), SourceError> {
        fs::remove_file(receipt.as_str()).await?;
        tracing::debug!(path = receipt.as_str(), "Deleted acknowledged message file");
        Ok(())
    }
}

#[async_trait]
impl MessageSink for FolderBackend {
    async fn send(&self, messages: &[Message]) -> Result<(), SinkError> {
        for message in messages {
            let envelope = envelope::encode(message)?;
            let raw = serde_json::to_string(&envelope)?;
            let path = self.path.join(format!("{}.json", Uuid::new_v4()));
            fs::write(&path, raw).await?;
            tracing::debug!(path = %path.display(), "Wrote message file");
        }
        Ok(())
    }
}

/// Blob-style folder store for offloaded payloads.
///
/// Locators look like `folder:///var/spool/payloads/<uuid>`; check-out
/// reads whatever path the locator names, so one store handle can
/// rehydrate payloads written under any root.
pub struct FolderPayloadStore {
    root: PathBuf,
}

const FOLDER_SCHEME: &str = "folder://";

impl FolderPayloadStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, std::io::Error> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }
}

#[async_trait]
impl PayloadStore for FolderPayloadStore {
    async fn check_in(&self, message: &Message) -> Result<Message, StoreError> {
        let text = message.body.serialize()?;
        let path = self.root.join(Uuid::new_v4().to_string());
        fs::write(&path, &text).await?;

        let locator = format!("{FOLDER_SCHEME}{}", path.display());
        Ok(checked_in_copy(message, locator))
    }

    async fn check_out(&self, message: &Message) -> Result<Message, StoreError> {
        let locator = message
            .payload_store_key
            .as_deref()
            .ok_or(StoreError::NotCheckedIn)?;
        let path = locator
            .strip_prefix(FOLDER_SCHEME)
            .ok_or_else(|| StoreError::MalformedLocator {
                locator: locator.to_string(),
            })?;

        let bytes = fs::read(path).await.map_err(|error| {
            if error.kind() == std::io::ErrorKind::NotFound {
                StoreError::MissingPayload {
                    locator: locator.to_string(),
                }
            } else {
                StoreError::Io(error)
            }
        })?;

        checked_out_copy(message, bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{AttributeValue, MessageBody};

    #[tokio::test]
    async fn send_then_fetch_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FolderBackend::new(dir.path()).unwrap();

        let mut message = Message::raw_content("hello", "text");
        message
            .custom_attributes
            .insert("country".to_string(), AttributeValue::from("AU"));

        backend.send(std::slice::from_ref(&message)).await.unwrap();

        match backend.get_message().await.unwrap() {
            Fetch::Message(delivery) => assert_eq!(delivery.message, message),
            Fetch::Empty => panic!("expected a message"),
        }
    }

    #[tokio::test]
    async fn empty_folder_fetches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FolderBackend::new(dir.path()).unwrap();
        assert!(matches!(backend.get_message().await.unwrap(), Fetch::Empty));
    }

    #[tokio::test]
    async fn ack_deletes_the_message_file() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FolderBackend::new(dir.path()).unwrap();
        backend
            .send(&[Message::raw_content("hello", "text")])
            .await
            .unwrap();

        let Fetch::Message(delivery) = backend.get_message().await.unwrap() else {
            panic!("expected a message");
        };
        backend.ack(&delivery.receipt).await.unwrap();

        assert!(matches!(backend.get_message().await.unwrap(), Fetch::Empty));
    }

    #[tokio::test]
    async fn unacked_messages_are_fetched_again() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FolderBackend::new(dir.path()).unwrap();
        backend
            .send(&[Message::raw_content("hello", "text")])
            .await
            .unwrap();

        let Fetch::Message(first) = backend.get_message().await.unwrap() else {
            panic!("expected a message");
        };
        let Fetch::Message(second) = backend.get_message().await.unwrap() else {
            panic!("expected the message to still be there");
        };
        assert_eq!(first.message, second.message);
    }

    #[tokio::test]
    async fn hidden_files_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".keep"), "not a message").unwrap();

        let backend = FolderBackend::new(dir.path()).unwrap();
        assert!(matches!(backend.get_message().await.unwrap(), Fetch::Empty));
    }

    #[tokio::test]
    async fn malformed_files_are_reported_with_their_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.json"), "{not json").unwrap();

        let backend = FolderBackend::new(dir.path()).unwrap();
        match backend.get_message().await {
            Err(SourceError::MalformedMessage { location, .. }) => {
                assert!(location.ends_with("bad.json"))
            }
            other => panic!("expected MalformedMessage, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn payload_store_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = FolderPayloadStore::new(dir.path()).unwrap();

        let message = Message::raw_content("a large body", "text");
        let checked_in = store.check_in(&message).await.unwrap();

        assert!(checked_in.is_checked_in());
        let locator = checked_in.payload_store_key.clone().unwrap();
        assert!(locator.starts_with(FOLDER_SCHEME));
        assert_eq!(checked_in.body, MessageBody::Raw(locator));
        // check_in never mutates its input
        assert!(!message.is_checked_in());

        let checked_out = store.check_out(&checked_in).await.unwrap();
        assert_eq!(checked_out, message);
    }

    #[tokio::test]
    async fn check_out_requires_a_checked_in_message() {
        let dir = tempfile::tempdir().unwrap();
        let store = FolderPayloadStore::new(dir.path()).unwrap();

        let result = store.check_out(&Message::raw_content("hello", "text")).await;
        assert!(matches!(result, Err(StoreError::NotCheckedIn)));
    }

    #[tokio::test]
    async fn distinct_check_ins_get_distinct_locators() {
        let dir = tempfile::tempdir().unwrap();
        let store = FolderPayloadStore::new(dir.path()).unwrap();

        let first = store
            .check_in(&Message::raw_content("one", "text"))
            .await
            .unwrap();
        let second = store
            .check_in(&Message::raw_content("two", "text"))
            .await
            .unwrap();

        assert_ne!(first.payload_store_key, second.payload_store_key);
    }
}
