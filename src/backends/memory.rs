// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Process-local in-memory queues and payload stores.
//!
//! Queues and stores are shared by name across the process, so any handle
//! created for `mem://orders` talks to the same state. Used by tests and
//! demos; the optional per-message size limit exists to exercise the
//! too-large path without a real transport.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, OnceLock};

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::{SinkError, SourceError, StoreError};
use crate::messages::envelope::{self, Envelope};
use crate::messages::Message;
use crate::traits::store::{checked_in_copy, checked_out_copy};
use crate::traits::{Delivery, Fetch, MessageSink, MessageSource, PayloadStore, Receipt};

#[derive(Default)]
struct QueueState {
    ready: VecDeque<(String, Envelope)>,
    in_flight: HashMap<String, Envelope>,
}

fn queue_registry() -> &'static Mutex<HashMap<String, Arc<Mutex<QueueState>>>> {
    static REGISTRY: OnceLock<Mutex<HashMap<String, Arc<Mutex<QueueState>>>>> = OnceLock::new();
    REGISTRY.get_or_init(Mutex::default)
}

/// In-memory queue backend: source and sink over one named queue.
pub struct MemoryBackend {
    name: String,
    max_message_bytes: Option<usize>,
    state: Arc<Mutex<QueueState>>,
}

impl MemoryBackend {
    /// Handle to the process-wide queue with this name.
    pub fn named(name: &str) -> Self {
        let state = queue_registry()
            .lock()
            .expect("queue registry lock poisoned")
            .entry(name.to_string())
            .or_default()
            .clone();

        Self {
            name: name.to_string(),
            max_message_bytes: None,
            state,
        }
    }

    /// Reject messages whose approximate size exceeds `limit` bytes, the
    /// way a real transport would.
    pub fn with_max_message_bytes(mut self, limit: usize) -> Self {
        self.max_message_bytes = Some(limit);
        self
    }

    /// Messages waiting to be fetched.
    pub fn len(&self) -> usize {
        self.state.lock().expect("queue state lock poisoned").ready.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Messages fetched but not yet acknowledged.
    pub fn in_flight_len(&self) -> usize {
        self.state
            .lock()
            .expect("queue state lock poisoned")
            .in_flight
            .len()
    }
}

#[async_trait]
impl MessageSource for MemoryBackend {
    async fn get_message(&self) -> Result<Fetch, SourceError> {
        let mut state = self.state.lock().expect("queue state lock poisoned");
        let Some((id, envelope)) = state.ready.pop_front() else {
            return Ok(Fetch::Empty);
        };

        match envelope::decode(envelope.body.clone(), envelope.attributes.clone()) {
            Ok(message) => {
                state.in_flight.insert(id.clone(), envelope);
                Ok(Fetch::Message(Delivery {
                    message,
                    receipt: Receipt::new(id),
                }))
            }
            Err(error) => {
                state.ready.push_front((id, envelope));
                Err(error.into())
            }
        }
    }

    async fn ack(&self, receipt: &Receipt) -> Result<(), SourceError> {
        let mut state = self.state.lock().expect("queue state lock poisoned");
        state
            .in_flight
            .remove(receipt.as_str())
            .map(|_| ())
            .ok_or_else(|| SourceError::UnknownReceipt {
                receipt: receipt.as_str().to_string(),
            })
    }
}

#[async_trait]
impl MessageSink for MemoryBackend {
    async fn send(&self, messages: &[Message]) -> Result<(), SinkError> {
        for message in messages {
            if let Some(limit) = self.max_message_bytes {
                let approx_size = message.approx_size();
                if approx_size > limit {
                    return Err(SinkError::TooLarge { approx_size, limit });
                }
            }

            let envelope = envelope::encode(message)?;
            let mut state = self.state.lock().expect("queue state lock poisoned");
            state
                .ready
                .push_back((Uuid::new_v4().to_string(), envelope));
            tracing::debug!(queue = %self.name, "Queued message");
        }
        Ok(())
    }
}

fn store_registry() -> &'static Mutex<HashMap<String, Arc<Mutex<HashMap<String, String>>>>> {
    static REGISTRY: OnceLock<Mutex<HashMap<String, Arc<Mutex<HashMap<String, String>>>>>> =
        OnceLock::new();
    REGISTRY.get_or_init(Mutex::default)
}

/// In-memory payload store. Locators look like `mem://<name>/<uuid>` and
/// resolve through the process-wide registry, so any store handle can
/// check out any in-memory locator.
pub struct MemoryPayloadStore {
    name: String,
    blobs: Arc<Mutex<HashMap<String, String>>>,
}

const MEM_SCHEME: &str = "mem://";

impl MemoryPayloadStore {
    pub fn named(name: &str) -> Self {
        let blobs = store_registry()
            .lock()
            .expect("store registry lock poisoned")
            .entry(name.to_string())
            .or_default()
            .clone();

        Self {
            name: name.to_string(),
            blobs,
        }
    }

    fn blobs_for(locator: &str) -> Result<Arc<Mutex<HashMap<String, String>>>, StoreError> {
        let rest = locator
            .strip_prefix(MEM_SCHEME)
            .ok_or_else(|| StoreError::MalformedLocator {
                locator: locator.to_string(),
            })?;
        let (name, _key) = rest.split_once('/').ok_or_else(|| StoreError::MalformedLocator {
            locator: locator.to_string(),
        })?;

        Ok(store_registry()
            .lock()
            .expect("store registry lock poisoned")
            .entry(name.to_string())
            .or_default()
            .clone())
    }
}

#[async_trait]
impl PayloadStore for MemoryPayloadStore {
    async fn check_in(&self, message: &Message) -> Result<Message, StoreError> {
        let text = message.body.serialize()?;
        let locator = format!("{MEM_SCHEME}{}/{}", self.name, Uuid::new_v4());
        self.blobs
            .lock()
            .expect("blob store lock poisoned")
            .insert(locator.clone(), text);

        Ok(checked_in_copy(message, locator))
    }

    async fn check_out(&self, message: &Message) -> Result<Message, StoreError> {
        let locator = message
            .payload_store_key
            .as_deref()
            .ok_or(StoreError::NotCheckedIn)?;

        let blobs = Self::blobs_for(locator)?;
        let text = blobs
            .lock()
            .expect("blob store lock poisoned")
            .get(locator)
            .cloned()
            .ok_or_else(|| StoreError::MissingPayload {
                locator: locator.to_string(),
            })?;

        checked_out_copy(message, text.into_bytes())
    }
}
