// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Component builder: configuration-driven wiring with room for
//! dependency injection.
//!
//! Adapters not supplied explicitly are created from their configuration
//! URIs through the adapter factory; injected ones win, which is how
//! tests hand a component doubles without touching configuration.

use std::sync::Arc;

use crate::backends::AdapterFactory;
use crate::config::Config;
use crate::engine::component::{Component, CoreFunction};
use crate::errors::ConfigError;
use crate::traits::{MessageSink, MessageSource, PayloadStore};

pub struct ComponentBuilder {
    core: Arc<dyn CoreFunction>,
    config: Config,
    input: Option<Arc<dyn MessageSource>>,
    output: Option<Arc<dyn MessageSink>>,
    store: Option<Arc<dyn PayloadStore>>,
}

impl ComponentBuilder {
    pub fn new(core: Arc<dyn CoreFunction>, config: Config) -> Self {
        Self {
            core,
            config,
            input: None,
            output: None,
            store: None,
        }
    }

    pub fn with_input(mut self, source: Arc<dyn MessageSource>) -> Self {
        self.input = Some(source);
        self
    }

    pub fn with_output(mut self, sink: Arc<dyn MessageSink>) -> Self {
        self.output = Some(sink);
        self
    }

    pub fn with_store(mut self, store: Arc<dyn PayloadStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Resolve the remaining adapters from configuration and assemble the
    /// component. Unrecognised adapter schemes fail here, before any cycle
    /// runs.
    pub fn build(self) -> Result<Component, ConfigError> {
        let factory = AdapterFactory::new();

        let input = match (self.input, &self.config.input) {
            (Some(injected), _) => Some(injected),
            (None, Some(uri)) => Some(factory.source(uri)?),
            (None, None) => None,
        };
        let output = match (self.output, &self.config.output) {
            (Some(injected), _) => Some(injected),
            (None, Some(uri)) => Some(factory.sink(uri)?),
            (None, None) => None,
        };
        let store = match (self.store, &self.config.store_destination) {
            (Some(injected), _) => Some(injected),
            (None, Some(uri)) => Some(factory.store(uri)?),
            (None, None) => None,
        };

        Ok(Component {
            core: self.core,
            config: self.config,
            input,
            output,
            store,
            factory,
        })
    }
}
