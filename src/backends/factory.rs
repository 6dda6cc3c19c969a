// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Adapter selection: one URI scheme per transport.
//!
//! A single configuration value per direction picks the adapter. An
//! unrecognised scheme is a fatal configuration error raised here, at
//! construction time, before any cycle runs.
//!
//! Handles are cached per resource URI in a small bounded LRU cache so a
//! component does not rebuild adapter clients on every cycle. The cache is
//! owned by the factory instance; there is no process-wide hidden state.

use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::backends::folder::{FolderBackend, FolderPayloadStore};
use crate::backends::memory::{MemoryBackend, MemoryPayloadStore};
use crate::config::consts::ADAPTER_CACHE_CAPACITY;
use crate::errors::ConfigError;
use crate::traits::{MessageSink, MessageSource, PayloadStore};

/// Cloud schemes we can name in errors: their adapters are real, they just
/// live in external crates.
const EXTERNAL_SCHEMES: &[&str] = &["sqs", "sns", "s3", "ssm"];

/// Bounded least-recently-used cache of adapter handles, keyed by resource
/// URI. Most recently used entries live at the back.
struct HandleCache<T: ?Sized> {
    capacity: usize,
    entries: Mutex<Vec<(String, Arc<T>)>>,
}

impl<T: ?Sized> HandleCache<T> {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Mutex::new(Vec::new()),
        }
    }

    fn get_or_try_insert(
        &self,
        key: &str,
        make: impl FnOnce() -> Result<Arc<T>, ConfigError>,
    ) -> Result<Arc<T>, ConfigError> {
        let mut entries = self.entries.lock().expect("adapter cache lock poisoned");

        if let Some(position) = entries.iter().position(|(cached, _)| cached == key) {
            let entry = entries.remove(position);
            let handle = Arc::clone(&entry.1);
            entries.push(entry);
            return Ok(handle);
        }

        let handle = make()?;
        if entries.len() == self.capacity {
            entries.remove(0);
        }
        entries.push((key.to_string(), Arc::clone(&handle)));
        Ok(handle)
    }

    #[cfg(test)]
    fn contains(&self, key: &str) -> bool {
        self.entries
            .lock()
            .expect("adapter cache lock poisoned")
            .iter()
            .any(|(cached, _)| cached == key)
    }
}

/// Maps configuration URIs to adapter handles.
pub struct AdapterFactory {
    sources: HandleCache<dyn MessageSource>,
    sinks: HandleCache<dyn MessageSink>,
    stores: HandleCache<dyn PayloadStore>,
}

impl AdapterFactory {
    pub fn new() -> Self {
        Self {
            sources: HandleCache::new(ADAPTER_CACHE_CAPACITY),
            sinks: HandleCache::new(ADAPTER_CACHE_CAPACITY),
            stores: HandleCache::new(ADAPTER_CACHE_CAPACITY),
        }
    }

    /// Source adapter for an input URI.
    pub fn source(&self, uri: &str) -> Result<Arc<dyn MessageSource>, ConfigError> {
        self.sources
            .get_or_try_insert(uri, || make_source(uri, "input"))
    }

    /// Sink adapter for an output URI.
    pub fn sink(&self, uri: &str) -> Result<Arc<dyn MessageSink>, ConfigError> {
        self.sinks.get_or_try_insert(uri, || make_sink(uri, "output"))
    }

    /// Payload store adapter for a store destination URI.
    pub fn store(&self, uri: &str) -> Result<Arc<dyn PayloadStore>, ConfigError> {
        self.stores
            .get_or_try_insert(uri, || make_store(uri, "store destination"))
    }

    /// Payload store adapter able to check out the payload behind a
    /// locator. The locator's scheme decides; its trailing key segment is
    /// dropped to recover the store destination.
    pub fn store_for_locator(&self, locator: &str) -> Result<Arc<dyn PayloadStore>, ConfigError> {
        let destination = match split_scheme(locator) {
            Some(("folder", path)) => {
                let root = Path::new(path).parent().unwrap_or_else(|| Path::new(path));
                format!("folder://{}", root.display())
            }
            Some(("mem", rest)) => {
                let name = rest.split('/').next().unwrap_or(rest);
                format!("mem://{name}")
            }
            _ => {
                return Err(scheme_error(locator, "payload store locator"));
            }
        };

        self.store(&destination)
    }
}

impl Default for AdapterFactory {
    fn default() -> Self {
        Self::new()
    }
}

fn split_scheme(uri: &str) -> Option<(&str, &str)> {
    uri.split_once("://")
}

fn scheme_error(uri: &str, role: &'static str) -> ConfigError {
    match split_scheme(uri) {
        Some((scheme, _)) if EXTERNAL_SCHEMES.contains(&scheme) => ConfigError::ExternalAdapter {
            role,
            scheme: scheme.to_string(),
            uri: uri.to_string(),
        },
        _ => ConfigError::UnsupportedScheme {
            role,
            uri: uri.to_string(),
        },
    }
}

fn make_source(uri: &str, role: &'static str) -> Result<Arc<dyn MessageSource>, ConfigError> {
    match split_scheme(uri) {
        Some(("folder", path)) => {
            let backend = FolderBackend::new(path).map_err(|source| ConfigError::AdapterInit {
                uri: uri.to_string(),
                source,
            })?;
            Ok(Arc::new(backend))
        }
        Some(("mem", name)) => Ok(Arc::new(MemoryBackend::named(name))),
        _ => Err(scheme_error(uri, role)),
    }
}

fn make_sink(uri: &str, role: &'static str) -> Result<Arc<dyn MessageSink>, ConfigError> {
    match split_scheme(uri) {
        Some(("folder", path)) => {
            let backend = FolderBackend::new(path).map_err(|source| ConfigError::AdapterInit {
                uri: uri.to_string(),
                source,
            })?;
            Ok(Arc::new(backend))
        }
        Some(("mem", name)) => Ok(Arc::new(MemoryBackend::named(name))),
        _ => Err(scheme_error(uri, role)),
    }
}

fn make_store(uri: &str, role: &'static str) -> Result<Arc<dyn PayloadStore>, ConfigError> {
    match split_scheme(uri) {
        Some(("folder", path)) => {
            let store =
                FolderPayloadStore::new(path).map_err(|source| ConfigError::AdapterInit {
                    uri: uri.to_string(),
                    source,
                })?;
            Ok(Arc::new(store))
        }
        Some(("mem", name)) => Ok(Arc::new(MemoryPayloadStore::named(name))),
        _ => Err(scheme_error(uri, role)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_schemes_are_fatal() {
        let factory = AdapterFactory::new();
        assert!(matches!(
            factory.source("carrier-pigeon://loft"),
            Err(ConfigError::UnsupportedScheme { role: "input", .. })
        ));
        assert!(matches!(
            factory.sink("carrier-pigeon://loft"),
            Err(ConfigError::UnsupportedScheme { role: "output", .. })
        ));
    }

    #[test]
    fn cloud_schemes_name_the_external_adapter() {
        let factory = AdapterFactory::new();
        match factory.source("sqs://ingest-queue") {
            Err(ConfigError::ExternalAdapter { scheme, .. }) => assert_eq!(scheme, "sqs"),
            Ok(_) => panic!("expected ExternalAdapter error, got an Ok source"),
            Err(e) => panic!("expected ExternalAdapter error, got {e:?}"),
        }
        assert!(matches!(
            factory.store("s3://bucket/prefix"),
            Err(ConfigError::ExternalAdapter { .. })
        ));
    }

    #[test]
    fn handles_are_cached_per_uri() {
        let factory = AdapterFactory::new();
        let first = factory.source("mem://cache-test").unwrap();
        let second = factory.source("mem://cache-test").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn cache_evicts_least_recently_used() {
        let cache: HandleCache<str> = HandleCache::new(2);

        cache.get_or_try_insert("a", || Ok(Arc::from("a"))).unwrap();
        cache.get_or_try_insert("b", || Ok(Arc::from("b"))).unwrap();
        // Touch "a" so "b" becomes the eviction candidate.
        cache.get_or_try_insert("a", || Ok(Arc::from("a"))).unwrap();
        cache.get_or_try_insert("c", || Ok(Arc::from("c"))).unwrap();

        assert!(cache.contains("a"));
        assert!(!cache.contains("b"));
        assert!(cache.contains("c"));
    }

    #[test]
    fn store_for_locator_maps_back_to_the_destination() {
        let factory = AdapterFactory::new();
        let store = factory
            .store_for_locator("mem://locator-test/7d7f3a2e")
            .unwrap();
        let again = factory.store("mem://locator-test").unwrap();
        assert!(Arc::ptr_eq(&store, &again));
    }

    #[test]
    fn locators_with_unknown_schemes_are_fatal() {
        let factory = AdapterFactory::new();
        assert!(matches!(
            factory.store_for_locator("gopher://hole/key"),
            Err(ConfigError::UnsupportedScheme { .. })
        ));
    }
}
