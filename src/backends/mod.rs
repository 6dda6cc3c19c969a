// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Adapter implementations for the source, sink, and payload store
//! capabilities.
//!
//! Each backend binds the capability traits to one transport. The bundled
//! backends cover local development and testing (`folder://`, `mem://`);
//! cloud transports implement the same traits from external adapter
//! crates and are wired in through the same factory.

pub mod factory;
pub mod folder;
pub mod memory;

pub use factory::AdapterFactory;
pub use folder::{FolderBackend, FolderPayloadStore};
pub use memory::{MemoryBackend, MemoryPayloadStore};
