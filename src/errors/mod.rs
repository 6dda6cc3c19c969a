// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod codec;
mod component;
mod config;
mod messaging;
mod store;

pub use codec::CodecError;
pub use component::ComponentError;
pub use config::ConfigError;
pub use messaging::{SinkError, SourceError};
pub use store::StoreError;
