// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! gantry - one execution contract for pipeline workers.
//!
//! Every worker on a pipeline is a [`engine::Component`]: one core
//! function wired to a message source, a message sink, and an optional
//! payload store, all selected by URI scheme from configuration. The
//! crate owns the wire format ([`messages::envelope`]), the transparent
//! offload of oversized payloads, and the per-cycle lineage record
//! ([`messages::IngestionStep`]).

pub mod backends;      // source/sink/store adapters + selection
pub mod config;        // configuration loading + defaults
pub mod engine;        // the component runtime
pub mod errors;        // error taxonomy
pub mod messages;      // message model + envelope codec
pub mod observability; // structured logging
pub mod traits;        // capability contracts
