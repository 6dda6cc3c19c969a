// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Configuration defaults and limits.

/// Environment variable holding the configuration document or a locator
/// pointing at one.
pub const CONFIG_ENV_VAR: &str = "GANTRY_CONFIG";

/// Default log level when the configuration does not set one.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Default pause between cycles in `run_forever`, in seconds.
pub const DEFAULT_LOOP_SLEEP_SECONDS: u64 = 60;

/// Default offload threshold. Offload still requires a store destination to
/// be configured; the threshold alone does nothing.
pub const DEFAULT_STORE_MIN_MESSAGE_BYTES: usize = 250 * 1024;

/// Capacity of the adapter handle cache, per capability.
pub const ADAPTER_CACHE_CAPACITY: usize = 16;
