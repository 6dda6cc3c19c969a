// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised while loading configuration or selecting adapters.
//!
//! Everything in here is fatal: these errors surface during component
//! construction, before the first execution cycle runs, and are never
//! retried.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration environment variable is absent from the process
    /// environment.
    #[error("environment variable {name} is not set")]
    MissingEnv { name: &'static str },

    /// The configuration document failed to parse as JSON.
    #[error("malformed configuration document: {0}")]
    Malformed(#[from] serde_json::Error),

    /// A `file://` configuration locator pointed at an unreadable file.
    #[error("failed to read configuration from \"{path}\": {source}")]
    UnreadableFile {
        path: String,
        source: std::io::Error,
    },

    /// The configuration value was neither inline JSON nor a recognised
    /// locator.
    #[error("\"{value}\" is not recognised as inline JSON or a valid path to a config")]
    UnrecognizedLocation { value: String },

    /// The configuration locator names a remote provider whose client lives
    /// in an external adapter crate.
    #[error(
        "configuration source \"{scheme}://\" requires an external provider crate \
         and is not bundled here"
    )]
    ExternalConfigSource { scheme: String },

    /// A source/sink/store URI used a scheme with no bundled adapter.
    #[error("unsupported {role} \"{uri}\": bundled schemes are folder:// and mem://")]
    UnsupportedScheme { role: &'static str, uri: String },

    /// A source/sink/store URI named a known cloud scheme whose adapter is
    /// distributed separately.
    #[error(
        "{role} \"{uri}\" selects a {scheme}:// adapter, which is provided by an \
         external adapter crate, not bundled here"
    )]
    ExternalAdapter {
        role: &'static str,
        scheme: String,
        uri: String,
    },

    /// An adapter was selected but could not be constructed (for example the
    /// folder backend failed to create its directory).
    #[error("failed to initialise adapter for \"{uri}\": {source}")]
    AdapterInit {
        uri: String,
        source: std::io::Error,
    },

    /// A named component variant is missing a configuration option its
    /// wiring requires.
    #[error("a {component} component requires the \"{option}\" configuration option")]
    MissingOption {
        component: &'static str,
        option: &'static str,
    },

    /// A named component variant was given a configuration option its wiring
    /// forbids.
    #[error("a {component} component must not set the \"{option}\" configuration option")]
    UnexpectedOption {
        component: &'static str,
        option: &'static str,
    },
}
