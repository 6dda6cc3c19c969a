// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! A relay worker: moves messages between two transports, stamping
//! lineage as it goes. Doubles as the reference wiring for components
//! built on this crate.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use gantry::config::Config;
use gantry::engine::{Component, CoreOutput};
use gantry::messages::Message;
use gantry::observability;
use gantry::observability::messages::component::ShutdownRequested;
use gantry::observability::messages::StructuredLog;

fn relay(message: Option<Message>, _config: &Config) -> anyhow::Result<CoreOutput> {
    Ok(message.into())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;
    observability::init(&config);
    config.warn_unrecognized_options();

    let shutdown = CancellationToken::new();
    install_signal_handlers(shutdown.clone());

    let component = Component::from_config(Arc::new(relay), config)?;
    component.run_forever(shutdown).await;

    Ok(())
}

fn install_signal_handlers(shutdown: CancellationToken) {
    tokio::spawn(async move {
        #[cfg(unix)]
        {
            let mut sigterm =
                tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                    .expect("failed to install SIGTERM handler");
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = sigterm.recv() => {}
            }
        }
        #[cfg(not(unix))]
        {
            let _ = tokio::signal::ctrl_c().await;
        }

        ShutdownRequested {}.log();
        shutdown.cancel();
    });
}
