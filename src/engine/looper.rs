// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Continuous operation with cooperative shutdown.
//!
//! The cancellation token is checked only between cycles: an in-flight
//! cycle always finishes (output sent, lineage logged, input acknowledged)
//! before the loop stops. There is no mid-cycle cancellation or rollback.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::engine::component::Component;
use crate::observability::messages::component::{LoopStopped, RunForeverStarted};
use crate::observability::messages::StructuredLog;

impl Component {
    /// Repeat [`Component::run_once`] with the configured pause between
    /// cycles until the token is cancelled.
    pub async fn run_forever(&self, shutdown: CancellationToken) {
        let sleep_seconds = self.config().loop_sleep_seconds;
        RunForeverStarted { sleep_seconds }.log();

        let pause = Duration::from_secs(sleep_seconds);
        loop {
            if shutdown.is_cancelled() {
                break;
            }

            self.run_once().await;

            // The pause is also a shutdown point; only the cycle itself is
            // uninterruptible.
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = tokio::time::sleep(pause) => {}
            }
        }

        LoopStopped {}.log();
    }
}
