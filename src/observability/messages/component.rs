// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for execution cycle lifecycle and lineage events.

use std::fmt::{Display, Formatter};
use std::time::Duration;

use tracing::Span;

use crate::errors::ComponentError;
use crate::observability::messages::StructuredLog;

/// An execution cycle is starting.
///
/// # Log Level
/// `debug!` - heartbeat, one per cycle
pub struct CycleStarted<'a> {
    pub component: &'a str,
}

impl Display for CycleStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Starting execution cycle for component '{}'", self.component)
    }
}

impl StructuredLog for CycleStarted<'_> {
    fn log(&self) {
        tracing::debug!(component = self.component, "{}", self);
    }
}

/// The source had no messages; the cycle ends silently.
///
/// # Log Level
/// `debug!` - expected outcome, not an error
pub struct SourceEmpty {}

impl Display for SourceEmpty {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "No messages available from the source, ending cycle")
    }
}

impl StructuredLog for SourceEmpty {
    fn log(&self) {
        tracing::debug!("{}", self);
    }
}

/// A fresh ingestion step has been created for this cycle.
///
/// Its `span` carries the ingestion id so every record emitted during the
/// cycle is correlated with the lineage it belongs to.
///
/// # Log Level
/// `info!` - important operational event
pub struct IngestionStepStarted<'a> {
    pub ingestion_id: &'a str,
    pub parent_ingestion_id: Option<&'a str>,
}

impl Display for IngestionStepStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self.parent_ingestion_id {
            Some(parent) => write!(
                f,
                "Beginning ingestion step {} with parent {}",
                self.ingestion_id, parent
            ),
            None => write!(f, "Beginning ingestion step {}", self.ingestion_id),
        }
    }
}

impl StructuredLog for IngestionStepStarted<'_> {
    fn log(&self) {
        tracing::info!(
            ingestion_id = self.ingestion_id,
            parent_ingestion_id = self.parent_ingestion_id.unwrap_or("-"),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "cycle",
            span_name = name,
            ingestion_id = self.ingestion_id,
        )
    }
}

/// The core function returned.
///
/// # Log Level
/// `info!` - important operational event
pub struct CoreFunctionCompleted {
    pub duration: Duration,
}

impl Display for CoreFunctionCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Core function completed in {:?}", self.duration)
    }
}

impl StructuredLog for CoreFunctionCompleted {
    fn log(&self) {
        tracing::info!(duration_ms = self.duration.as_millis() as u64, "{}", self);
    }
}

/// Output messages were normalized, stamped, and offloaded where needed.
///
/// # Log Level
/// `info!` - important operational event
pub struct OutputPrepared {
    pub message_count: usize,
}

impl Display for OutputPrepared {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Prepared {} output message(s) for dispatch", self.message_count)
    }
}

impl StructuredLog for OutputPrepared {
    fn log(&self) {
        tracing::info!(n_out_messages = self.message_count, "{}", self);
    }
}

/// Every output entry was empty after normalization.
///
/// # Log Level
/// `warn!` - the component probably meant to produce something
pub struct NoOutputMessages {}

impl Display for NoOutputMessages {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Component produced no output messages")
    }
}

impl StructuredLog for NoOutputMessages {
    fn log(&self) {
        tracing::warn!("{}", self);
    }
}

/// The core function returned output but the component declares no sink.
///
/// # Log Level
/// `warn!` - the output is dropped
pub struct OutputWithoutSink {}

impl Display for OutputWithoutSink {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Component produced an output, but no output has been specified"
        )
    }
}

impl StructuredLog for OutputWithoutSink {
    fn log(&self) {
        tracing::warn!("{}", self);
    }
}

/// The cycle aborted; nothing was sent and the input was not acknowledged.
///
/// # Log Level
/// `error!` - contained per cycle, the loop carries on
pub struct CycleFailed<'a> {
    pub error: &'a ComponentError,
}

impl Display for CycleFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Execution cycle failed: {}", self.error)
    }
}

impl StructuredLog for CycleFailed<'_> {
    fn log(&self) {
        tracing::error!(error = ?self.error, "{}", self);
    }
}

/// The cycle's lineage record, serialized at teardown.
///
/// # Log Level
/// `info!` - downstream tooling scrapes this record
pub struct IngestionStepRecorded<'a> {
    pub step_json: &'a str,
}

impl Display for IngestionStepRecorded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Recording ingestion step: {}", self.step_json)
    }
}

impl StructuredLog for IngestionStepRecorded<'_> {
    fn log(&self) {
        tracing::info!(ingestion_step = self.step_json, "{}", self);
    }
}

/// Configuration does not identify the running artifact.
///
/// # Log Level
/// `warn!` - the lineage record will be missing key information
pub struct MissingArtifactIdentity<'a> {
    pub option: &'a str,
    pub ingestion_id: &'a str,
}

impl Display for MissingArtifactIdentity<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "'{}' not defined in configuration, ingestion step {} is missing key information",
            self.option, self.ingestion_id
        )
    }
}

impl StructuredLog for MissingArtifactIdentity<'_> {
    fn log(&self) {
        tracing::warn!(
            option = self.option,
            ingestion_id = self.ingestion_id,
            "{}", self
        );
    }
}

/// Continuous operation is starting.
///
/// # Log Level
/// `info!` - once per process
pub struct RunForeverStarted {
    pub sleep_seconds: u64,
}

impl Display for RunForeverStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Entering continuous operation with {}s between cycles",
            self.sleep_seconds
        )
    }
}

impl StructuredLog for RunForeverStarted {
    fn log(&self) {
        tracing::info!(sleep_seconds = self.sleep_seconds, "{}", self);
    }
}

/// The continuous loop observed the cancellation and stopped cleanly.
///
/// # Log Level
/// `info!` - the last record a healthy worker writes
pub struct LoopStopped {}

impl Display for LoopStopped {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Continuous operation stopped after completing the in-flight cycle")
    }
}

impl StructuredLog for LoopStopped {
    fn log(&self) {
        tracing::info!("{}", self);
    }
}

/// A termination signal arrived; the in-flight cycle finishes first.
///
/// # Log Level
/// `warn!` - operators watch for this during deploys
pub struct ShutdownRequested {}

impl Display for ShutdownRequested {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Shutdown requested, finishing the current cycle before stopping"
        )
    }
}

impl StructuredLog for ShutdownRequested {
    fn log(&self) {
        tracing::warn!("{}", self);
    }
}
