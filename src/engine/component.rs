// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The component runtime.
//!
//! A component wraps one user-supplied core function with the execution
//! contract every worker on a pipeline shares: fetch one unit of work,
//! create the lineage record, rehydrate offloaded payloads, execute,
//! stamp and offload outputs, dispatch, record lineage. Which variant a
//! component is (pipeline, source, sink, or null) is purely a function
//! of which adapters are wired:
//!
//! - *pipeline*: input and output
//! - *source*: output only, normally driven by a timer
//! - *sink*: input only
//! - *null*: neither, exists to run logic on a schedule
//!
//! Failures inside a cycle never escape [`Component::run_once`]; the
//! continuous loop carries on with the next cycle. Request/response
//! invocation contexts call [`Component::try_run_once`] instead so the
//! caller observes the failure directly.

use std::sync::Arc;
use std::time::Instant;

use tracing::Instrument;

use crate::backends::AdapterFactory;
use crate::config::Config;
use crate::errors::{ComponentError, ConfigError};
use crate::messages::{IngestionStep, Message, MessageBody};
use crate::observability::messages::component::{
    CoreFunctionCompleted, CycleFailed, CycleStarted, IngestionStepRecorded, IngestionStepStarted,
    NoOutputMessages, OutputPrepared, OutputWithoutSink, SourceEmpty,
};
use crate::observability::messages::store::{AlreadyCheckedIn, MessageCheckedIn, MessageCheckedOut};
use crate::observability::messages::StructuredLog;
use crate::traits::{Fetch, MessageSink, MessageSource, PayloadStore, Receipt};

/// The domain logic a component runs once per cycle.
///
/// Implemented automatically for plain functions and closures of the shape
/// `Fn(Option<Message>, &Config) -> anyhow::Result<CoreOutput>`; implement
/// the trait directly when the logic needs to await or carry state.
#[async_trait::async_trait]
pub trait CoreFunction: Send + Sync {
    async fn process(
        &self,
        message: Option<Message>,
        config: &Config,
    ) -> anyhow::Result<CoreOutput>;

    fn name(&self) -> &'static str {
        "core_function"
    }
}

#[async_trait::async_trait]
impl<F> CoreFunction for F
where
    F: Fn(Option<Message>, &Config) -> anyhow::Result<CoreOutput> + Send + Sync,
{
    async fn process(
        &self,
        message: Option<Message>,
        config: &Config,
    ) -> anyhow::Result<CoreOutput> {
        (self)(message, config)
    }
}

/// What a core function hands back: zero or more messages.
///
/// A single message and a batch are both fine; empty entries in a batch
/// are dropped during output preparation.
#[derive(Debug)]
pub enum CoreOutput {
    Nothing,
    One(Message),
    Many(Vec<Option<Message>>),
}

impl CoreOutput {
    pub(crate) fn is_nothing(&self) -> bool {
        matches!(self, CoreOutput::Nothing)
    }

    pub(crate) fn into_messages(self) -> Vec<Message> {
        match self {
            CoreOutput::Nothing => Vec::new(),
            CoreOutput::One(message) => vec![message],
            CoreOutput::Many(messages) => messages.into_iter().flatten().collect(),
        }
    }
}

impl From<Message> for CoreOutput {
    fn from(message: Message) -> Self {
        CoreOutput::One(message)
    }
}

impl From<Option<Message>> for CoreOutput {
    fn from(message: Option<Message>) -> Self {
        match message {
            Some(message) => CoreOutput::One(message),
            None => CoreOutput::Nothing,
        }
    }
}

impl From<Vec<Message>> for CoreOutput {
    fn from(messages: Vec<Message>) -> Self {
        CoreOutput::Many(messages.into_iter().map(Some).collect())
    }
}

impl From<Vec<Option<Message>>> for CoreOutput {
    fn from(messages: Vec<Option<Message>>) -> Self {
        CoreOutput::Many(messages)
    }
}

/// One core function wired to its adapters.
pub struct Component {
    pub(crate) core: Arc<dyn CoreFunction>,
    pub(crate) config: Config,
    pub(crate) input: Option<Arc<dyn MessageSource>>,
    pub(crate) output: Option<Arc<dyn MessageSink>>,
    pub(crate) store: Option<Arc<dyn PayloadStore>>,
    pub(crate) factory: AdapterFactory,
}

impl Component {
    /// Wire a component from configuration alone: whichever adapter URIs
    /// are present get wired, and the variant follows from that.
    pub fn from_config(
        core: Arc<dyn CoreFunction>,
        config: Config,
    ) -> Result<Self, ConfigError> {
        crate::engine::ComponentBuilder::new(core, config).build()
    }

    /// A component that receives from a queue and publishes results.
    pub fn pipeline(core: Arc<dyn CoreFunction>, config: Config) -> Result<Self, ConfigError> {
        let component = Self::from_config(core, config)?;
        component.require_input("pipeline")?;
        component.require_output("pipeline")?;
        Ok(component)
    }

    /// A component that generates data (e.g. an external fetch) and
    /// publishes it; it has no input and normally runs on a timer.
    pub fn source(core: Arc<dyn CoreFunction>, config: Config) -> Result<Self, ConfigError> {
        let component = Self::from_config(core, config)?;
        component.forbid_input("source")?;
        component.require_output("source")?;
        Ok(component)
    }

    /// A component that consumes messages and publishes nothing.
    pub fn sink(core: Arc<dyn CoreFunction>, config: Config) -> Result<Self, ConfigError> {
        let component = Self::from_config(core, config)?;
        component.require_input("sink")?;
        component.forbid_output("sink")?;
        Ok(component)
    }

    /// A component with neither input nor output, for arbitrary logic on
    /// a schedule.
    pub fn null(core: Arc<dyn CoreFunction>, config: Config) -> Result<Self, ConfigError> {
        let component = Self::from_config(core, config)?;
        component.forbid_input("null")?;
        component.forbid_output("null")?;
        Ok(component)
    }

    pub fn builder(core: Arc<dyn CoreFunction>, config: Config) -> crate::engine::ComponentBuilder {
        crate::engine::ComponentBuilder::new(core, config)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn has_input(&self) -> bool {
        self.input.is_some()
    }

    pub fn has_output(&self) -> bool {
        self.output.is_some()
    }

    fn require_input(&self, component: &'static str) -> Result<(), ConfigError> {
        if self.has_input() {
            Ok(())
        } else {
            Err(ConfigError::MissingOption {
                component,
                option: "input",
            })
        }
    }

    fn require_output(&self, component: &'static str) -> Result<(), ConfigError> {
        if self.has_output() {
            Ok(())
        } else {
            Err(ConfigError::MissingOption {
                component,
                option: "output",
            })
        }
    }

    fn forbid_input(&self, component: &'static str) -> Result<(), ConfigError> {
        if self.has_input() {
            Err(ConfigError::UnexpectedOption {
                component,
                option: "input",
            })
        } else {
            Ok(())
        }
    }

    fn forbid_output(&self, component: &'static str) -> Result<(), ConfigError> {
        if self.has_output() {
            Err(ConfigError::UnexpectedOption {
                component,
                option: "output",
            })
        } else {
            Ok(())
        }
    }

    /// Run one cycle, containing any failure: the error is logged, the
    /// cycle aborts without sending output or acknowledging input, and the
    /// caller's loop carries on.
    pub async fn run_once(&self) {
        if let Err(error) = self.try_run_once().await {
            CycleFailed { error: &error }.log();
        }
    }

    /// Run one cycle, propagating failures to the caller. For synchronous
    /// invocation contexts where the trigger must observe the failure.
    pub async fn try_run_once(&self) -> Result<(), ComponentError> {
        CycleStarted {
            component: self.core.name(),
        }
        .log();

        // FETCH, under scoped acquisition: the receipt is acknowledged
        // only after the rest of the cycle succeeds.
        let (message, receipt) = match &self.input {
            Some(source) => match source.get_message().await? {
                Fetch::Empty => {
                    SourceEmpty {}.log();
                    return Ok(());
                }
                Fetch::Message(delivery) => (Some(delivery.message), Some(delivery.receipt)),
            },
            None => (None, None),
        };

        self.execute_cycle(message, receipt).await
    }

    /// Run one cycle for a synchronous external trigger: the inbound event
    /// becomes the input message, there is nothing to acknowledge, and
    /// failures propagate so the trigger observes them directly.
    pub async fn try_run_event(&self, event: serde_json::Value) -> Result<(), ComponentError> {
        CycleStarted {
            component: self.core.name(),
        }
        .log();

        self.execute_cycle(Some(Message::platform_event(event)), None)
            .await
    }

    async fn execute_cycle(
        &self,
        message: Option<Message>,
        receipt: Option<Receipt>,
    ) -> Result<(), ComponentError> {
        // LINEAGE_INIT
        let parent_ingestion_id = message.as_ref().and_then(|m| m.ingestion_id.clone());
        let step = IngestionStep::begin(&self.config, parent_ingestion_id);

        let started = IngestionStepStarted {
            ingestion_id: &step.ingestion_id,
            parent_ingestion_id: step.parent_ingestion_id.as_deref(),
        };
        let span = started.span("cycle");
        started.log();

        self.run_cycle(message, receipt, step).instrument(span).await
    }

    async fn run_cycle(
        &self,
        message: Option<Message>,
        receipt: Option<Receipt>,
        mut step: IngestionStep,
    ) -> Result<(), ComponentError> {
        // RETRIEVE_BODY
        let message = match message {
            Some(message) if message.is_checked_in() => Some(self.retrieve_body(message).await?),
            other => other,
        };

        // EXECUTE
        let clock = Instant::now();
        let output = self
            .core
            .process(message, &self.config)
            .await
            .map_err(ComponentError::Core)?;
        let duration = clock.elapsed();
        CoreFunctionCompleted { duration }.log();

        // PREPARE_OUTPUT + SEND
        match &self.output {
            Some(sink) => {
                let prepared = self.prepare_out_messages(output, &step).await?;
                if !prepared.is_empty() {
                    sink.send(&prepared).await?;
                }
            }
            None => {
                if !output.is_nothing() {
                    OutputWithoutSink {}.log();
                }
            }
        }

        // Commit the scoped acquisition: the cycle succeeded, so the input
        // can be deleted from the transport.
        if let (Some(source), Some(receipt)) = (&self.input, &receipt) {
            source.ack(receipt).await?;
        }

        // TEARDOWN
        step.merge_metadata([(
            "duration_seconds".to_string(),
            serde_json::json!(duration.as_secs_f64()),
        )]);
        match step.to_json() {
            Ok(step_json) => IngestionStepRecorded {
                step_json: &step_json,
            }
            .log(),
            Err(error) => tracing::error!(error = %error, "Failed to serialize ingestion step"),
        }

        Ok(())
    }

    /// Normalize the core output into zero or more messages, stamp each
    /// with the cycle's lineage, and pass each through the offload
    /// decision.
    async fn prepare_out_messages(
        &self,
        output: CoreOutput,
        step: &IngestionStep,
    ) -> Result<Vec<Message>, ComponentError> {
        let mut prepared = Vec::new();

        for mut message in output.into_messages() {
            message.ingestion_id = Some(step.ingestion_id.clone());
            message.artifact_name = Some(step.artifact_name.clone());
            message.artifact_version = Some(step.artifact_version.clone());

            // Data assets carry the lineage id on every inner row as well.
            if let MessageBody::Data(asset) = &mut message.body {
                asset.ingestion_id = Some(step.ingestion_id.clone());
                for row in &mut asset.data {
                    row.insert(
                        "ingestion_id".to_string(),
                        serde_json::json!(step.ingestion_id),
                    );
                }
            }

            prepared.push(self.maybe_check_in(message).await?);
        }

        OutputPrepared {
            message_count: prepared.len(),
        }
        .log();
        if prepared.is_empty() {
            NoOutputMessages {}.log();
        }

        Ok(prepared)
    }

    /// The offload decision: check the message in when a store and a
    /// threshold are both configured and the message is at or over it.
    /// Re-checking-in an already-checked-in message is a no-op.
    async fn maybe_check_in(&self, message: Message) -> Result<Message, ComponentError> {
        if message.is_checked_in() {
            AlreadyCheckedIn {}.log();
            return Ok(message);
        }

        let (Some(store), Some(threshold)) = (&self.store, self.config.store_min_message_bytes)
        else {
            return Ok(message);
        };

        let approx_size = message.approx_size();
        if approx_size < threshold {
            return Ok(message);
        }

        let checked_in = store.check_in(&message).await?;
        MessageCheckedIn {
            locator: checked_in.payload_store_key.as_deref().unwrap_or("-"),
            approx_size,
        }
        .log();
        Ok(checked_in)
    }

    /// Rehydrate a checked-in input message before handing it to the core
    /// function. The locator's scheme picks the store adapter.
    async fn retrieve_body(&self, message: Message) -> Result<Message, ComponentError> {
        let locator = message
            .payload_store_key
            .clone()
            .ok_or(crate::errors::StoreError::NotCheckedIn)?;

        let store = self.factory.store_for_locator(&locator)?;
        let message = store.check_out(&message).await?;
        MessageCheckedOut { locator: &locator }.log();
        Ok(message)
    }
}
