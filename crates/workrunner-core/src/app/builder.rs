//! WorkerBuilder - wires a [`WorkerService`] from its collaborators.
//!
//! Fail-fast: everything is validated in `build()`, at startup, so a bad
//! deployment never gets as far as taking deliveries.

use std::sync::Arc;

use super::executor::DispatchExecutor;
use super::service::WorkerService;
use crate::domain::{ConfigError, OutcomeRouter, RoutingConfig};
use crate::impls::TracingEventSink;
use crate::ports::{Decider, EventSink, TaskDispatcher, WorkProcessor};

/// # Example
/// ```ignore
/// let service = WorkerBuilder::new(RoutingConfig::from_env()?)
///     .processor(SourceFileProcessor::new())
///     .dispatcher(CloudTasksDispatcher::new(CloudTasksConfig::default()).await?)
///     .build()?;
/// ```
pub struct WorkerBuilder {
    config: RoutingConfig,
    processor: Option<Arc<dyn WorkProcessor>>,
    dispatcher: Option<Arc<dyn TaskDispatcher>>,
    sink: Option<Arc<dyn EventSink>>,
    decider: Option<Arc<dyn Decider>>,
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("no work processor registered")]
    MissingProcessor,

    #[error("no task dispatcher registered")]
    MissingDispatcher,

    #[error("invalid routing configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

impl WorkerBuilder {
    pub fn new(config: RoutingConfig) -> Self {
        Self {
            config,
            processor: None,
            dispatcher: None,
            sink: None,
            decider: None,
        }
    }

    pub fn processor(mut self, processor: impl WorkProcessor + 'static) -> Self {
        self.processor = Some(Arc::new(processor));
        self
    }

    pub fn dispatcher(self, dispatcher: impl TaskDispatcher + 'static) -> Self {
        self.shared_dispatcher(Arc::new(dispatcher))
    }

    /// Registers a dispatcher the caller keeps a handle to.
    pub fn shared_dispatcher(mut self, dispatcher: Arc<dyn TaskDispatcher>) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    /// Replaces the default [`TracingEventSink`].
    pub fn event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Replaces the default [`OutcomeRouter`] built from the config.
    pub fn decider(mut self, decider: Arc<dyn Decider>) -> Self {
        self.decider = Some(decider);
        self
    }

    pub fn build(self) -> Result<WorkerService, BuildError> {
        self.config.validate()?;
        let processor = self.processor.ok_or(BuildError::MissingProcessor)?;
        let dispatcher = self.dispatcher.ok_or(BuildError::MissingDispatcher)?;
        let sink = self
            .sink
            .unwrap_or_else(|| Arc::new(TracingEventSink::new()));
        let decider = self
            .decider
            .unwrap_or_else(|| Arc::new(OutcomeRouter::new(self.config)));

        let executor = DispatchExecutor::new(dispatcher, Arc::clone(&sink));
        Ok(WorkerService::new(processor, decider, executor, sink))
    }
}
