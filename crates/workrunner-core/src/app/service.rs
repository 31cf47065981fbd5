//! WorkerService - the request pipeline behind the HTTP endpoint.
//!
//! decode → process → route → dispatch → status. Framework-agnostic: the
//! server hands in the body and the attempt header and writes back the
//! returned status.

use std::sync::Arc;

use bytes::Bytes;

use super::executor::DispatchExecutor;
use crate::domain::{
    AttemptHeader, CodecError, ResponseStatus, RoutingDecision, WorkRequest, WorkerEvent,
};
use crate::ports::{Decider, EventSink, WorkProcessor};

pub struct WorkerService {
    processor: Arc<dyn WorkProcessor>,
    decider: Arc<dyn Decider>,
    executor: DispatchExecutor,
    sink: Arc<dyn EventSink>,
}

impl WorkerService {
    pub fn new(
        processor: Arc<dyn WorkProcessor>,
        decider: Arc<dyn Decider>,
        executor: DispatchExecutor,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            processor,
            decider,
            executor,
            sink,
        }
    }

    /// Handles one delivery.
    ///
    /// `body` is `Err` when the transport could not read the request body.
    /// `attempt_header` is the raw `X-CloudTasks-TaskExecutionCount` value.
    ///
    /// The decision's dispatch, if any, runs here before returning, on every
    /// path. Its failure never changes the returned status.
    pub async fn handle(
        &self,
        body: Result<Bytes, CodecError>,
        attempt_header: Option<&str>,
    ) -> ResponseStatus {
        let decision = self.decide(body, attempt_header).await;

        if let Some(instruction) = decision.dispatch() {
            self.executor.execute(instruction).await;
        }

        decision.status()
    }

    async fn decide(
        &self,
        body: Result<Bytes, CodecError>,
        attempt_header: Option<&str>,
    ) -> RoutingDecision {
        let request = match body.and_then(WorkRequest::decode) {
            Ok(request) => request,
            Err(err) => {
                self.sink.emit(WorkerEvent::RequestDropped {
                    reason: err.to_string(),
                });
                return RoutingDecision::dropped();
            }
        };

        let header = AttemptHeader::parse(attempt_header);
        match &header {
            AttemptHeader::Present(_) => {}
            AttemptHeader::Missing => self.sink.emit(WorkerEvent::AttemptHeaderMissing),
            AttemptHeader::Invalid(raw) => {
                self.sink
                    .emit(WorkerEvent::AttemptHeaderInvalid { raw: raw.clone() });
            }
        }
        let attempt = header.attempt();

        self.sink.emit(WorkerEvent::WorkReceived {
            content_hash: request.content_hash().to_string(),
            source_file: request.source_file().to_string(),
            webhook_url: request.webhook_url().to_string(),
            attempt: attempt.count(),
        });

        let outcome = self.processor.process(&request).await;
        if let Some(message) = outcome.failure_message() {
            self.sink.emit(WorkerEvent::WorkFailed {
                message: message.to_string(),
                attempt: attempt.count(),
            });
        }

        let decision = self.decider.decide(&request, &outcome, attempt);
        self.sink.emit(WorkerEvent::Routed {
            route: decision.route(),
            status: decision.status(),
            attempt: attempt.count(),
            max_attempts: self.decider.max_attempts(),
        });
        decision
    }
}
