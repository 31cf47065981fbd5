//! EventSink implementations.
//!
//! - [`TracingEventSink`]: structured `tracing` events (JSON in the cloud,
//!   pretty on a console; see [`crate::observability`]).
//! - [`RecordingEventSink`]: keeps events in memory for assertions.

use std::sync::{Mutex, PoisonError};

use tracing::{info, warn};

use crate::domain::WorkerEvent;
use crate::ports::EventSink;

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl TracingEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for TracingEventSink {
    fn emit(&self, event: WorkerEvent) {
        match event {
            WorkerEvent::RequestDropped { reason } => {
                warn!(%reason, "dropping work request, not retrying");
            }
            WorkerEvent::AttemptHeaderMissing => {
                warn!("cannot read X-CloudTasks-TaskExecutionCount header, assuming attempt 0");
            }
            WorkerEvent::AttemptHeaderInvalid { raw } => {
                warn!(
                    header = %raw,
                    "cannot parse X-CloudTasks-TaskExecutionCount header, assuming attempt 0"
                );
            }
            WorkerEvent::WorkReceived {
                content_hash,
                source_file,
                webhook_url,
                attempt,
            } => {
                info!(
                    %content_hash,
                    %source_file,
                    %webhook_url,
                    attempt,
                    "processing work request"
                );
            }
            WorkerEvent::WorkFailed { message, attempt } => {
                warn!(error = %message, attempt, "work failed");
            }
            WorkerEvent::Routed {
                route,
                status,
                attempt,
                max_attempts,
            } => {
                if route.exhausted() {
                    warn!(
                        route = %route,
                        status = status.as_u16(),
                        attempt,
                        max_attempts,
                        "max attempts reached"
                    );
                } else {
                    info!(
                        route = %route,
                        status = status.as_u16(),
                        attempt,
                        max_attempts,
                        "work routed"
                    );
                }
            }
            WorkerEvent::DispatchCreated {
                route,
                queue,
                task_name,
            } => {
                info!(route = %route, %queue, %task_name, "task created");
            }
            WorkerEvent::DispatchFailed {
                route,
                queue,
                error,
            } => {
                warn!(route = %route, %queue, %error, "task creation failed, dropping dispatch");
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<WorkerEvent>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<WorkerEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl EventSink for RecordingEventSink {
    fn emit(&self, event: WorkerEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}
