//! Events - what happened while handling one request.
//!
//! Emitted through [`EventSink`](crate::ports::EventSink) so that the log
//! backend stays swappable.

use super::decision::{ResponseStatus, Route};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerEvent {
    /// Body unreadable or not a work-request envelope. Not retried.
    RequestDropped { reason: String },

    /// No attempt header; counted as attempt 0.
    AttemptHeaderMissing,

    /// Attempt header present but not a count; counted as attempt 0.
    AttemptHeaderInvalid { raw: String },

    WorkReceived {
        content_hash: String,
        source_file: String,
        webhook_url: String,
        attempt: u32,
    },

    WorkFailed { message: String, attempt: u32 },

    Routed {
        route: Route,
        status: ResponseStatus,
        attempt: u32,
        max_attempts: u32,
    },

    DispatchCreated {
        route: Route,
        queue: String,
        task_name: String,
    },

    /// Dispatch failed and was dropped. The response status is unaffected.
    DispatchFailed {
        route: Route,
        queue: String,
        error: String,
    },
}
