//! EventSink port - where worker events are recorded.

use crate::domain::WorkerEvent;

/// Log capability injected into the entry point and the dispatch executor.
///
/// Emitting must not fail or block on I/O the caller could observe.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: WorkerEvent);
}
