//! Impls - adapters behind the ports.
//!
//! # Included
//! - **CloudTasksDispatcher**: production task creation (Cloud Tasks REST API)
//! - **InMemoryDispatcher**: records dispatches, for tests and local runs
//! - **SourceFileProcessor**: reference work processor
//! - **TracingEventSink** / **RecordingEventSink**: log backends

pub mod cloud_tasks;
pub mod event_sink;
pub mod memory;
pub mod source_file;

pub use self::cloud_tasks::{CloudTasksAuth, CloudTasksConfig, CloudTasksDispatcher};
pub use self::event_sink::{RecordingEventSink, TracingEventSink};
pub use self::memory::InMemoryDispatcher;
pub use self::source_file::SourceFileProcessor;
