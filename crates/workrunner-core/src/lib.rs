//! workrunner-core
//!
//! Push-queue worker core: decodes a work envelope, runs the work, and
//! decides whether the delivery infrastructure should retry, whether to
//! notify the caller's webhook, or whether to hand the work to a dead-letter
//! queue.
//!
//! # Modules
//! - **domain**: envelopes, outcomes, attempts, routing config and the pure
//!   [`OutcomeRouter`](domain::OutcomeRouter)
//! - **ports**: `WorkProcessor`, `TaskDispatcher`, `EventSink`, `Decider`
//! - **impls**: Cloud Tasks / in-memory dispatchers, reference processor, sinks
//! - **app**: `WorkerBuilder`, `WorkerService`, `DispatchExecutor`
//! - **observability**: tracing subscriber setup

pub mod app;
pub mod domain;
pub mod impls;
pub mod observability;
pub mod ports;
