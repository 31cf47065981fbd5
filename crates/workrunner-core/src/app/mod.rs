//! App - ties the ports together into the request pipeline.
//!
//! # Components
//! - **WorkerBuilder**: wiring and startup validation
//! - **WorkerService**: decode → process → route → dispatch, per request
//! - **DispatchExecutor**: one task-creation call, failures logged and dropped

pub mod builder;
pub mod executor;
pub mod service;

pub use self::builder::{BuildError, WorkerBuilder};
pub use self::executor::DispatchExecutor;
pub use self::service::WorkerService;
