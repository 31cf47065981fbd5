//! Domain model (envelopes, outcomes, attempts, routing decisions, ...).

pub mod attempt;
pub mod config;
pub mod decision;
pub mod envelope;
pub mod errors;
pub mod events;
pub mod outcome;

pub use attempt::{AttemptHeader, DeliveryAttempt, TASK_EXECUTION_COUNT_HEADER};
pub use config::{ExhaustionPolicy, RoutingConfig};
pub use decision::{DispatchInstruction, OutcomeRouter, ResponseStatus, Route, RoutingDecision};
pub use envelope::{WorkRequest, WorkResponse};
pub use errors::{CodecError, ConfigError, DispatchError};
pub use events::WorkerEvent;
pub use outcome::ProcessingOutcome;
