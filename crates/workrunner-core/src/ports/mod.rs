//! Ports - seams between the routing core and the outside world.
//!
//! Each trait hides one collaborator: the business work, the task queue,
//! the log backend, and the decision function itself.

pub mod decider;
pub mod dispatch;
pub mod event_sink;
pub mod processor;

pub use self::decider::Decider;
pub use self::dispatch::{CreatedTask, TaskDispatcher};
pub use self::event_sink::EventSink;
pub use self::processor::WorkProcessor;
