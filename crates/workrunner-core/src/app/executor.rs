//! DispatchExecutor - carries out a decision's dispatch instruction.

use std::sync::Arc;

use crate::domain::{DispatchInstruction, WorkerEvent};
use crate::ports::{CreatedTask, EventSink, TaskDispatcher};

/// Makes one task-creation call per instruction.
///
/// A failed call is logged and dropped: the response for the current delivery
/// is already decided, and the notification side is at-most-once effort.
///
/// The call runs on its own task, so dropping the `execute` future (the
/// client hung up) does not cancel a creation already in flight.
pub struct DispatchExecutor {
    dispatcher: Arc<dyn TaskDispatcher>,
    sink: Arc<dyn EventSink>,
}

impl DispatchExecutor {
    pub fn new(dispatcher: Arc<dyn TaskDispatcher>, sink: Arc<dyn EventSink>) -> Self {
        Self { dispatcher, sink }
    }

    /// Returns the created task, or `None` if the call failed.
    pub async fn execute(&self, instruction: &DispatchInstruction) -> Option<CreatedTask> {
        let dispatcher = Arc::clone(&self.dispatcher);
        let sink = Arc::clone(&self.sink);
        let detached = instruction.clone();
        let call = tokio::spawn(async move {
            create_and_report(dispatcher.as_ref(), sink.as_ref(), &detached).await
        });

        match call.await {
            Ok(created) => created,
            Err(err) => {
                self.sink.emit(WorkerEvent::DispatchFailed {
                    route: instruction.route,
                    queue: instruction.queue.clone(),
                    error: format!("dispatch task aborted: {err}"),
                });
                None
            }
        }
    }
}

async fn create_and_report(
    dispatcher: &dyn TaskDispatcher,
    sink: &dyn EventSink,
    instruction: &DispatchInstruction,
) -> Option<CreatedTask> {
    match dispatcher.create_task(instruction).await {
        Ok(created) => {
            sink.emit(WorkerEvent::DispatchCreated {
                route: instruction.route,
                queue: instruction.queue.clone(),
                task_name: created.name.clone(),
            });
            Some(created)
        }
        Err(err) => {
            sink.emit(WorkerEvent::DispatchFailed {
                route: instruction.route,
                queue: instruction.queue.clone(),
                error: err.to_string(),
            });
            None
        }
    }
}
