//! InMemoryDispatcher - records dispatches instead of sending them.
//!
//! For tests and local runs without a task queue. Can be told to fail every
//! call to exercise the dropped-dispatch path.

use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::domain::{DispatchError, DispatchInstruction};
use crate::ports::{CreatedTask, TaskDispatcher};

#[derive(Debug, Default)]
pub struct InMemoryDispatcher {
    created: RwLock<Vec<DispatchInstruction>>,
    fail_with: Option<String>,
}

impl InMemoryDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// A dispatcher whose every call fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            created: RwLock::new(Vec::new()),
            fail_with: Some(message.into()),
        }
    }

    /// Instructions dispatched so far, in call order.
    pub fn created(&self) -> Vec<DispatchInstruction> {
        self.created
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.created
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl TaskDispatcher for InMemoryDispatcher {
    async fn create_task(
        &self,
        instruction: &DispatchInstruction,
    ) -> Result<CreatedTask, DispatchError> {
        if let Some(message) = &self.fail_with {
            return Err(DispatchError::Rejected(message.clone()));
        }

        let mut created = self
            .created
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        created.push(instruction.clone());
        let name = format!(
            "projects/{}/locations/{}/queues/{}/tasks/{}",
            instruction.project_id,
            instruction.location,
            instruction.queue,
            created.len()
        );
        Ok(CreatedTask { name })
    }
}
