//! TaskDispatcher port - creates one task on a named queue.

use async_trait::async_trait;

use crate::domain::{DispatchError, DispatchInstruction};

/// A task accepted by the queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedTask {
    /// Queue-assigned task name.
    pub name: String,
}

/// Task-creation client.
///
/// Implementations make exactly one creation call per invocation and never
/// retry internally; redelivery is the caller's business.
#[async_trait]
pub trait TaskDispatcher: Send + Sync {
    async fn create_task(
        &self,
        instruction: &DispatchInstruction,
    ) -> Result<CreatedTask, DispatchError>;
}
