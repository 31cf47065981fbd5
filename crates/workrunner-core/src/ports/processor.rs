//! WorkProcessor port - the business work performed on a request.

use async_trait::async_trait;

use crate::domain::{ProcessingOutcome, WorkRequest};

/// Runs the unit of work once.
///
/// Failures come back as [`ProcessingOutcome::Failure`], never as `Err`.
#[async_trait]
pub trait WorkProcessor: Send + Sync {
    async fn process(&self, request: &WorkRequest) -> ProcessingOutcome;
}
