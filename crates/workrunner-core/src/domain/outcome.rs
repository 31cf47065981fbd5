//! Outcome model: the result of processing one work request.

/// The result of running the work processor once.
///
/// Failures are data, not control flow: the router decides what a failure
/// means based on the delivery history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessingOutcome {
    Success,
    Failure(String),
}

impl ProcessingOutcome {
    pub fn success() -> Self {
        Self::Success
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure(message.into())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    pub fn failure_message(&self) -> Option<&str> {
        match self {
            Self::Success => None,
            Self::Failure(message) => Some(message),
        }
    }
}
