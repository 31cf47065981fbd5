//! Decider port - outcome to routing decision.
//!
//! Deciders are pure: same inputs, same decision, no side effects.
//! Executing the decision is the entry point's job.

use crate::domain::{
    DeliveryAttempt, OutcomeRouter, ProcessingOutcome, RoutingDecision, WorkRequest,
};

pub trait Decider: Send + Sync {
    fn decide(
        &self,
        request: &WorkRequest,
        outcome: &ProcessingOutcome,
        attempt: DeliveryAttempt,
    ) -> RoutingDecision;

    /// Threshold reported alongside decisions in logs.
    fn max_attempts(&self) -> u32;
}

impl Decider for OutcomeRouter {
    fn decide(
        &self,
        request: &WorkRequest,
        outcome: &ProcessingOutcome,
        attempt: DeliveryAttempt,
    ) -> RoutingDecision {
        self.route(request, outcome, attempt)
    }

    fn max_attempts(&self) -> u32 {
        self.config().max_attempts
    }
}
