//! Decision model: where a processed request goes next.
//!
//! [`OutcomeRouter`] is a pure function of (request, outcome, attempt, config).
//! It performs no I/O and reads no environment; the entry point executes
//! whatever it decides.

use std::fmt;

use bytes::Bytes;

use super::attempt::DeliveryAttempt;
use super::config::RoutingConfig;
use super::envelope::{WorkRequest, WorkResponse};
use super::outcome::ProcessingOutcome;

/// HTTP status returned to the delivery infrastructure.
///
/// Any 2xx stops redelivery; anything else asks for a retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseStatus {
    /// Request dropped as permanently unprocessable.
    Ok,
    /// Work finished or was handed off.
    Accepted,
    /// Work failed; deliver again later.
    InternalServerError,
}

impl ResponseStatus {
    pub const fn as_u16(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::Accepted => 202,
            Self::InternalServerError => 500,
        }
    }
}

/// Which branch of the routing table a decision came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Success notification to the notifier queue.
    NotifySuccess,
    /// Failure with retries left; no dispatch.
    Retry,
    /// Retries exhausted, no dead-letter path: failure notification.
    NotifyFailure,
    /// Retries exhausted: original request handed to the dead-letter queue.
    DeadLetter,
    /// Undecodable input; no dispatch, no retry.
    Drop,
}

impl Route {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotifySuccess => "notify_success",
            Self::Retry => "retry",
            Self::NotifyFailure => "notify_failure",
            Self::DeadLetter => "dead_letter",
            Self::Drop => "drop",
        }
    }

    pub fn exhausted(self) -> bool {
        matches!(self, Self::NotifyFailure | Self::DeadLetter)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One task to create on the task queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchInstruction {
    pub route: Route,
    pub project_id: String,
    pub location: String,
    pub queue: String,
    /// URL the created task will POST the payload to.
    pub target: String,
    pub payload: Bytes,
}

/// Router output: the status to answer with and at most one dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingDecision {
    route: Route,
    status: ResponseStatus,
    dispatch: Option<DispatchInstruction>,
}

impl RoutingDecision {
    /// Decision for input that could not be decoded.
    pub fn dropped() -> Self {
        Self {
            route: Route::Drop,
            status: ResponseStatus::Ok,
            dispatch: None,
        }
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn status(&self) -> ResponseStatus {
        self.status
    }

    pub fn dispatch(&self) -> Option<&DispatchInstruction> {
        self.dispatch.as_ref()
    }
}

/// Maps processing outcomes to routing decisions.
///
/// | outcome | exhausted | dead-letter set | status | dispatch                      |
/// |---------|-----------|-----------------|--------|-------------------------------|
/// | success | -         | -               | 202    | notifier, response            |
/// | failure | no        | -               | 500    | none                          |
/// | failure | yes       | yes             | 202    | dead-letter, original bytes   |
/// | failure | yes       | no              | 500    | notifier, response with error |
#[derive(Debug, Clone)]
pub struct OutcomeRouter {
    config: RoutingConfig,
}

impl OutcomeRouter {
    pub fn new(config: RoutingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    pub fn route(
        &self,
        request: &WorkRequest,
        outcome: &ProcessingOutcome,
        attempt: DeliveryAttempt,
    ) -> RoutingDecision {
        let message = match outcome {
            ProcessingOutcome::Success => {
                let response = WorkResponse::for_request(request);
                return RoutingDecision {
                    route: Route::NotifySuccess,
                    status: ResponseStatus::Accepted,
                    dispatch: Some(self.notify(request, &response, Route::NotifySuccess)),
                };
            }
            ProcessingOutcome::Failure(message) => message,
        };

        if !self.config.is_exhausted(attempt) {
            return RoutingDecision {
                route: Route::Retry,
                status: ResponseStatus::InternalServerError,
                dispatch: None,
            };
        }

        if let Some((queue, service)) = self.config.dead_letter() {
            return RoutingDecision {
                route: Route::DeadLetter,
                status: ResponseStatus::Accepted,
                dispatch: Some(DispatchInstruction {
                    route: Route::DeadLetter,
                    project_id: self.config.project_id.clone(),
                    location: self.config.notifier_location.clone(),
                    queue: queue.to_string(),
                    target: service.to_string(),
                    payload: request.raw_bytes().clone(),
                }),
            };
        }

        let response = WorkResponse::for_request(request).with_error(message.clone());
        RoutingDecision {
            route: Route::NotifyFailure,
            status: ResponseStatus::InternalServerError,
            dispatch: Some(self.notify(request, &response, Route::NotifyFailure)),
        }
    }

    fn notify(
        &self,
        request: &WorkRequest,
        response: &WorkResponse,
        route: Route,
    ) -> DispatchInstruction {
        DispatchInstruction {
            route,
            project_id: self.config.project_id.clone(),
            location: self.config.notifier_location.clone(),
            queue: self.config.notifier_queue.clone(),
            target: request.webhook_url().to_string(),
            payload: response.encode(),
        }
    }
}
