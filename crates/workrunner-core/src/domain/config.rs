//! Routing configuration, resolved once at startup.

use std::fmt;
use std::str::FromStr;

use super::attempt::DeliveryAttempt;
use super::errors::ConfigError;

pub const DEFAULT_PROJECT_ID: &str = "moraisworkrunner";
pub const DEFAULT_NOTIFIER_QUEUE: &str = "queue";
pub const DEFAULT_NOTIFIER_LOCATION: &str = "nowhere";
pub const DEFAULT_MAX_ATTEMPTS: u32 = 20;

/// How the attempt count is compared against `max_attempts`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExhaustionPolicy {
    /// Exhausted once more attempts were made than the threshold allows.
    /// Monotone: a skipped or repeated attempt number cannot hide exhaustion.
    #[default]
    Exceeds,
    /// Exhausted only on the attempt equal to the threshold.
    Equals,
}

impl ExhaustionPolicy {
    pub fn is_exhausted(self, attempt: DeliveryAttempt, max_attempts: u32) -> bool {
        match self {
            Self::Exceeds => attempt.count() > max_attempts,
            Self::Equals => attempt.count() == max_attempts,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Exceeds => "exceeds",
            Self::Equals => "equals",
        }
    }
}

impl fmt::Display for ExhaustionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExhaustionPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exceeds" => Ok(Self::Exceeds),
            "equals" => Ok(Self::Equals),
            _ => Err(ConfigError::UnknownVariant {
                name: "EXHAUSTION_POLICY",
                expected: "exceeds, equals",
                value: s.to_string(),
            }),
        }
    }
}

/// Everything the router needs to turn an outcome into a decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingConfig {
    pub project_id: String,
    pub notifier_queue: String,
    pub notifier_location: String,
    pub max_attempts: u32,
    pub exhaustion_policy: ExhaustionPolicy,
    /// Queue for work that ran out of retries.
    pub dead_letter_queue: Option<String>,
    /// Service that consumes the dead-letter queue.
    pub dead_letter_service: Option<String>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            project_id: DEFAULT_PROJECT_ID.to_string(),
            notifier_queue: DEFAULT_NOTIFIER_QUEUE.to_string(),
            notifier_location: DEFAULT_NOTIFIER_LOCATION.to_string(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            exhaustion_policy: ExhaustionPolicy::default(),
            dead_letter_queue: None,
            dead_letter_service: None,
        }
    }
}

impl RoutingConfig {
    /// Loads from process environment.
    ///
    /// # Environment Variables
    ///
    /// - `PROJECT_ID` (default `moraisworkrunner`)
    /// - `NOTIFIER_QUEUE` (default `queue`)
    /// - `NOTIFIER_LOCATION` (default `nowhere`)
    /// - `MAX_ATTEMPTS` (default `20`; unparsable values fall back to the default)
    /// - `EXHAUSTION_POLICY` (`exceeds` or `equals`, default `exceeds`)
    /// - `PROBLEM_QUEUE`, `PROBLEM_SERVICE` (dead-letter destination, unset by default)
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown `EXHAUSTION_POLICY`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads from an arbitrary variable lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name).and_then(|v| {
                let trimmed = v.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            })
        };

        let mut config = Self::default();

        if let Some(project_id) = get("PROJECT_ID") {
            config.project_id = project_id;
        }
        if let Some(queue) = get("NOTIFIER_QUEUE") {
            config.notifier_queue = queue;
        }
        if let Some(location) = get("NOTIFIER_LOCATION") {
            config.notifier_location = location;
        }
        if let Some(raw) = get("MAX_ATTEMPTS") {
            match raw.parse::<u32>() {
                Ok(max_attempts) => config.max_attempts = max_attempts,
                Err(e) => tracing::warn!(
                    value = %raw,
                    error = %e,
                    default = DEFAULT_MAX_ATTEMPTS,
                    "MAX_ATTEMPTS is not a non-negative integer, using default"
                ),
            }
        }
        if let Some(policy) = get("EXHAUSTION_POLICY") {
            config.exhaustion_policy = policy.parse()?;
        }
        config.dead_letter_queue = get("PROBLEM_QUEUE");
        config.dead_letter_service = get("PROBLEM_SERVICE");

        Ok(config)
    }

    /// Checks the fields dispatch depends on.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Empty`] for the first blank required field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.project_id.trim().is_empty() {
            return Err(ConfigError::Empty("project_id"));
        }
        if self.notifier_queue.trim().is_empty() {
            return Err(ConfigError::Empty("notifier_queue"));
        }
        if self.notifier_location.trim().is_empty() {
            return Err(ConfigError::Empty("notifier_location"));
        }
        Ok(())
    }

    /// The dead-letter queue and service, only when both are set.
    pub fn dead_letter(&self) -> Option<(&str, &str)> {
        match (&self.dead_letter_queue, &self.dead_letter_service) {
            (Some(queue), Some(service)) if !queue.is_empty() && !service.is_empty() => {
                Some((queue.as_str(), service.as_str()))
            }
            _ => None,
        }
    }

    pub fn is_exhausted(&self, attempt: DeliveryAttempt) -> bool {
        self.exhaustion_policy.is_exhausted(attempt, self.max_attempts)
    }
}
