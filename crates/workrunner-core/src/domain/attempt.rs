//! Delivery attempts as reported by the task-delivery infrastructure.

use std::fmt;

/// Header carrying how many times Cloud Tasks has dispatched this task.
pub const TASK_EXECUTION_COUNT_HEADER: &str = "X-CloudTasks-TaskExecutionCount";

/// Number of times the delivery infrastructure has invoked the worker for one
/// logical task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeliveryAttempt(u32);

impl DeliveryAttempt {
    pub const fn new(count: u32) -> Self {
        Self(count)
    }

    pub const fn count(self) -> u32 {
        self.0
    }
}

impl fmt::Display for DeliveryAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// What the attempt header looked like on an inbound request.
///
/// A missing or unreadable header never fails the request; it counts as
/// attempt 0 and the caller is expected to log a warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptHeader {
    Present(DeliveryAttempt),
    Missing,
    Invalid(String),
}

impl AttemptHeader {
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::Missing;
        };
        match raw.trim().parse::<u32>() {
            Ok(count) => Self::Present(DeliveryAttempt::new(count)),
            Err(_) => Self::Invalid(raw.to_string()),
        }
    }

    pub fn attempt(&self) -> DeliveryAttempt {
        match self {
            Self::Present(attempt) => *attempt,
            Self::Missing | Self::Invalid(_) => DeliveryAttempt::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::zero("0", 0)]
    #[case::twenty_one("21", 21)]
    #[case::padded(" 7 ", 7)]
    fn parses_counts(#[case] raw: &str, #[case] expected: u32) {
        let header = AttemptHeader::parse(Some(raw));
        assert_eq!(header, AttemptHeader::Present(DeliveryAttempt::new(expected)));
        assert_eq!(header.attempt().count(), expected);
    }

    #[rstest]
    #[case::empty("")]
    #[case::negative("-1")]
    #[case::word("three")]
    #[case::overflow("99999999999")]
    fn unparsable_counts_as_zero(#[case] raw: &str) {
        let header = AttemptHeader::parse(Some(raw));
        assert_eq!(header, AttemptHeader::Invalid(raw.to_string()));
        assert_eq!(header.attempt(), DeliveryAttempt::new(0));
    }

    #[test]
    fn missing_counts_as_zero() {
        let header = AttemptHeader::parse(None);
        assert_eq!(header, AttemptHeader::Missing);
        assert_eq!(header.attempt().count(), 0);
    }
}
