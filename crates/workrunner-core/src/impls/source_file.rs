//! SourceFileProcessor - reference work processor.
//!
//! Stands in for real work: accepts any source reference except the literal
//! `"invalid"`, which lets callers exercise the failure and retry paths.

use async_trait::async_trait;

use crate::domain::{ProcessingOutcome, WorkRequest};
use crate::ports::WorkProcessor;

pub const INVALID_SOURCE_FILE: &str = "invalid";

#[derive(Debug, Clone, Default)]
pub struct SourceFileProcessor;

impl SourceFileProcessor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl WorkProcessor for SourceFileProcessor {
    async fn process(&self, request: &WorkRequest) -> ProcessingOutcome {
        if request.source_file() == INVALID_SOURCE_FILE {
            return ProcessingOutcome::failure("Error: invalid source file");
        }
        ProcessingOutcome::success()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::envelope::SvcWorkRequest;
    use bytes::Bytes;
    use prost::Message;
    use rstest::rstest;

    fn request(source_file: &str) -> WorkRequest {
        let envelope = SvcWorkRequest {
            source_file: source_file.to_string(),
            ..SvcWorkRequest::default()
        };
        WorkRequest::decode(Bytes::from(envelope.encode_to_vec())).unwrap()
    }

    #[tokio::test]
    async fn invalid_source_fails() {
        let outcome = SourceFileProcessor::new().process(&request("invalid")).await;
        assert_eq!(outcome, ProcessingOutcome::failure("Error: invalid source file"));
    }

    #[rstest]
    #[case::bucket("gs://bucket/data.csv")]
    #[case::empty("")]
    #[case::case_sensitive("INVALID")]
    #[tokio::test]
    async fn other_sources_succeed(#[case] source_file: &str) {
        let outcome = SourceFileProcessor::new().process(&request(source_file)).await;
        assert!(outcome.is_success());
    }
}
