//! Envelope codec: protobuf work-request / work-response messages.
//!
//! The wire messages mirror the `work_messages` protobuf package shared with
//! the job submitter and the notifier. [`WorkRequest`] and [`WorkResponse`]
//! are the domain views the rest of the crate works with.

use bytes::Bytes;
use prost::Message;

use super::errors::CodecError;

/// Content metadata attached by the submitter.
#[derive(Clone, PartialEq, Message)]
pub struct FileMetadata {
    #[prost(string, tag = "1")]
    pub md5: String,
}

/// Inbound work envelope.
#[derive(Clone, PartialEq, Message)]
pub struct SvcWorkRequest {
    #[prost(message, optional, tag = "1")]
    pub file_metadata: Option<FileMetadata>,
    #[prost(string, tag = "2")]
    pub source_file: String,
    /// Opaque caller context, echoed back in the response.
    #[prost(bytes = "vec", tag = "3")]
    pub context: Vec<u8>,
    #[prost(string, tag = "4")]
    pub webhook_url: String,
}

#[derive(Clone, PartialEq, Message)]
pub struct WorkError {
    #[prost(string, tag = "1")]
    pub message: String,
}

/// Outbound result envelope delivered to the webhook through the notifier.
#[derive(Clone, PartialEq, Message)]
pub struct SvcWorkResponse {
    #[prost(bytes = "vec", tag = "1")]
    pub context: Vec<u8>,
    #[prost(message, optional, tag = "2")]
    pub error: Option<WorkError>,
}

/// A decoded work request together with the exact bytes it arrived as.
///
/// The raw bytes are kept so that dead-lettered work can be handed on
/// unmodified.
#[derive(Debug, Clone)]
pub struct WorkRequest {
    envelope: SvcWorkRequest,
    raw: Bytes,
}

impl WorkRequest {
    pub fn decode(raw: Bytes) -> Result<Self, CodecError> {
        let envelope = SvcWorkRequest::decode(raw.clone())?;
        Ok(Self { envelope, raw })
    }

    /// Content hash of the payload, empty when the submitter sent none.
    pub fn content_hash(&self) -> &str {
        self.envelope
            .file_metadata
            .as_ref()
            .map_or("", |m| m.md5.as_str())
    }

    pub fn source_file(&self) -> &str {
        &self.envelope.source_file
    }

    pub fn context(&self) -> &[u8] {
        &self.envelope.context
    }

    pub fn webhook_url(&self) -> &str {
        &self.envelope.webhook_url
    }

    pub fn raw_bytes(&self) -> &Bytes {
        &self.raw
    }
}

/// Result notification for one work request.
///
/// `context` is fixed at construction; there is no way to change it afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkResponse {
    context: Vec<u8>,
    error: Option<String>,
}

impl WorkResponse {
    /// Starts a response that echoes the request's context.
    pub fn for_request(request: &WorkRequest) -> Self {
        Self {
            context: request.context().to_vec(),
            error: None,
        }
    }

    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error = Some(message.into());
        self
    }

    pub fn context(&self) -> &[u8] {
        &self.context
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn to_envelope(&self) -> SvcWorkResponse {
        SvcWorkResponse {
            context: self.context.clone(),
            error: self.error.as_ref().map(|message| WorkError {
                message: message.clone(),
            }),
        }
    }

    pub fn encode(&self) -> Bytes {
        Bytes::from(self.to_envelope().encode_to_vec())
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        let envelope = SvcWorkResponse::decode(bytes)?;
        Ok(Self {
            context: envelope.context,
            error: envelope.error.map(|e| e.message),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_request() -> SvcWorkRequest {
        SvcWorkRequest {
            file_metadata: Some(FileMetadata {
                md5: "9e107d9d372bb6826bd81d3542a419d6".to_string(),
            }),
            source_file: "gs://bucket/input.csv".to_string(),
            context: b"ctx-42".to_vec(),
            webhook_url: "https://example.com/hook".to_string(),
        }
    }

    #[test]
    fn decode_keeps_raw_bytes_and_fields() {
        let raw = Bytes::from(sample_request().encode_to_vec());
        let request = WorkRequest::decode(raw.clone()).unwrap();

        assert_eq!(request.raw_bytes(), &raw);
        assert_eq!(request.content_hash(), "9e107d9d372bb6826bd81d3542a419d6");
        assert_eq!(request.source_file(), "gs://bucket/input.csv");
        assert_eq!(request.context(), b"ctx-42");
        assert_eq!(request.webhook_url(), "https://example.com/hook");
    }

    #[test]
    fn missing_metadata_yields_empty_hash() {
        let mut envelope = sample_request();
        envelope.file_metadata = None;
        let request = WorkRequest::decode(Bytes::from(envelope.encode_to_vec())).unwrap();
        assert_eq!(request.content_hash(), "");
    }

    #[test]
    fn garbage_is_malformed() {
        let err = WorkRequest::decode(Bytes::from_static(b"not a protobuf")).unwrap_err();
        assert!(matches!(err, CodecError::Malformed(_)));
    }

    #[test]
    fn response_echoes_context_and_carries_error() {
        let request = WorkRequest::decode(Bytes::from(sample_request().encode_to_vec())).unwrap();
        let response = WorkResponse::for_request(&request).with_error("boom");

        let back = WorkResponse::decode(&response.encode()).unwrap();
        assert_eq!(back.context(), b"ctx-42");
        assert_eq!(back.error(), Some("boom"));
    }

    #[test]
    fn success_response_has_no_error_field_on_the_wire() {
        let request = WorkRequest::decode(Bytes::from(sample_request().encode_to_vec())).unwrap();
        let envelope = WorkResponse::for_request(&request).to_envelope();
        assert!(envelope.error.is_none());
    }
}
