//! Google Cloud Tasks dispatcher.
//!
//! Creates HTTP-target tasks through the Cloud Tasks v2 REST API:
//!
//! ```text
//! POST {api_base}/v2/projects/{project}/locations/{location}/queues/{queue}/tasks
//! ```
//!
//! The payload is sent base64-encoded as the task body and POSTed to the
//! instruction's target by Cloud Tasks. Task names are left to the queue.
//!
//! Authentication uses application default credentials through `gcp_auth`.
//! [`CloudTasksAuth::None`] skips it, for local emulators.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use gcp_auth::TokenProvider;
use serde::{Deserialize, Serialize};

use crate::domain::{ConfigError, DispatchError, DispatchInstruction};
use crate::ports::{CreatedTask, TaskDispatcher};

pub const DEFAULT_API_BASE: &str = "https://cloudtasks.googleapis.com";
pub const CLOUD_TASKS_SCOPE: &str = "https://www.googleapis.com/auth/cloud-tasks";
pub const PAYLOAD_CONTENT_TYPE: &str = "application/x-protobuf";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CloudTasksAuth {
    /// Bearer token from application default credentials.
    #[default]
    Gcp,
    /// No authorization header.
    None,
}

impl FromStr for CloudTasksAuth {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gcp" => Ok(Self::Gcp),
            "none" => Ok(Self::None),
            _ => Err(ConfigError::UnknownVariant {
                name: "CLOUD_TASKS_AUTH",
                expected: "gcp, none",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CloudTasksConfig {
    pub api_base: String,
    pub auth: CloudTasksAuth,
    /// Upper bound on one creation call.
    pub request_timeout: Duration,
}

impl Default for CloudTasksConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            auth: CloudTasksAuth::default(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl CloudTasksConfig {
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_auth(mut self, auth: CloudTasksAuth) -> Self {
        self.auth = auth;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Cloud Tasks API request body for creating a task.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateTaskRequest {
    task: CloudTask,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CloudTask {
    http_request: HttpRequest,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HttpRequest {
    url: String,
    http_method: &'static str,
    headers: HashMap<&'static str, &'static str>,
    /// Base64 encoded.
    body: String,
}

#[derive(Debug, Deserialize)]
struct CloudTasksErrorResponse {
    error: CloudTasksError,
}

#[derive(Debug, Deserialize)]
struct CloudTasksError {
    message: String,
    #[serde(default)]
    status: String,
}

#[derive(Debug, Deserialize)]
struct CloudTasksSuccessResponse {
    name: String,
}

pub struct CloudTasksDispatcher {
    config: CloudTasksConfig,
    token_provider: Option<Arc<dyn TokenProvider>>,
    client: reqwest::Client,
}

impl fmt::Debug for CloudTasksDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudTasksDispatcher")
            .field("config", &self.config)
            .field(
                "token_provider",
                &self.token_provider.as_ref().map(|_| "<TokenProvider>"),
            )
            .finish_non_exhaustive()
    }
}

impl CloudTasksDispatcher {
    /// Creates a dispatcher, discovering credentials when auth is enabled.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Configuration`] for an empty API base, a zero
    /// timeout, missing credentials, or an HTTP client that cannot be built.
    pub async fn new(config: CloudTasksConfig) -> Result<Self, DispatchError> {
        let token_provider = match config.auth {
            CloudTasksAuth::Gcp => Some(gcp_auth::provider().await.map_err(|e| {
                DispatchError::Configuration(format!("failed to initialize GCP auth: {e}"))
            })?),
            CloudTasksAuth::None => None,
        };
        Self::with_token_provider(config, token_provider)
    }

    /// Creates a dispatcher with an explicit (or no) token provider.
    ///
    /// # Errors
    ///
    /// Same as [`CloudTasksDispatcher::new`], minus credential discovery.
    pub fn with_token_provider(
        config: CloudTasksConfig,
        token_provider: Option<Arc<dyn TokenProvider>>,
    ) -> Result<Self, DispatchError> {
        if config.api_base.trim().is_empty() {
            return Err(DispatchError::Configuration(
                "api_base cannot be empty".to_string(),
            ));
        }
        if config.request_timeout.is_zero() {
            return Err(DispatchError::Configuration(
                "request_timeout must be greater than zero".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| {
                DispatchError::Configuration(format!("failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            config,
            token_provider,
            client,
        })
    }

    pub fn queue_path(instruction: &DispatchInstruction) -> String {
        format!(
            "projects/{}/locations/{}/queues/{}",
            instruction.project_id, instruction.location, instruction.queue
        )
    }

    fn tasks_url(&self, instruction: &DispatchInstruction) -> String {
        format!(
            "{}/v2/{}/tasks",
            self.config.api_base.trim_end_matches('/'),
            Self::queue_path(instruction)
        )
    }

    fn build_request(instruction: &DispatchInstruction) -> CreateTaskRequest {
        let mut headers = HashMap::new();
        headers.insert("Content-Type", PAYLOAD_CONTENT_TYPE);

        CreateTaskRequest {
            task: CloudTask {
                http_request: HttpRequest {
                    url: instruction.target.clone(),
                    http_method: "POST",
                    headers,
                    body: base64::engine::general_purpose::STANDARD.encode(&instruction.payload),
                },
            },
        }
    }

    async fn access_token(&self) -> Result<Option<String>, DispatchError> {
        let Some(provider) = &self.token_provider else {
            return Ok(None);
        };
        let token = provider
            .token(&[CLOUD_TASKS_SCOPE])
            .await
            .map_err(|e| DispatchError::Auth(e.to_string()))?;
        Ok(Some(token.as_str().to_string()))
    }
}

#[async_trait]
impl TaskDispatcher for CloudTasksDispatcher {
    async fn create_task(
        &self,
        instruction: &DispatchInstruction,
    ) -> Result<CreatedTask, DispatchError> {
        let request = Self::build_request(instruction);

        let mut call = self.client.post(self.tasks_url(instruction)).json(&request);
        if let Some(token) = self.access_token().await? {
            call = call.bearer_auth(token);
        }

        let response = call
            .send()
            .await
            .map_err(|e| DispatchError::Transport(e.to_string()))?;
        let status = response.status();

        if status.is_success() {
            let created: CloudTasksSuccessResponse = response.json().await.map_err(|e| {
                DispatchError::Transport(format!("failed to parse success response: {e}"))
            })?;
            return Ok(CreatedTask { name: created.name });
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        let message = match serde_json::from_str::<CloudTasksErrorResponse>(&body) {
            Ok(parsed) if parsed.error.status.is_empty() => parsed.error.message,
            Ok(parsed) => format!("{} ({})", parsed.error.message, parsed.error.status),
            Err(_) => body,
        };
        Err(DispatchError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
