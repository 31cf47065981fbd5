//! Process settings: command-line flags with environment fallbacks.

use std::time::Duration;

use clap::Parser;
use workrunner_core::impls::{CloudTasksAuth, CloudTasksConfig};
use workrunner_core::observability::LogFormat;

#[derive(Debug, Clone, Parser)]
#[command(name = "workrunner", about = "Push-queue worker endpoint")]
pub struct Settings {
    /// Address to bind.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// `json` or `pretty`.
    #[arg(long, env = "LOG_FORMAT", default_value = "json")]
    pub log_format: LogFormat,

    /// Largest request body read before the request is dropped.
    #[arg(long, env = "MAX_BODY_BYTES", default_value_t = 4 * 1024 * 1024)]
    pub max_body_bytes: usize,

    #[arg(long, env = "CLOUD_TASKS_API", default_value = "https://cloudtasks.googleapis.com")]
    pub cloud_tasks_api: String,

    /// `gcp` (application default credentials) or `none`.
    #[arg(long, env = "CLOUD_TASKS_AUTH", default_value = "gcp")]
    pub cloud_tasks_auth: CloudTasksAuth,

    #[arg(long, env = "DISPATCH_TIMEOUT_SECS", default_value_t = 30)]
    pub dispatch_timeout_secs: u64,
}

impl Settings {
    pub fn cloud_tasks(&self) -> CloudTasksConfig {
        CloudTasksConfig::default()
            .with_api_base(self.cloud_tasks_api.clone())
            .with_auth(self.cloud_tasks_auth)
            .with_request_timeout(Duration::from_secs(self.dispatch_timeout_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = Settings::try_parse_from(["workrunner"]).unwrap();
        assert_eq!(settings.port, 8080);
        assert_eq!(settings.log_format, LogFormat::Json);
        assert_eq!(settings.cloud_tasks_auth, CloudTasksAuth::Gcp);
        assert_eq!(settings.max_body_bytes, 4 * 1024 * 1024);
    }

    #[test]
    fn flags_override() {
        let settings = Settings::try_parse_from([
            "workrunner",
            "--port",
            "9090",
            "--log-format",
            "pretty",
            "--cloud-tasks-auth",
            "none",
            "--dispatch-timeout-secs",
            "5",
        ])
        .unwrap();
        assert_eq!(settings.port, 9090);
        assert_eq!(settings.log_format, LogFormat::Pretty);
        let cloud_tasks = settings.cloud_tasks();
        assert_eq!(cloud_tasks.auth, CloudTasksAuth::None);
        assert_eq!(cloud_tasks.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn unknown_log_format_is_rejected() {
        assert!(Settings::try_parse_from(["workrunner", "--log-format", "xml"]).is_err());
    }
}
