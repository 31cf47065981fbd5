//! workrunner: push-queue worker endpoint.

mod server;
mod settings;
mod shutdown;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use workrunner_core::app::WorkerBuilder;
use workrunner_core::domain::RoutingConfig;
use workrunner_core::impls::{CloudTasksDispatcher, SourceFileProcessor};
use workrunner_core::observability::init_logging;

use crate::server::AppState;
use crate::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::parse();
    init_logging(settings.log_format);

    let routing = RoutingConfig::from_env().context("invalid routing configuration")?;
    info!(
        project_id = %routing.project_id,
        notifier_queue = %routing.notifier_queue,
        notifier_location = %routing.notifier_location,
        max_attempts = routing.max_attempts,
        exhaustion_policy = %routing.exhaustion_policy,
        dead_letter_queue = ?routing.dead_letter_queue,
        dead_letter_service = ?routing.dead_letter_service,
        "routing configuration loaded"
    );

    let dispatcher = CloudTasksDispatcher::new(settings.cloud_tasks())
        .await
        .context("failed to initialize Cloud Tasks dispatcher")?;

    let service = WorkerBuilder::new(routing)
        .processor(SourceFileProcessor::new())
        .dispatcher(dispatcher)
        .build()?;

    let state = AppState {
        service: Arc::new(service),
        max_body_bytes: settings.max_body_bytes,
    };

    let addr = format!("{}:{}", settings.host, settings.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, server::router(state))
        .with_graceful_shutdown(shutdown::shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}
