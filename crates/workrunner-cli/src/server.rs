//! HTTP surface: the push endpoint and a health probe.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;
use workrunner_core::app::WorkerService;
use workrunner_core::domain::{CodecError, ResponseStatus, TASK_EXECUTION_COUNT_HEADER};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<WorkerService>,
    pub max_body_bytes: usize,
}

/// Routes:
/// - `POST /` -- work delivery from the task queue
/// - `GET /healthz` -- liveness probe
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", post(work_handler))
        .route("/healthz", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Reads the body itself so that a failed read goes down the same
/// drop-without-retry path as a malformed envelope.
async fn work_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Body,
) -> StatusCode {
    let body = axum::body::to_bytes(body, state.max_body_bytes)
        .await
        .map_err(|e| CodecError::Unreadable(e.to_string()));
    let attempt = headers
        .get(TASK_EXECUTION_COUNT_HEADER)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());

    let status = state.service.handle(body, attempt.as_deref()).await;
    status_code(status)
}

async fn health_handler() -> StatusCode {
    StatusCode::OK
}

fn status_code(status: ResponseStatus) -> StatusCode {
    match status {
        ResponseStatus::Ok => StatusCode::OK,
        ResponseStatus::Accepted => StatusCode::ACCEPTED,
        ResponseStatus::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Method, Request};
    use bytes::Bytes;
    use prost::Message;
    use std::time::Duration;
    use tokio::io::AsyncWriteExt;
    use tokio::net::{TcpListener, TcpStream};
    use tower::ServiceExt;
    use workrunner_core::app::WorkerBuilder;
    use workrunner_core::domain::envelope::SvcWorkRequest;
    use workrunner_core::domain::{DispatchError, DispatchInstruction, RoutingConfig, WorkResponse};
    use workrunner_core::impls::{InMemoryDispatcher, SourceFileProcessor};
    use workrunner_core::ports::{CreatedTask, TaskDispatcher};

    fn test_router(config: RoutingConfig, max_body_bytes: usize) -> (Router, Arc<InMemoryDispatcher>) {
        let dispatcher = Arc::new(InMemoryDispatcher::new());
        let service = WorkerBuilder::new(config)
            .processor(SourceFileProcessor::new())
            .shared_dispatcher(dispatcher.clone())
            .build()
            .expect("service");
        let state = AppState {
            service: Arc::new(service),
            max_body_bytes,
        };
        (router(state), dispatcher)
    }

    fn work_body(source_file: &str) -> Bytes {
        Bytes::from(
            SvcWorkRequest {
                source_file: source_file.to_string(),
                context: b"ctx".to_vec(),
                webhook_url: "https://caller.example.com/hook".to_string(),
                ..SvcWorkRequest::default()
            }
            .encode_to_vec(),
        )
    }

    async fn post_work(router: &Router, body: Bytes, attempt: Option<&str>) -> StatusCode {
        let mut builder = Request::builder().method(Method::POST).uri("/");
        if let Some(attempt) = attempt {
            builder = builder.header(TASK_EXECUTION_COUNT_HEADER, attempt);
        }
        let request = builder.body(Body::from(body)).expect("request");
        router.clone().oneshot(request).await.expect("response").status()
    }

    #[tokio::test]
    async fn success_returns_accepted_and_notifies() {
        let (router, dispatcher) = test_router(RoutingConfig::default(), 1024);

        let status = post_work(&router, work_body("gs://bucket/a.csv"), Some("1")).await;

        assert_eq!(status, StatusCode::ACCEPTED);
        let created = dispatcher.created();
        assert_eq!(created.len(), 1);
        assert_eq!(WorkResponse::decode(&created[0].payload).unwrap().error(), None);
    }

    #[tokio::test]
    async fn failure_with_retries_left_returns_500() {
        let (router, dispatcher) = test_router(RoutingConfig::default(), 1024);

        let status = post_work(&router, work_body("invalid"), Some("0")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(dispatcher.is_empty());
    }

    #[tokio::test]
    async fn exhausted_failure_is_dead_lettered() {
        let config = RoutingConfig {
            dead_letter_queue: Some("dlq".to_string()),
            dead_letter_service: Some("svc".to_string()),
            ..RoutingConfig::default()
        };
        let (router, dispatcher) = test_router(config, 1024);
        let body = work_body("invalid");

        let status = post_work(&router, body.clone(), Some("21")).await;

        assert_eq!(status, StatusCode::ACCEPTED);
        let created = dispatcher.created();
        assert_eq!(created[0].queue, "dlq");
        assert_eq!(created[0].payload, body);
    }

    #[tokio::test]
    async fn malformed_body_returns_ok_without_dispatch() {
        let (router, dispatcher) = test_router(RoutingConfig::default(), 1024);

        let status = post_work(&router, Bytes::from_static(b"not a protobuf"), Some("1")).await;

        assert_eq!(status, StatusCode::OK);
        assert!(dispatcher.is_empty());
    }

    #[tokio::test]
    async fn oversized_body_is_dropped() {
        let (router, dispatcher) = test_router(RoutingConfig::default(), 8);

        let status = post_work(&router, work_body("gs://bucket/a.csv"), None).await;

        assert_eq!(status, StatusCode::OK);
        assert!(dispatcher.is_empty());
    }

    #[tokio::test]
    async fn health_probe_is_ok() {
        let (router, _dispatcher) = test_router(RoutingConfig::default(), 1024);
        let request = Request::builder()
            .uri("/healthz")
            .body(Body::empty())
            .expect("request");

        let response = router.oneshot(request).await.expect("response");

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn get_on_work_route_is_method_not_allowed() {
        let (router, dispatcher) = test_router(RoutingConfig::default(), 1024);
        let request = Request::builder()
            .method(Method::GET)
            .uri("/")
            .body(Body::empty())
            .expect("request");

        let response = router.oneshot(request).await.expect("response");

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert!(dispatcher.is_empty());
    }

    #[tokio::test]
    async fn post_to_unknown_path_is_not_found() {
        let (router, dispatcher) = test_router(RoutingConfig::default(), 1024);
        let request = Request::builder()
            .method(Method::POST)
            .uri("/other")
            .body(Body::from(work_body("gs://bucket/a.csv")))
            .expect("request");

        let response = router.oneshot(request).await.expect("response");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(dispatcher.is_empty());
    }

    struct SlowDispatcher {
        inner: Arc<InMemoryDispatcher>,
        delay: Duration,
    }

    #[async_trait::async_trait]
    impl TaskDispatcher for SlowDispatcher {
        async fn create_task(
            &self,
            instruction: &DispatchInstruction,
        ) -> Result<CreatedTask, DispatchError> {
            tokio::time::sleep(self.delay).await;
            self.inner.create_task(instruction).await
        }
    }

    #[tokio::test]
    async fn client_disconnect_does_not_lose_dead_letter_dispatch() {
        let recorded = Arc::new(InMemoryDispatcher::new());
        let config = RoutingConfig {
            dead_letter_queue: Some("dlq".to_string()),
            dead_letter_service: Some("svc".to_string()),
            ..RoutingConfig::default()
        };
        let service = WorkerBuilder::new(config)
            .processor(SourceFileProcessor::new())
            .dispatcher(SlowDispatcher {
                inner: recorded.clone(),
                delay: Duration::from_millis(300),
            })
            .build()
            .expect("service");
        let app = router(AppState {
            service: Arc::new(service),
            max_body_bytes: 1024,
        });
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve");
        });

        let body = work_body("invalid");
        let head = format!(
            "POST / HTTP/1.1\r\nHost: {addr}\r\n{TASK_EXECUTION_COUNT_HEADER}: 21\r\n\
             Content-Type: application/x-protobuf\r\nContent-Length: {}\r\n\r\n",
            body.len()
        );
        let mut stream = TcpStream::connect(addr).await.expect("connect");
        stream.write_all(head.as_bytes()).await.expect("write head");
        stream.write_all(&body).await.expect("write body");
        tokio::time::sleep(Duration::from_millis(50)).await;
        drop(stream);

        tokio::time::sleep(Duration::from_millis(800)).await;

        let queues: Vec<String> = recorded.created().into_iter().map(|i| i.queue).collect();
        assert_eq!(queues, vec!["dlq".to_string()]);
    }
}
