//! REST API Server for the chat analyst
//!
//! Exposes the answer service over HTTP

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, info_span, Instrument};

use crate::answer::AnswerService;
use crate::error::AnalystError;

/// =============================
/// Request / Response Models
/// =============================

#[derive(Debug, Serialize, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
}

/// =============================
/// API State
/// =============================

#[derive(Clone)]
pub struct ApiState {
    pub service: Arc<AnswerService>,
}

/// =============================
/// Handlers
/// =============================

async fn root() -> Redirect {
    Redirect::temporary("/docs")
}

async fn docs() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "title": "Aurora AI - Gemini-Powered Q&A",
        "description": "Ask anything using cached member messages + Gemini.",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            {
                "method": "GET",
                "path": "/health",
                "description": "Server status and message cache details"
            },
            {
                "method": "POST",
                "path": "/ask",
                "description": "Answer a question from the cached messages",
                "body": {"question": "string"}
            }
        ]
    }))
}

async fn health(State(state): State<ApiState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "messages_cached": state.service.corpus().len(),
        "api_key_set": state.service.api_key_set(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn ask(
    State(state): State<ApiState>,
    Json(req): Json<AskRequest>,
) -> Result<Json<AskResponse>, AnalystError> {
    let span = info_span!("ask", request_id = %uuid::Uuid::new_v4());

    async move {
        info!("Received question: {}", req.question);
        let answer = state.service.answer(&req.question).await?;
        Ok::<_, AnalystError>(Json(AskResponse { answer }))
    }
    .instrument(span)
    .await
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| panic.downcast_ref::<&str>().map(|s| s.to_string()))
        .unwrap_or_else(|| "unknown panic".to_string());

    AnalystError::Internal(detail).into_response()
}

/// =============================
/// Router
/// =============================

pub fn create_router(service: Arc<AnswerService>) -> Router {
    let state = ApiState { service };

    Router::new()
        .route("/", get(root))
        .route("/docs", get(docs))
        .route("/health", get(health))
        .route("/ask", post(ask))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::custom(panic_response))
                .layer(CorsLayer::permissive()),
        )
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(
    service: Arc<AnswerService>,
    port: u16,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let router = create_router(service);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("API Server listening on http://0.0.0.0:{}", port);
    info!("Local: http://127.0.0.1:{}", port);

    axum::serve(listener, router).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Corpus;
    use crate::gemini::LanguageModel;
    use crate::models::Message;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    enum Behavior {
        Answer(&'static str),
        Upstream,
        Transport,
        Panic,
    }

    struct StubModel {
        configured: bool,
        behavior: Behavior,
    }

    #[async_trait]
    impl LanguageModel for StubModel {
        fn is_configured(&self) -> bool {
            self.configured
        }

        async fn generate(&self, _system: &str, _prompt: &str) -> crate::Result<Option<String>> {
            match self.behavior {
                Behavior::Answer(text) => Ok(Some(text.to_string())),
                Behavior::Upstream => Err(AnalystError::UpstreamStatus {
                    status: 503,
                    body: "unavailable".into(),
                }),
                Behavior::Transport => Err(AnalystError::Internal("connection refused".into())),
                Behavior::Panic => panic!("model exploded"),
            }
        }
    }

    fn app(messages: usize, configured: bool, behavior: Behavior) -> Router {
        let corpus = Corpus::new(
            (0..messages)
                .map(|i| Message::new(format!("member{}", i), "hello"))
                .collect(),
        );
        let model = Arc::new(StubModel { configured, behavior });
        create_router(Arc::new(AnswerService::new(Arc::new(corpus), model)))
    }

    fn ask_request(question: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/ask")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                serde_json::json!({ "question": question }).to_string(),
            ))
            .unwrap()
    }

    async fn json_body(resp: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_root_redirects_to_docs() {
        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        let resp = app(0, true, Behavior::Answer("x")).oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(resp.headers()[header::LOCATION], "/docs");
    }

    #[tokio::test]
    async fn test_docs_lists_endpoints() {
        let req = Request::builder().uri("/docs").body(Body::empty()).unwrap();
        let resp = app(0, true, Behavior::Answer("x")).oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = json_body(resp).await;
        assert_eq!(body["endpoints"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_health_reports_cache_and_key() {
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let resp = app(17, true, Behavior::Answer("x")).oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = json_body(resp).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["messages_cached"], 17);
        assert_eq!(body["api_key_set"], true);
    }

    #[tokio::test]
    async fn test_health_counts_messages_loaded_from_cache() {
        use crate::cache::MessageCache;
        use crate::corpus::load_or_fetch;
        use crate::fetcher::tests::ScriptedSource;
        use crate::fetcher::PaginationConfig;
        use std::sync::atomic::Ordering;
        use tokio_test::assert_ok;

        let dir = tempfile::tempdir().unwrap();
        let cache = MessageCache::new(dir.path().join("messages_cache.json"));
        let cached: Vec<Message> = (0..42)
            .map(|i| Message::new(format!("member{}", i), "hello"))
            .collect();
        assert_ok!(cache.save(&cached).await);

        let source = ScriptedSource::new(Vec::new());
        let corpus = load_or_fetch(&cache, &source, &PaginationConfig::default()).await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);

        let model = Arc::new(StubModel {
            configured: true,
            behavior: Behavior::Answer("x"),
        });
        let service = AnswerService::new(Arc::new(corpus), model);

        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let resp = create_router(Arc::new(service)).oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = json_body(resp).await;
        assert_eq!(body["messages_cached"], 42);
        assert_eq!(body["api_key_set"], true);
    }

    #[tokio::test]
    async fn test_health_without_key() {
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let resp = app(0, false, Behavior::Answer("x")).oneshot(req).await.unwrap();

        let body = json_body(resp).await;
        assert_eq!(body["messages_cached"], 0);
        assert_eq!(body["api_key_set"], false);
    }

    #[tokio::test]
    async fn test_ask_returns_answer() {
        let resp = app(3, true, Behavior::Answer("member1 said hello."))
            .oneshot(ask_request("Who said hello?"))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(json_body(resp).await["answer"], "member1 said hello.");
    }

    #[tokio::test]
    async fn test_ask_with_empty_corpus_is_still_ok() {
        let resp = app(0, true, Behavior::Answer("unused"))
            .oneshot(ask_request("Who said hello?"))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            json_body(resp).await["answer"],
            crate::answer::NO_MESSAGE_DATA
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_ask_upstream_failure_is_bad_gateway() {
        let resp = app(3, true, Behavior::Upstream)
            .oneshot(ask_request("Who said hello?"))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        let detail = json_body(resp).await["detail"].as_str().unwrap().to_string();
        assert!(detail.starts_with("Gemini API Error after 3 retries"), "{}", detail);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ask_transport_failure_is_internal_error() {
        let resp = app(3, true, Behavior::Transport)
            .oneshot(ask_request("Who said hello?"))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let detail = json_body(resp).await["detail"].as_str().unwrap().to_string();
        assert!(detail.starts_with("LLM Connection Error"), "{}", detail);
    }

    #[tokio::test]
    async fn test_panic_becomes_internal_error_with_detail() {
        let resp = app(3, true, Behavior::Panic)
            .oneshot(ask_request("Who said hello?"))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let detail = json_body(resp).await["detail"].as_str().unwrap().to_string();
        assert!(detail.contains("model exploded"), "{}", detail);
    }
}
