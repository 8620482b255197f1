use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};

use docparse_client::{
    DocumentApi, MemoryTokenStore, NoopLoginRedirect, ParseBackend, ParseOrchestrator,
    ParseParams, ParseRequest, TokenStore, Transport, TransportError, TransportErrorKind,
    TransportSettings, NOT_AUTHENTICATED,
};
use docparse_core::ParsePhase;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(client_logging::initialize_for_tests);
}

struct StubBackend {
    calls: AtomicUsize,
    response: Result<Value, TransportError>,
}

impl StubBackend {
    fn new(response: Result<Value, TransportError>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            response,
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ParseBackend for StubBackend {
    async fn submit_parse(&self, _request: &ParseRequest) -> Result<Value, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response.clone()
    }
}

fn params() -> ParseParams {
    ParseParams {
        id: "doc1".to_string(),
        url: "http://x".to_string(),
        user_access_token: "uat".to_string(),
        with_image_download: true,
        is_file: false,
    }
}

#[tokio::test]
async fn missing_credential_fails_without_calling_backend() {
    init_logging();
    let backend = Arc::new(StubBackend::new(Ok(json!({"code": 0, "data": "unused"}))));
    let tokens: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new());
    let mut orchestrator = ParseOrchestrator::new(backend.clone(), tokens);

    orchestrator.submit(params()).await;

    let state = orchestrator.state();
    assert_eq!(state.phase(), ParsePhase::Failed);
    assert_eq!(state.error(), Some(NOT_AUTHENTICATED));
    assert!(state.result().is_none());
    assert!(!state.is_loading());
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn successful_parse_commits_payload_unchanged() {
    init_logging();
    let payload = json!({"markdown": "# Title", "images": ["a.png"]});
    let backend = Arc::new(StubBackend::new(Ok(json!({"code": 0, "data": payload.clone()}))));
    let tokens: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::with_token("tok"));
    let mut orchestrator = ParseOrchestrator::new(backend, tokens);

    orchestrator.submit(params()).await;

    let state = orchestrator.state();
    assert_eq!(state.phase(), ParsePhase::Succeeded);
    assert_eq!(state.result(), Some(&payload));
    assert!(state.error().is_none());
    assert!(!state.is_loading());
}

#[tokio::test]
async fn failed_parse_commits_the_error_message() {
    init_logging();
    let backend = Arc::new(StubBackend::new(Err(TransportError::new(
        TransportErrorKind::NetworkFailure,
        "backend unreachable",
    ))));
    let tokens: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::with_token("tok"));
    let mut orchestrator = ParseOrchestrator::new(backend, tokens);

    orchestrator.submit(params()).await;

    let state = orchestrator.state();
    assert_eq!(state.phase(), ParsePhase::Failed);
    assert_eq!(state.error(), Some("backend unreachable"));
    assert!(state.result().is_none());
    assert!(!state.is_loading());
}

#[tokio::test]
async fn messageless_failure_falls_back_to_generic_error() {
    init_logging();
    let backend = Arc::new(StubBackend::new(Err(TransportError::new(
        TransportErrorKind::NetworkFailure,
        "",
    ))));
    let tokens: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::with_token("tok"));
    let mut orchestrator = ParseOrchestrator::new(backend, tokens);

    orchestrator.submit(params()).await;

    assert_eq!(orchestrator.state().error(), Some("parse failed"));
}

#[tokio::test]
async fn resubmission_clears_the_previous_outcome() {
    init_logging();
    let backend = Arc::new(StubBackend::new(Err(TransportError::new(
        TransportErrorKind::NetworkFailure,
        "backend unreachable",
    ))));
    let tokens: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::with_token("tok"));
    let mut orchestrator = ParseOrchestrator::new(backend, tokens.clone());

    orchestrator.submit(params()).await;
    assert!(orchestrator.state().error().is_some());

    // A second attempt with the same backend fails again but never shows the
    // stale outcome in between; the fresh failure replaces the old one.
    orchestrator.submit(params()).await;
    assert_eq!(orchestrator.state().error(), Some("backend unreachable"));
    assert!(orchestrator.state().result().is_none());
}

#[tokio::test]
async fn submission_round_trips_the_exact_wire_body() {
    init_logging();
    let server = MockServer::start().await;
    let expected_body = json!({
        "id": "doc1",
        "url": "http://x",
        "collection": "default",
        "access_key": "tok",
        "user_access_token": "uat",
        "with_image_download": true,
        "is_file": false
    });
    Mock::given(method("POST"))
        .and(path("/v1/transform"))
        .and(header("Authorization", "Bearer tok"))
        .and(body_json(&expected_body))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"code": 0, "data": {"markdown": "# ok"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let tokens: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::with_token("tok"));
    let transport = Arc::new(
        Transport::new(
            TransportSettings::new(server.uri()),
            tokens.clone(),
            Arc::new(NoopLoginRedirect),
        )
        .expect("transport"),
    );
    let backend: Arc<dyn ParseBackend> = Arc::new(DocumentApi::new(transport));
    let mut orchestrator = ParseOrchestrator::new(backend, tokens);

    orchestrator.submit(params()).await;

    let state = orchestrator.state();
    assert_eq!(state.phase(), ParsePhase::Succeeded);
    assert_eq!(state.result(), Some(&json!({"markdown": "# ok"})));
}
