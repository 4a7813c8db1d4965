use async_trait::async_trait;
use flowsmith_llm::{
    AdapterRegistry, DeclaredRange, DispatchConfig, Dispatcher, GenerationError,
    GenerationErrorKind, GenerationRequest, GenerationResult, ProviderAdapter, ProviderEndpoints,
    ProviderKind, ResolvedRequest, Transport, TransportError, WireRequest, WireResponse,
};
use serde_json::json;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Adapter whose wire request carries the prompt and whose parser reads it back
struct EchoAdapter;

impl ProviderAdapter for EchoAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Custom
    }

    fn declared_range(&self) -> DeclaredRange {
        DeclaredRange::new((1, 2000), (0.0, 1.0))
    }

    fn build_request(&self, request: &ResolvedRequest) -> WireRequest {
        WireRequest::post(
            "stub://echo",
            json!({ "prompt": request.prompt, "max_tokens": request.max_tokens }),
        )
    }

    fn parse_response(&self, response: &WireResponse) -> Result<GenerationResult, GenerationError> {
        let value: serde_json::Value = serde_json::from_str(&response.body)
            .map_err(|e| GenerationError::invalid_response_shape(e.to_string()))?;
        value["prompt"]
            .as_str()
            .map(GenerationResult::new)
            .ok_or_else(|| GenerationError::invalid_response_shape("no prompt"))
    }
}

/// Records every request; replays scripted outcomes, echoing the body once the script runs out
#[derive(Default)]
struct RecordingTransport {
    calls: Mutex<Vec<WireRequest>>,
    script: Mutex<VecDeque<Result<WireResponse, TransportError>>>,
}

impl RecordingTransport {
    fn scripted(outcomes: Vec<Result<WireResponse, TransportError>>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            script: Mutex::new(outcomes.into()),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn last_call(&self) -> Option<WireRequest> {
        self.calls.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, request: &WireRequest, _timeout: Duration) -> Result<WireResponse, TransportError> {
        self.calls.lock().unwrap().push(request.clone());
        match self.script.lock().unwrap().pop_front() {
            Some(outcome) => outcome,
            None => Ok(WireResponse::new(200, request.body.to_string())),
        }
    }
}

fn dispatcher(transport: Arc<RecordingTransport>) -> Dispatcher {
    let registry = AdapterRegistry::with_defaults(&ProviderEndpoints::default()).with("stub", EchoAdapter);
    Dispatcher::new(registry, transport)
}

fn chat_completion(text: &str) -> WireResponse {
    WireResponse::new(
        200,
        json!({ "choices": [ { "message": { "role": "assistant", "content": text } } ] }).to_string(),
    )
}

#[tokio::test]
async fn test_stub_round_trip() {
    let transport = Arc::new(RecordingTransport::default());
    let result = dispatcher(Arc::clone(&transport))
        .generate(GenerationRequest::new("stub", "hello", "x"))
        .await
        .unwrap();

    assert_eq!(result, GenerationResult::new("hello"));
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test]
async fn test_missing_provider_makes_no_call() {
    let transport = Arc::new(RecordingTransport::default());
    let err = dispatcher(Arc::clone(&transport))
        .generate(GenerationRequest::new("", "p", "k"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, GenerationErrorKind::MissingParameter);
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn test_missing_prompt_or_credential() {
    let transport = Arc::new(RecordingTransport::default());
    let dispatcher = dispatcher(Arc::clone(&transport));

    let err = dispatcher.generate(GenerationRequest::new("stub", "", "k")).await.unwrap_err();
    assert_eq!(err.kind, GenerationErrorKind::MissingParameter);

    let err = dispatcher.generate(GenerationRequest::new("stub", "p", "")).await.unwrap_err();
    assert_eq!(err.kind, GenerationErrorKind::MissingParameter);

    assert_eq!(transport.call_count(), 0);
}

#[test]
fn test_check_runs_local_validation_only() {
    let transport = Arc::new(RecordingTransport::default());
    let dispatcher = dispatcher(Arc::clone(&transport));

    assert!(dispatcher.check(&GenerationRequest::new("stub", "p", "k")).is_ok());
    assert_eq!(
        dispatcher.check(&GenerationRequest::new("stub", "", "k")).unwrap_err().kind,
        GenerationErrorKind::MissingParameter
    );
    assert_eq!(
        dispatcher.check(&GenerationRequest::new("unknown-llm", "p", "k")).unwrap_err().kind,
        GenerationErrorKind::UnsupportedModel
    );
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn test_unknown_provider_is_not_defaulted() {
    let transport = Arc::new(RecordingTransport::default());
    let err = dispatcher(Arc::clone(&transport))
        .generate(GenerationRequest::new("unknown-llm", "p", "k"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, GenerationErrorKind::UnsupportedModel);
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn test_max_tokens_clamped_before_dispatch() {
    let transport = Arc::new(RecordingTransport::scripted(vec![Ok(chat_completion("ok"))]));
    let result = dispatcher(Arc::clone(&transport))
        .generate(GenerationRequest::new("gpt-3.5-turbo", "p", "k").max_tokens(999_999))
        .await
        .unwrap();

    assert_eq!(result.text, "ok");
    let sent = transport.last_call().unwrap();
    assert_eq!(sent.body["max_tokens"], 2000);
    assert_eq!(sent.url, "https://api.openai.com/v1/chat/completions");
}

#[tokio::test]
async fn test_defaults_applied_when_parameters_absent() {
    let transport = Arc::new(RecordingTransport::scripted(vec![Ok(chat_completion("ok"))]));
    dispatcher(Arc::clone(&transport))
        .generate(GenerationRequest::new("gpt-4", "p", "k"))
        .await
        .unwrap();

    let sent = transport.last_call().unwrap();
    assert_eq!(sent.body["max_tokens"], 2000);
}

#[tokio::test]
async fn test_deepseek_alias_targets_deepseek_chat() {
    let transport = Arc::new(RecordingTransport::scripted(vec![Ok(chat_completion("ok"))]));
    dispatcher(Arc::clone(&transport))
        .generate(GenerationRequest::new("deepseek-chat", "p", "k").temperature(1.8))
        .await
        .unwrap();

    let sent = transport.last_call().unwrap();
    assert_eq!(sent.body["model"], "deepseek-chat");
    assert_eq!(sent.body["temperature"], 1.0);
}

#[tokio::test]
async fn test_timeout_retried_once_then_succeeds() {
    let transport = Arc::new(RecordingTransport::scripted(vec![
        Err(TransportError::Timeout("deadline".into())),
        Ok(chat_completion("second time lucky")),
    ]));
    let result = dispatcher(Arc::clone(&transport))
        .generate(GenerationRequest::new("gpt-4", "p", "k"))
        .await
        .unwrap();

    assert_eq!(result.text, "second time lucky");
    assert_eq!(transport.call_count(), 2);
}

#[tokio::test]
async fn test_repeated_connection_reset_surfaces_network_timeout() {
    let transport = Arc::new(RecordingTransport::scripted(vec![
        Err(TransportError::Connection("reset".into())),
        Err(TransportError::Connection("reset".into())),
        Ok(chat_completion("never reached")),
    ]));
    let err = dispatcher(Arc::clone(&transport))
        .generate(GenerationRequest::new("gpt-4", "p", "k"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, GenerationErrorKind::NetworkTimeout);
    assert_eq!(transport.call_count(), 2);
}

#[tokio::test]
async fn test_retry_disabled() {
    let transport = Arc::new(RecordingTransport::scripted(vec![Err(TransportError::Timeout(
        "deadline".into(),
    ))]));
    let err = dispatcher(Arc::clone(&transport))
        .with_config(DispatchConfig {
            timeout_secs: 1,
            max_retries: 0,
        })
        .generate(GenerationRequest::new("gpt-4", "p", "k"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, GenerationErrorKind::NetworkTimeout);
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test]
async fn test_http_errors_are_never_retried() {
    for (status, expected) in [
        (401, GenerationErrorKind::AuthError),
        (429, GenerationErrorKind::RateLimited),
        (503, GenerationErrorKind::ProviderUnavailable),
        (422, GenerationErrorKind::BadRequest),
    ] {
        let transport = Arc::new(RecordingTransport::scripted(vec![Ok(WireResponse::new(
            status,
            r#"{"error":{"message":"nope"}}"#,
        ))]));
        let err = dispatcher(Arc::clone(&transport))
            .generate(GenerationRequest::new("gpt-4", "p", "k"))
            .await
            .unwrap_err();

        assert_eq!(err.kind, expected, "status {}", status);
        assert_eq!(err.provider_detail.as_deref(), Some("nope"));
        assert_eq!(transport.call_count(), 1, "status {}", status);
    }
}

#[tokio::test]
async fn test_success_status_with_wrong_shape() {
    let transport = Arc::new(RecordingTransport::scripted(vec![Ok(WireResponse::new(
        200,
        r#"{"unexpected":true}"#,
    ))]));
    let err = dispatcher(Arc::clone(&transport))
        .generate(GenerationRequest::new("gemini-pro", "p", "k"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, GenerationErrorKind::InvalidResponseShape);
}
