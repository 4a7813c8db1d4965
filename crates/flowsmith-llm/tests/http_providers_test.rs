use flowsmith_llm::{
    DispatchConfig, Dispatcher, GenerationErrorKind, GenerationRequest, ProviderEndpoints,
};
use mockito::Matcher;
use serde_json::json;

fn dispatcher_for(url: String) -> Dispatcher {
    Dispatcher::from_config(&ProviderEndpoints::all(url), DispatchConfig::default()).unwrap()
}

#[tokio::test]
async fn test_openai_chat_completion_over_http() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer sk-test")
        .match_body(Matcher::PartialJson(json!({
            "model": "gpt-4",
            "max_tokens": 4000,
            "messages": [{ "role": "user", "content": "Summarize Rust" }]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id":"chatcmpl-1","object":"chat.completion","created":1,"model":"gpt-4","choices":[{"index":0,"message":{"role":"assistant","content":"Fast and safe."},"finish_reason":"stop"}],"usage":{"prompt_tokens":3,"completion_tokens":3,"total_tokens":6}}"#)
        .create_async()
        .await;

    let result = dispatcher_for(server.url())
        .generate(GenerationRequest::new("gpt-4", "Summarize Rust", "sk-test").max_tokens(10_000))
        .await
        .unwrap();

    assert_eq!(result.text, "Fast and safe.");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_gemini_generate_content_over_http() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/models/gemini-pro:generateContent")
        .match_header("x-goog-api-key", "g-key")
        .match_body(Matcher::PartialJson(json!({
            "contents": [{ "parts": [{ "text": "Hi" }] }],
            "generationConfig": { "maxOutputTokens": 2048 }
        })))
        .with_status(200)
        .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"Hello from Gemini"}],"role":"model"}}]}"#)
        .create_async()
        .await;

    let result = dispatcher_for(server.url())
        .generate(GenerationRequest::new("gemini-pro", "Hi", "g-key").max_tokens(5000))
        .await
        .unwrap();

    assert_eq!(result.text, "Hello from Gemini");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_provider_auth_failure_is_normalized() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .with_status(401)
        .with_body(r#"{"error":{"message":"Authentication Fails (no such user)","type":"authentication_error"}}"#)
        .expect(1)
        .create_async()
        .await;

    let err = dispatcher_for(server.url())
        .generate(GenerationRequest::new("deepseek", "Hi", "bad-key"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, GenerationErrorKind::AuthError);
    assert_eq!(err.message, "Invalid API key");
    assert_eq!(
        err.provider_detail.as_deref(),
        Some("Authentication Fails (no such user)")
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn test_server_error_not_retried() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .with_status(502)
        .with_body("bad gateway")
        .expect(1)
        .create_async()
        .await;

    let err = dispatcher_for(server.url())
        .generate(GenerationRequest::new("gpt-3.5-turbo", "Hi", "k"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, GenerationErrorKind::ProviderUnavailable);
    assert_eq!(err.provider_detail.as_deref(), Some("bad gateway"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_unreachable_provider_becomes_network_timeout() {
    // Port 9 (discard) is closed on loopback in test environments
    let err = dispatcher_for("http://127.0.0.1:9".to_string())
        .with_config(DispatchConfig {
            timeout_secs: 2,
            max_retries: 1,
        })
        .generate(GenerationRequest::new("gpt-4", "Hi", "k"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, GenerationErrorKind::NetworkTimeout);
}
