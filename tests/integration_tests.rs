//! Integration tests for the speech router
//!
//! These tests run the real axum router on an ephemeral port and stand in a
//! wiremock server for the upstream synthesis engine.

use std::sync::Arc;

use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::{
    matchers::{body_partial_json, method, path},
    Mock, MockServer, ResponseTemplate,
};

use tts_language_router::{
    api::{self, AppState},
    config::Config,
    i18n::Language,
    retry::RetryConfig,
    smoke::{self, SmokeConfig},
};

// ==================== Test Helpers ====================

fn create_test_config(backend_url: Option<String>, api_key: Option<&str>) -> Config {
    Config {
        port: 0,
        api_key: api_key.map(str::to_string),
        default_language: Language::fallback(),
        synthesis_backend_url: backend_url,
        backend_timeout_secs: 5,
        max_input_chars: 200,
    }
}

/// Start the router and return its base URL
async fn spawn_app(config: Config) -> String {
    let mut state = AppState::from_config(&config).expect("Failed to build state");
    state.backend = state.backend.map(|b| b.with_retry(RetryConfig::once()));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, api::router(Arc::new(state)))
            .await
            .expect("Server failed");
    });

    format!("http://{}", addr)
}

async fn spawn_with_backend(backend: &MockServer) -> String {
    spawn_app(create_test_config(
        Some(format!("{}/v1/audio/speech", backend.uri())),
        None,
    ))
    .await
}

fn audio_response() -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "audio/mpeg")
        .set_body_bytes(vec![0xFF, 0xFB, 0x90, 0x00])
}

async fn post_speech(base: &str, body: Value) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("{}/v1/audio/speech", base))
        .json(&body)
        .send()
        .await
        .expect("Request failed")
}

// ==================== Speech Resolution Tests ====================

#[tokio::test]
async fn test_language_variant_overrides_explicit_language() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/audio/speech"))
        .and(body_partial_json(json!({
            "model": "chatterbox-multilingual",
            "language": "es",
            "voice": "default",
            "response_format": "mp3",
        })))
        .respond_with(audio_response())
        .expect(1)
        .mount(&backend)
        .await;

    let base = spawn_with_backend(&backend).await;
    let response = post_speech(
        &base,
        json!({
            "model": "chatterbox-multilingual-es",
            "input": "Hola, ¿cómo estás? Este es una prueba del sistema de texto a voz.",
            "voice": "default",
            "language": "en",
            "response_format": "mp3",
        }),
    )
    .await;

    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["x-resolved-language"], "es");
    assert_eq!(response.headers()["x-model-family"], "chatterbox-multilingual");
    assert_eq!(response.headers()["content-type"], "audio/mpeg");
    assert_eq!(response.bytes().await.unwrap().to_vec(), vec![0xFF, 0xFB, 0x90, 0x00]);
}

#[tokio::test]
async fn test_bare_family_uses_explicit_language() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"model": "chatterbox-multilingual", "language": "fr"})))
        .respond_with(audio_response())
        .expect(1)
        .mount(&backend)
        .await;

    let base = spawn_with_backend(&backend).await;
    let response = post_speech(
        &base,
        json!({"model": "chatterbox-multilingual", "input": "Bonjour", "language": "fr"}),
    )
    .await;

    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["x-resolved-language"], "fr");
}

#[tokio::test]
async fn test_bare_family_without_language_uses_default() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"model": "tts-1", "language": "en"})))
        .respond_with(audio_response())
        .expect(1)
        .mount(&backend)
        .await;

    let base = spawn_with_backend(&backend).await;
    let response = post_speech(&base, json!({"model": "tts-1", "input": "Hello"})).await;

    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["x-resolved-language"], "en");
}

#[tokio::test]
async fn test_invalid_explicit_language_ignored_for_variant() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"language": "es"})))
        .respond_with(audio_response())
        .expect(1)
        .mount(&backend)
        .await;

    let base = spawn_with_backend(&backend).await;
    let response = post_speech(
        &base,
        json!({"model": "chatterbox-multilingual-es", "input": "Hola", "language": "xx"}),
    )
    .await;

    assert_eq!(response.status(), 200);
}

// ==================== Client Error Tests ====================

#[tokio::test]
async fn test_unknown_model_rejected_before_backend() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(audio_response())
        .expect(0)
        .mount(&backend)
        .await;

    let base = spawn_with_backend(&backend).await;
    let response = post_speech(
        &base,
        json!({"model": "not-a-real-model", "input": "Hello", "language": "en"}),
    )
    .await;

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["type"], "invalid_request_error");
    assert_eq!(body["error"]["param"], "model");
    assert_eq!(body["error"]["code"], "model_not_found");
}

#[tokio::test]
async fn test_invalid_language_rejected() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(audio_response())
        .expect(0)
        .mount(&backend)
        .await;

    let base = spawn_with_backend(&backend).await;
    let response = post_speech(
        &base,
        json!({"model": "chatterbox-multilingual", "input": "Hello", "language": "xx"}),
    )
    .await;

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["param"], "language");
    assert_eq!(body["error"]["code"], "invalid_language_code");
}

#[tokio::test]
async fn test_request_validation_errors() {
    let backend = MockServer::start().await;
    let base = spawn_with_backend(&backend).await;

    let cases = [
        (json!({"model": "chatterbox", "input": ""}), "input"),
        (json!({"model": "chatterbox", "input": "x".repeat(201)}), "input"),
        (
            json!({"model": "chatterbox", "input": "Hi", "response_format": "ogg"}),
            "response_format",
        ),
        (json!({"model": "chatterbox", "input": "Hi", "speed": 9.0}), "speed"),
    ];

    for (body, param) in cases {
        let response = post_speech(&base, body).await;
        assert_eq!(response.status(), 400, "expected 400 for {}", param);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"]["param"], param);
    }
}

#[tokio::test]
async fn test_malformed_json_uses_error_envelope() {
    let backend = MockServer::start().await;
    let base = spawn_with_backend(&backend).await;

    let response = reqwest::Client::new()
        .post(format!("{}/v1/audio/speech", base))
        .header("content-type", "application/json")
        .body("{\"model\": ")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["type"], "invalid_request_error");
}

// ==================== Backend Failure Tests ====================

#[tokio::test]
async fn test_no_backend_configured() {
    let base = spawn_app(create_test_config(None, None)).await;
    let response = post_speech(&base, json!({"model": "chatterbox", "input": "Hello"})).await;

    assert_eq!(response.status(), 503);
}

#[tokio::test]
async fn test_no_backend_still_validates_model_first() {
    let base = spawn_app(create_test_config(None, None)).await;
    let response = post_speech(&base, json!({"model": "nope", "input": "Hello"})).await;

    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_backend_failure_is_bad_gateway() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("engine crashed"))
        .mount(&backend)
        .await;

    let base = spawn_with_backend(&backend).await;
    let response = post_speech(&base, json!({"model": "chatterbox", "input": "Hello"})).await;

    assert_eq!(response.status(), 502);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("engine crashed"));
}

// ==================== Model Listing Tests ====================

#[tokio::test]
async fn test_list_models() {
    let base = spawn_app(create_test_config(None, None)).await;

    let body: Value = reqwest::get(format!("{}/v1/models", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["object"], "list");
    let ids: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_str().unwrap())
        .collect();

    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted);
    assert_eq!(
        ids.iter()
            .filter(|id| id.starts_with("chatterbox-multilingual-"))
            .count(),
        23
    );
    assert!(body["data"][0]["description"].is_string());
}

#[tokio::test]
async fn test_list_models_filtered_by_suffix() {
    let base = spawn_app(create_test_config(None, None)).await;

    let body: Value = reqwest::get(format!("{}/v1/models?suffixes=-es,-fr,-zh", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let ids: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_str().unwrap())
        .collect();
    assert_eq!(
        ids,
        vec![
            "chatterbox-multilingual-es",
            "chatterbox-multilingual-fr",
            "chatterbox-multilingual-zh",
        ]
    );
}

#[tokio::test]
async fn test_get_single_model() {
    let base = spawn_app(create_test_config(None, None)).await;

    let response = reqwest::get(format!("{}/v1/models/chatterbox-multilingual-ja", base))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["language"], "ja");
    assert_eq!(body["family"], "chatterbox-multilingual");

    let response = reqwest::get(format!("{}/v1/models/chatterbox-es", base))
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

// ==================== Auth Tests ====================

#[tokio::test]
async fn test_api_key_required_when_configured() {
    let base = spawn_app(create_test_config(None, Some("test-api-key"))).await;
    let client = reqwest::Client::new();

    let response = client.get(format!("{}/v1/models", base)).send().await.unwrap();
    assert_eq!(response.status(), 401);

    let response = client
        .get(format!("{}/v1/models", base))
        .bearer_auth("wrong")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);

    let response = client
        .get(format!("{}/v1/models", base))
        .bearer_auth("test-api-key")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    // Health stays open
    let response = client.get(format!("{}/health", base)).send().await.unwrap();
    assert_eq!(response.status(), 200);
}

// ==================== End-to-End Smoke Test ====================

#[tokio::test]
async fn test_smoke_checks_pass_against_router() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"language": "es"})))
        .respond_with(audio_response())
        .mount(&backend)
        .await;

    let base = spawn_with_backend(&backend).await;
    let temp_dir = TempDir::new().unwrap();
    let config = SmokeConfig {
        server_url: base,
        api_key: None,
        output_path: temp_dir.path().join("spanish.mp3"),
    };

    assert!(smoke::run(&config).await);
    assert_eq!(std::fs::read(&config.output_path).unwrap().len(), 4);
}
