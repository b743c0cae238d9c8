//! Test utilities for integration tests
#![allow(dead_code)]

use std::sync::{Arc, RwLock};
use std::time::Duration;

use axum::{Router, body::Body};
use serde_json::{Value, json};

use aitiara::ai::relay::Completion;
use aitiara::api::AppState;
use aitiara::api::app;
use aitiara::core::AppConfig;

pub type SharedState = Arc<RwLock<AppState>>;

/// Config pointing the relay at `llm_host`, usually a `mockito` server.
pub fn test_config(llm_host: &str) -> AppConfig {
    AppConfig {
        llm_api_hostname: llm_host.to_string(),
        llm_api_key: Some(String::from("test-api-key")),
        llm_model: String::from("llama-3.3-70b-versatile"),
        llm_timeout: Duration::from_secs(5),
        llm_max_retries: 0,
        system_message: String::from("You are a helpful assistant."),
        web_ui_path: format!("{}/web-ui/src", env!("CARGO_MANIFEST_DIR")),
    }
}

/// Creates a test application router along with its shared state so
/// tests can seed or inspect sessions directly.
pub fn test_app_with_state(config: AppConfig) -> (Router, SharedState) {
    let state = Arc::new(RwLock::new(AppState::new(config)));
    (app(Arc::clone(&state)), state)
}

/// Like `test_app_with_state` but with a stand-in relay.
pub fn test_app_with_relay(config: AppConfig, relay: Arc<dyn Completion>) -> (Router, SharedState) {
    let state = Arc::new(RwLock::new(AppState::with_relay(config, relay)));
    (app(Arc::clone(&state)), state)
}

pub fn test_app(llm_host: &str) -> Router {
    test_app_with_state(test_config(llm_host)).0
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Failed to read body");
    String::from_utf8(bytes.to_vec()).expect("Body is not utf-8")
}

pub async fn body_to_json(body: Body) -> Value {
    let body = body_to_string(body).await;
    serde_json::from_str(&body).expect("Body is not JSON")
}

/// A successful chat completion payload replying with `content`.
pub fn completion_body(content: &str) -> String {
    json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "created": 1694268190,
        "model": "llama-3.3-70b-versatile",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
    .to_string()
}
