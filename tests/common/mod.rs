//! Shared helpers for integration tests

#![allow(dead_code)]

use std::sync::{Arc, Once};

use llm_adapters::llm::{
    auth::StaticCredentials,
    http::{MockTransport, RetryPolicy},
    ClientOptions,
};

static TRACING: Once = Once::new();

/// Install a test subscriber once; honours `RUST_LOG`
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Client options with an explicit key, no retries and the given transport
pub fn mock_options(transport: &Arc<MockTransport>) -> ClientOptions {
    ClientOptions::new()
        .with_api_key("test-key")
        .with_retry(RetryPolicy::no_retries())
        .with_transport(transport.clone())
}

/// Client options whose resolver knows no credentials at all
pub fn options_without_credentials(transport: &Arc<MockTransport>) -> ClientOptions {
    ClientOptions::new()
        .with_resolver(Arc::new(StaticCredentials::empty()))
        .with_transport(transport.clone())
}

/// A well-formed AI21 completion body
pub fn ai21_body(text: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "cmpl-test",
        "prompt": {"text": "ignored"},
        "completions": [{"data": {"text": text}, "finishReason": {"reason": "endoftext"}}]
    })
}

/// A well-formed Aleph Alpha completion body
pub fn aleph_alpha_body(text: &str) -> serde_json::Value {
    serde_json::json!({
        "model_version": "2022-04",
        "completions": [{"completion": text, "finish_reason": "maximum_tokens"}]
    })
}
