//! AI21 client implementation

use async_trait::async_trait;
use tracing::instrument;

use crate::llm::auth::{CredentialSpec, ResolvedCredentials};
use crate::llm::core::{
    config::{merge_stop_sequences, CallOptions, ClientOptions},
    error::AdapterError,
    provider::Llm,
};
use crate::llm::http::{CallExecutor, HttpRequest};

use super::config::Ai21Config;
use super::mapper::{default_base_url, from_complete_response, to_complete_request};
use super::types::CompleteResponse;

/// Environment variable consulted for the API key
pub const AI21_API_KEY_VAR: &str = "AI21_API_KEY";

/// Completion adapter for AI21 Studio
pub struct Ai21 {
    /// Static model and sampling configuration
    config: Ai21Config,
    /// API key and base URL
    credentials: ResolvedCredentials,
    /// Shared retrying caller plus transport
    executor: CallExecutor,
}

impl Ai21 {
    /// Create a new AI21 adapter
    ///
    /// # Errors
    ///
    /// Returns `MissingCredential` if no API key is passed and `AI21_API_KEY`
    /// cannot be resolved. No request is made in that case.
    pub fn new(config: Ai21Config, options: ClientOptions) -> Result<Self, AdapterError> {
        let spec = CredentialSpec {
            api_key_var: AI21_API_KEY_VAR,
            organization_var: None,
            base_url_var: None,
            default_base_url: default_base_url(&config.model).to_string(),
        };
        let credentials = options.resolve_credentials(&spec)?;
        let executor = options.build_executor("AI21")?;

        Ok(Self {
            config,
            credentials,
            executor,
        })
    }

    pub fn config(&self) -> &Ai21Config {
        &self.config
    }

    /// Build the endpoint URL for the configured model
    fn build_endpoint_url(&self) -> String {
        format!("{}/{}/complete", self.credentials.base_url, self.config.model)
    }

    #[instrument(name = "ai21.complete", skip_all, fields(model = %self.config.model))]
    async fn complete(&self, prompt: &str, options: CallOptions) -> Result<String, AdapterError> {
        let stop = merge_stop_sequences(self.config.stop.as_deref(), options.stop.as_deref())?;
        let body = serde_json::to_value(to_complete_request(&self.config, prompt, stop))?;

        let request =
            HttpRequest::post_json(self.build_endpoint_url(), body).bearer_auth(&self.credentials.api_key);

        let response: CompleteResponse = self.executor.post_json(request, &options).await?;
        from_complete_response(response)
    }
}

#[async_trait]
impl Llm for Ai21 {
    fn llm_type(&self) -> &'static str {
        "ai21"
    }

    async fn call(&self, prompt: &str, options: CallOptions) -> Result<String, AdapterError> {
        self.complete(prompt, options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::auth::StaticCredentials;
    use crate::llm::http::{MockTransport, RetryPolicy};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    fn ok_body(text: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "cmpl-1",
            "completions": [{"data": {"text": text}, "finishReason": {"reason": "endoftext"}}]
        })
    }

    fn client(config: Ai21Config, transport: Arc<MockTransport>) -> Ai21 {
        let options = ClientOptions::new()
            .with_api_key("test-key")
            .with_retry(RetryPolicy::no_retries())
            .with_transport(transport);
        Ai21::new(config, options).unwrap()
    }

    #[test]
    fn test_missing_credential() {
        let transport = Arc::new(MockTransport::new());
        let options = ClientOptions::new()
            .with_resolver(Arc::new(StaticCredentials::empty()))
            .with_transport(transport.clone());

        let err = Ai21::new(Ai21Config::default(), options).err().unwrap();
        assert!(matches!(err, AdapterError::MissingCredential { ref env_var, .. } if env_var == "AI21_API_KEY"));
        assert_eq!(transport.call_count(), 0);
    }

    #[test]
    fn test_credential_from_resolver() {
        let transport = Arc::new(MockTransport::new());
        let options = ClientOptions::new()
            .with_resolver(Arc::new(StaticCredentials::empty().with(AI21_API_KEY_VAR, "env-key")))
            .with_transport(transport);

        assert!(Ai21::new(Ai21Config::default(), options).is_ok());
    }

    #[tokio::test]
    async fn test_call_builds_expected_request() {
        let transport = Arc::new(MockTransport::new().with_json(200, ok_body(" there")));
        let llm = client(Ai21Config::default().with_model("j2-ultra"), transport.clone());

        let text = llm.call("Hello", CallOptions::new()).await.unwrap();
        assert_eq!(text, " there");

        let request = transport.last_request().unwrap();
        assert_eq!(request.url, "https://api.ai21.com/studio/v1/j2-ultra/complete");
        assert_eq!(request.header_value("Authorization"), Some("Bearer test-key"));
        assert_eq!(request.header_value("Content-Type"), Some("application/json"));
        assert_eq!(request.body["prompt"], "Hello");
        assert_eq!(request.body["stopSequences"], serde_json::json!([]));
        assert_eq!(request.body["temperature"], serde_json::json!(0.7f32));
        assert_eq!(request.body["frequencyPenalty"]["applyToEmojis"], true);
    }

    #[tokio::test]
    async fn test_experimental_model_url() {
        let transport = Arc::new(MockTransport::new().with_json(200, ok_body("x")));
        let llm = client(Ai21Config::default().with_model("j1-grande-instruct"), transport.clone());

        llm.call("Hi", CallOptions::new()).await.unwrap();
        assert_eq!(
            transport.last_request().unwrap().url,
            "https://api.ai21.com/studio/v1/experimental/j1-grande-instruct/complete"
        );
    }

    #[tokio::test]
    async fn test_base_url_override() {
        let transport = Arc::new(MockTransport::new().with_json(200, ok_body("x")));
        let options = ClientOptions::new()
            .with_api_key("k")
            .with_base_url("http://localhost:8080/ai21/")
            .with_transport(transport.clone());
        let llm = Ai21::new(Ai21Config::default(), options).unwrap();

        llm.call("Hi", CallOptions::new()).await.unwrap();
        assert_eq!(
            transport.last_request().unwrap().url,
            "http://localhost:8080/ai21/j2-jumbo-instruct/complete"
        );
    }

    #[tokio::test]
    async fn test_call_time_stop_used_when_config_empty() {
        let transport = Arc::new(MockTransport::new().with_json(200, ok_body("x")));
        let llm = client(Ai21Config::default(), transport.clone());

        llm.call("Hi", CallOptions::new().with_stop(vec!["\n".to_string()]))
            .await
            .unwrap();
        assert_eq!(transport.last_request().unwrap().body["stopSequences"], serde_json::json!(["\n"]));
    }

    #[tokio::test]
    async fn test_conflicting_stop_sequences() {
        let transport = Arc::new(MockTransport::new().with_json(200, ok_body("x")));
        let llm = client(Ai21Config::default().with_stop(vec!["###".to_string()]), transport.clone());

        let err = llm
            .call("Hi", CallOptions::new().with_stop(vec!["\n".to_string()]))
            .await
            .unwrap_err();
        assert!(matches!(err, AdapterError::ConflictingParameter { .. }));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_server_error() {
        let transport = Arc::new(MockTransport::new().with_json(500, serde_json::json!({"detail": "oops"})));
        let llm = client(Ai21Config::default(), transport.clone());

        let err = llm.call("Hi", CallOptions::new()).await.unwrap_err();
        assert!(err.to_string().contains("500"));
        let response = err.response().expect("HttpStatus should carry the response");
        assert_eq!(response.status, 500);
        assert!(response.text().contains("oops"));
    }

    #[tokio::test]
    async fn test_empty_completions() {
        let transport = Arc::new(MockTransport::new().with_json(200, serde_json::json!({"completions": []})));
        let llm = client(Ai21Config::default(), transport);

        let err = llm.call("Hi", CallOptions::new()).await.unwrap_err();
        assert!(matches!(err, AdapterError::EmptyResult { .. }));
    }

    #[tokio::test]
    async fn test_cancellation() {
        let transport = Arc::new(
            MockTransport::new()
                .with_json(200, ok_body("late"))
                .with_delay(Duration::from_secs(10)),
        );
        let llm = client(Ai21Config::default(), transport);
        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            canceller.cancel();
        });

        let result = tokio::time::timeout(
            Duration::from_secs(2),
            llm.call("Hi", CallOptions::new().with_signal(token)),
        )
        .await
        .expect("call should end promptly after cancellation");

        assert!(matches!(result, Err(AdapterError::Cancelled)));
    }

    #[tokio::test]
    async fn test_generate_calls_once_per_prompt() {
        let transport = Arc::new(MockTransport::new().with_json(200, ok_body("ok")));
        let llm = client(Ai21Config::default(), transport.clone());

        let result = llm
            .generate(&["a".to_string(), "b".to_string()], CallOptions::new())
            .await
            .unwrap();
        assert_eq!(result.texts(), vec!["ok", "ok"]);
        assert_eq!(transport.call_count(), 2);
    }
}
