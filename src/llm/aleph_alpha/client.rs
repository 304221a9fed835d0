//! Aleph Alpha client implementation

use async_trait::async_trait;
use tracing::instrument;

use crate::llm::auth::{CredentialSpec, ResolvedCredentials};
use crate::llm::core::{
    config::{merge_stop_sequences, CallOptions, ClientOptions},
    error::AdapterError,
    provider::Llm,
};
use crate::llm::http::{CallExecutor, HttpRequest};

use super::config::AlephAlphaConfig;
use super::types::{CompleteRequest, CompleteResponse};

/// Environment variable consulted for the API key
pub const ALEPH_ALPHA_API_KEY_VAR: &str = "ALEPH_ALPHA_API_KEY";

const DEFAULT_BASE_URL: &str = "https://api.aleph-alpha.com";

/// Completion adapter for Aleph Alpha's Luminous models
pub struct AlephAlpha {
    config: AlephAlphaConfig,
    credentials: ResolvedCredentials,
    executor: CallExecutor,
}

impl AlephAlpha {
    /// Create a new Aleph Alpha adapter
    ///
    /// # Errors
    ///
    /// Returns `MissingCredential` if no API key is passed and
    /// `ALEPH_ALPHA_API_KEY` cannot be resolved.
    pub fn new(config: AlephAlphaConfig, options: ClientOptions) -> Result<Self, AdapterError> {
        let spec = CredentialSpec {
            api_key_var: ALEPH_ALPHA_API_KEY_VAR,
            organization_var: None,
            base_url_var: None,
            default_base_url: DEFAULT_BASE_URL.to_string(),
        };
        let credentials = options.resolve_credentials(&spec)?;
        let executor = options.build_executor("Aleph Alpha")?;

        Ok(Self {
            config,
            credentials,
            executor,
        })
    }

    pub fn config(&self) -> &AlephAlphaConfig {
        &self.config
    }

    fn build_request(&self, prompt: &str, stop_sequences: Vec<String>) -> CompleteRequest {
        CompleteRequest {
            model: self.config.model.clone(),
            prompt: prompt.to_string(),
            maximum_tokens: self.config.maximum_tokens,
            params: self.config.params.clone(),
            stop_sequences,
        }
    }

    #[instrument(name = "aleph_alpha.complete", skip_all, fields(model = %self.config.model))]
    async fn complete(&self, prompt: &str, options: CallOptions) -> Result<String, AdapterError> {
        let stop = merge_stop_sequences(self.config.stop_sequences.as_deref(), options.stop.as_deref())?;
        let body = serde_json::to_value(self.build_request(prompt, stop))?;

        let url = format!("{}/complete", self.credentials.base_url);
        let request = HttpRequest::post_json(url, body).bearer_auth(&self.credentials.api_key);

        let response: CompleteResponse = self.executor.post_json(request, &options).await?;
        shape_response(response)
    }
}

/// Extract the first completion's text
///
/// No completions at all is an `EmptyResult`. A null `completion` is how the
/// API reports that nothing was generated, so it yields `""`.
fn shape_response(response: CompleteResponse) -> Result<String, AdapterError> {
    let first = response
        .completions
        .into_iter()
        .next()
        .ok_or_else(|| AdapterError::EmptyResult {
            provider: "Aleph Alpha".to_string(),
            field: "completions".to_string(),
        })?;

    Ok(first.completion.unwrap_or_default())
}

#[async_trait]
impl Llm for AlephAlpha {
    fn llm_type(&self) -> &'static str {
        "aleph_alpha"
    }

    async fn call(&self, prompt: &str, options: CallOptions) -> Result<String, AdapterError> {
        self.complete(prompt, options).await
    }
}
