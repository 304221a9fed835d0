//! OpenAI moderation client

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::llm::auth::ResolvedCredentials;
use crate::llm::core::{
    config::{CallOptions, ClientOptions},
    error::AdapterError,
    types::ModerationVerdict,
};
use crate::llm::http::CallExecutor;

use super::types::{ModerationRequest, ModerationResponse};
use super::{build_request, credential_spec};

/// Static configuration of the moderation client
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiModerationConfig {
    /// Moderation model; the API picks its default when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl OpenAiModerationConfig {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// Client for the `/moderations` endpoint
pub struct OpenAiModeration {
    config: OpenAiModerationConfig,
    credentials: ResolvedCredentials,
    executor: CallExecutor,
}

impl OpenAiModeration {
    /// Create a new moderation client
    ///
    /// # Errors
    ///
    /// Returns `MissingCredential` if no API key is passed and
    /// `OPENAI_API_KEY` cannot be resolved.
    pub fn new(config: OpenAiModerationConfig, options: ClientOptions) -> Result<Self, AdapterError> {
        let credentials = options.resolve_credentials(&credential_spec())?;
        let executor = options.build_executor("OpenAI")?;

        Ok(Self {
            config,
            credentials,
            executor,
        })
    }

    /// Moderate a batch of inputs, one verdict per input
    ///
    /// # Errors
    ///
    /// Returns `EmptyResult` if the response carries fewer `results` than
    /// there were inputs.
    #[instrument(name = "openai.moderate", skip_all, fields(inputs = inputs.len()))]
    pub async fn moderate(
        &self,
        inputs: &[String],
        options: &CallOptions,
    ) -> Result<Vec<ModerationVerdict>, AdapterError> {
        let body = serde_json::to_value(ModerationRequest {
            input: inputs.to_vec(),
            model: self.config.model.clone(),
        })?;
        let request = build_request(&self.credentials, "moderations", body);

        let response: ModerationResponse = self.executor.post_json(request, options).await?;
        if response.results.is_empty() || response.results.len() < inputs.len() {
            return Err(AdapterError::EmptyResult {
                provider: "OpenAI".to_string(),
                field: "results".to_string(),
            });
        }

        debug!(
            flagged = response.results.iter().filter(|r| r.flagged).count(),
            "moderation finished"
        );
        Ok(response.results)
    }

    /// Moderate a single input
    pub async fn moderate_one(&self, input: &str, options: &CallOptions) -> Result<ModerationVerdict, AdapterError> {
        let mut results = self.moderate(&[input.to_string()], options).await?;
        Ok(results.swap_remove(0))
    }
}
