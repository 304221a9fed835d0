//! OpenAI embeddings client

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::llm::auth::ResolvedCredentials;
use crate::llm::core::{
    config::{CallOptions, ClientOptions},
    error::AdapterError,
    provider::Embeddings,
};
use crate::llm::http::CallExecutor;

use super::types::{EmbeddingRequest, EmbeddingResponse};
use super::{build_request, credential_spec};

/// Static configuration of the embeddings client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiEmbeddingsConfig {
    /// Embedding model
    pub model: String,
    /// Maximum inputs per request
    pub batch_size: usize,
    /// Replace newlines with spaces before embedding
    pub strip_new_lines: bool,
    /// Output dimensionality, for models that support shortening
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<u32>,
}

impl Default for OpenAiEmbeddingsConfig {
    fn default() -> Self {
        Self {
            model: "text-embedding-ada-002".to_string(),
            batch_size: 512,
            strip_new_lines: true,
            dimensions: None,
        }
    }
}

impl OpenAiEmbeddingsConfig {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_strip_new_lines(mut self, strip: bool) -> Self {
        self.strip_new_lines = strip;
        self
    }

    pub fn with_dimensions(mut self, dimensions: u32) -> Self {
        self.dimensions = Some(dimensions);
        self
    }
}

/// Client for the `/embeddings` endpoint
pub struct OpenAiEmbeddings {
    config: OpenAiEmbeddingsConfig,
    credentials: ResolvedCredentials,
    executor: CallExecutor,
}

impl OpenAiEmbeddings {
    /// Create a new embeddings client
    ///
    /// # Errors
    ///
    /// Returns `MissingCredential` if no API key is passed and
    /// `OPENAI_API_KEY` cannot be resolved, or `InvalidRequest` for a zero
    /// batch size.
    pub fn new(config: OpenAiEmbeddingsConfig, options: ClientOptions) -> Result<Self, AdapterError> {
        if config.batch_size == 0 {
            return Err(AdapterError::InvalidRequest("batch_size must be at least 1".to_string()));
        }
        let credentials = options.resolve_credentials(&credential_spec())?;
        let executor = options.build_executor("OpenAI")?;

        Ok(Self {
            config,
            credentials,
            executor,
        })
    }

    fn prepare(&self, text: &str) -> String {
        if self.config.strip_new_lines {
            text.replace('\n', " ")
        } else {
            text.to_string()
        }
    }

    /// Embed one batch; the response must hold exactly one vector per input
    async fn embed_batch(&self, batch: Vec<String>, options: &CallOptions) -> Result<Vec<Vec<f32>>, AdapterError> {
        let expected = batch.len();
        let body = serde_json::to_value(EmbeddingRequest {
            model: self.config.model.clone(),
            input: batch,
            dimensions: self.config.dimensions,
        })?;
        let request = build_request(&self.credentials, "embeddings", body);

        let mut response: EmbeddingResponse = self.executor.post_json(request, options).await?;
        if response.data.len() < expected {
            return Err(AdapterError::EmptyResult {
                provider: "OpenAI".to_string(),
                field: "data".to_string(),
            });
        }
        if response.data.len() > expected {
            return Err(AdapterError::InvalidRequest(format!(
                "embeddings response holds {} vectors for {} inputs",
                response.data.len(),
                expected
            )));
        }

        response.data.sort_by_key(|d| d.index);
        if response.data.iter().enumerate().any(|(i, d)| d.index != i) {
            return Err(AdapterError::InvalidRequest(
                "embeddings response indices do not cover every input exactly once".to_string(),
            ));
        }
        Ok(response.data.into_iter().map(|d| d.embedding).collect())
    }
}

#[async_trait]
impl Embeddings for OpenAiEmbeddings {
    #[instrument(name = "openai.embed", skip_all, fields(model = %self.config.model, texts = texts.len()))]
    async fn embed_documents_with(
        &self,
        texts: &[String],
        options: &CallOptions,
    ) -> Result<Vec<Vec<f32>>, AdapterError> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(self.config.batch_size) {
            let batch = chunk.iter().map(|t| self.prepare(t)).collect();
            embeddings.extend(self.embed_batch(batch, options).await?);
        }
        Ok(embeddings)
    }

    async fn embed_query_with(&self, text: &str, options: &CallOptions) -> Result<Vec<f32>, AdapterError> {
        let mut embeddings = self.embed_batch(vec![self.prepare(text)], options).await?;
        Ok(embeddings.swap_remove(0))
    }
}
