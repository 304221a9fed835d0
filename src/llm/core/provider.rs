//! Common interfaces implemented by the provider adapters

use async_trait::async_trait;

use super::{
    config::{CallOptions, ClientOptions},
    error::AdapterError,
    types::{Generation, LlmResult, Model},
};
use crate::llm::ai21::Ai21;
use crate::llm::aleph_alpha::AlephAlpha;

/// A text-completion model
#[async_trait]
pub trait Llm: Send + Sync {
    /// Short identifier of the adapter (e.g. `"ai21"`)
    fn llm_type(&self) -> &'static str;

    /// Complete a single prompt
    ///
    /// # Arguments
    /// * `prompt` - The prompt text
    /// * `options` - Call-time stop sequences, cancellation token and timeout
    async fn call(&self, prompt: &str, options: CallOptions) -> Result<String, AdapterError>;

    /// Complete several prompts, one request per prompt, in order
    ///
    /// Stops at the first failing prompt.
    async fn generate(&self, prompts: &[String], options: CallOptions) -> Result<LlmResult, AdapterError> {
        let mut generations = Vec::with_capacity(prompts.len());
        for prompt in prompts {
            let text = self.call(prompt, options.clone()).await?;
            generations.push(vec![Generation::new(text)]);
        }
        Ok(LlmResult { generations })
    }
}

/// A text-embedding model
///
/// The `_with` variants take the cancellation token and timeout for the
/// outbound request; the plain ones use default call options.
#[async_trait]
pub trait Embeddings: Send + Sync {
    /// Embed a batch of documents, one vector per input in input order
    async fn embed_documents_with(
        &self,
        texts: &[String],
        options: &CallOptions,
    ) -> Result<Vec<Vec<f32>>, AdapterError>;

    /// Embed a single query
    async fn embed_query_with(&self, text: &str, options: &CallOptions) -> Result<Vec<f32>, AdapterError>;

    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, AdapterError> {
        self.embed_documents_with(texts, &CallOptions::default()).await
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, AdapterError> {
        self.embed_query_with(text, &CallOptions::default()).await
    }
}

/// Create a completion adapter from a model specification
///
/// # Arguments
///
/// * `model` - Which provider to use and its configuration
/// * `options` - Credentials, retry policy and transport
///
/// # Example
///
/// ```rust,no_run
/// use llm_adapters::llm::{create_llm, Ai21Config, CallOptions, ClientOptions, Model};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let llm = create_llm(
///     Model::Ai21(Ai21Config::default().with_model("j2-ultra")),
///     ClientOptions::new(),
/// )?;
/// let text = llm.call("Say hello", CallOptions::new()).await?;
/// # Ok(())
/// # }
/// ```
pub fn create_llm(model: Model, options: ClientOptions) -> Result<Box<dyn Llm>, AdapterError> {
    match model {
        Model::Ai21(config) => Ok(Box::new(Ai21::new(config, options)?)),
        Model::AlephAlpha(config) => Ok(Box::new(AlephAlpha::new(config, options)?)),
    }
}
