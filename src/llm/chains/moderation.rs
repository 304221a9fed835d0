//! Content moderation chain
//!
//! Passes text through unchanged unless the moderation endpoint flags it, in
//! which case the text is replaced by a fixed policy message, or the call
//! fails with `ContentPolicy` when `throw_error` is set.

use async_trait::async_trait;
use tracing::info;

use super::{require_str, Chain, ChainValues};
use crate::llm::core::{config::CallOptions, error::AdapterError, types::ModerationVerdict};
use crate::llm::openai::OpenAiModeration;

/// Replacement text for flagged input
pub const POLICY_VIOLATION_MESSAGE: &str = "Text was found that violates OpenAI's content policy.";

pub struct ModerationChain {
    client: OpenAiModeration,
    throw_error: bool,
    input_key: String,
    output_key: String,
}

impl ModerationChain {
    pub fn new(client: OpenAiModeration) -> Self {
        Self {
            client,
            throw_error: false,
            input_key: "input".to_string(),
            output_key: "output".to_string(),
        }
    }

    /// Fail with `ContentPolicy` instead of substituting the policy message
    pub fn with_throw_error(mut self, throw_error: bool) -> Self {
        self.throw_error = throw_error;
        self
    }

    pub fn with_input_key(mut self, key: impl Into<String>) -> Self {
        self.input_key = key.into();
        self
    }

    pub fn with_output_key(mut self, key: impl Into<String>) -> Self {
        self.output_key = key.into();
        self
    }

    /// Moderate `text`, returning the text to pass on and the verdicts
    pub async fn moderate(
        &self,
        text: &str,
        options: &CallOptions,
    ) -> Result<(String, Vec<ModerationVerdict>), AdapterError> {
        let results = self.client.moderate(&[text.to_string()], options).await?;
        let output = self.apply_verdict(text, &results[0])?;
        Ok((output, results))
    }

    fn apply_verdict(&self, text: &str, verdict: &ModerationVerdict) -> Result<String, AdapterError> {
        if !verdict.flagged {
            return Ok(text.to_string());
        }

        info!(categories = ?verdict.flagged_categories(), "input flagged by moderation");
        if self.throw_error {
            Err(AdapterError::ContentPolicy(POLICY_VIOLATION_MESSAGE.to_string()))
        } else {
            Ok(POLICY_VIOLATION_MESSAGE.to_string())
        }
    }
}

#[async_trait]
impl Chain for ModerationChain {
    fn chain_type(&self) -> &'static str {
        "moderation_chain"
    }

    fn input_keys(&self) -> Vec<String> {
        vec![self.input_key.clone()]
    }

    fn output_keys(&self) -> Vec<String> {
        vec![self.output_key.clone()]
    }

    async fn call(&self, values: ChainValues) -> Result<ChainValues, AdapterError> {
        let text = require_str(&values, &self.input_key)?;
        let (output, results) = self.moderate(text, &CallOptions::default()).await?;

        let mut outputs = ChainValues::new();
        outputs.insert(self.output_key.clone(), serde_json::Value::String(output));
        outputs.insert("results".to_string(), serde_json::to_value(results)?);
        Ok(outputs)
    }
}
