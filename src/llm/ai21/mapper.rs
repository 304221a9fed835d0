//! Mapping between adapter configuration and AI21 wire types

use crate::llm::core::error::AdapterError;

use super::config::Ai21Config;
use super::types::{CompleteRequest, CompleteResponse};

const BASE_URL: &str = "https://api.ai21.com/studio/v1";
const EXPERIMENTAL_BASE_URL: &str = "https://api.ai21.com/studio/v1/experimental";

/// Default base URL for a model
///
/// `j1-grande-instruct` is only served from the experimental path.
pub fn default_base_url(model: &str) -> &'static str {
    if model == "j1-grande-instruct" {
        EXPERIMENTAL_BASE_URL
    } else {
        BASE_URL
    }
}

/// Build the request body from static configuration and merged stop sequences
pub fn to_complete_request(config: &Ai21Config, prompt: &str, stop_sequences: Vec<String>) -> CompleteRequest {
    CompleteRequest {
        prompt: prompt.to_string(),
        stop_sequences,
        max_tokens: config.max_tokens,
        min_tokens: config.min_tokens,
        temperature: config.temperature,
        top_p: config.top_p,
        presence_penalty: config.presence_penalty,
        count_penalty: config.count_penalty,
        frequency_penalty: config.frequency_penalty,
        num_results: config.num_results,
        logit_bias: config.logit_bias.clone(),
    }
}

/// Extract the first completion's text
///
/// An empty `completions` array or a completion without `data` is an
/// `EmptyResult`; `data` without `text` means the model generated nothing and
/// yields `""`.
pub fn from_complete_response(response: CompleteResponse) -> Result<String, AdapterError> {
    let data = response
        .completions
        .into_iter()
        .next()
        .and_then(|completion| completion.data)
        .ok_or_else(|| AdapterError::EmptyResult {
            provider: "AI21".to_string(),
            field: "completions".to_string(),
        })?;

    Ok(data.text.unwrap_or_default())
}
