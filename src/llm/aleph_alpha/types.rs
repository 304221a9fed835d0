//! Aleph Alpha request and response types

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Optional sampling parameters, sent only when set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_tokens: Option<u32>,
    /// Echo the prompt back in the completion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub echo: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence_penalty_min_length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repetition_penalties_include_prompt: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repetition_penalties_include_completion: Option<bool>,
    /// Server-side candidates to sample before picking the best
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_of: Option<u32>,
    /// Completions to return
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logit_bias: Option<HashMap<String, f32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_probs: Option<u32>,
    /// Return the completion tokens as well as the text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_completion: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_optimizations: Option<bool>,
}

/// Body of a `/complete` request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompleteRequest {
    pub model: String,
    pub prompt: String,
    pub maximum_tokens: u32,
    #[serde(flatten)]
    pub params: SamplingParams,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub stop_sequences: Vec<String>,
}

/// Completion response envelope
#[derive(Debug, Clone, Deserialize)]
pub struct CompleteResponse {
    #[serde(default)]
    pub model_version: Option<String>,
    #[serde(default)]
    pub completions: Vec<Completion>,
}

/// One returned completion
#[derive(Debug, Clone, Deserialize)]
pub struct Completion {
    /// Null when the model stopped before producing text
    #[serde(default)]
    pub completion: Option<String>,
    #[serde(default)]
    pub finish_reason: Option<String>,
    #[serde(default)]
    pub raw_completion: Option<String>,
}
