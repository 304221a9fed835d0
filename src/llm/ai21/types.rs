//! AI21 Studio request and response types
//!
//! These types map directly to the `/{model}/complete` endpoint schema.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// How strongly to discourage repeated tokens, and which token kinds it applies to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PenaltyDescriptor {
    /// Penalty strength (0 disables the penalty)
    pub scale: f64,
    pub apply_to_whitespaces: bool,
    pub apply_to_punctuations: bool,
    pub apply_to_numbers: bool,
    pub apply_to_stopwords: bool,
    pub apply_to_emojis: bool,
}

impl PenaltyDescriptor {
    /// A penalty of the given scale applying to every token category
    pub fn with_scale(scale: f64) -> Self {
        Self {
            scale,
            ..Self::default()
        }
    }
}

impl Default for PenaltyDescriptor {
    fn default() -> Self {
        Self {
            scale: 0.0,
            apply_to_whitespaces: true,
            apply_to_punctuations: true,
            apply_to_numbers: true,
            apply_to_stopwords: true,
            apply_to_emojis: true,
        }
    }
}

/// Body of a completion request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteRequest {
    pub prompt: String,
    pub stop_sequences: Vec<String>,
    pub max_tokens: u32,
    pub min_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub presence_penalty: PenaltyDescriptor,
    pub count_penalty: PenaltyDescriptor,
    pub frequency_penalty: PenaltyDescriptor,
    pub num_results: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logit_bias: Option<HashMap<String, f32>>,
}

/// Completion response envelope
#[derive(Debug, Clone, Deserialize)]
pub struct CompleteResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub completions: Vec<Completion>,
}

/// One returned completion
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Completion {
    #[serde(default)]
    pub data: Option<CompletionData>,
    #[serde(default)]
    pub finish_reason: Option<FinishReason>,
}

/// Generated text and its tokens
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionData {
    /// Absent when the model produced nothing
    #[serde(default)]
    pub text: Option<String>,
}

/// Why generation stopped
#[derive(Debug, Clone, Deserialize)]
pub struct FinishReason {
    pub reason: String,
    #[serde(default)]
    pub length: Option<u32>,
    #[serde(default)]
    pub sequence: Option<String>,
}
