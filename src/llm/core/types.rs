//! Core types shared by the adapters

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::llm::ai21::Ai21Config;
use crate::llm::aleph_alpha::AlephAlphaConfig;

/// One completion for one prompt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Generation {
    /// Generated text
    pub text: String,
    /// Provider-specific extras (finish reason, log probs, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_info: Option<serde_json::Value>,
}

impl Generation {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            generation_info: None,
        }
    }
}

/// Result of generating over a batch of prompts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LlmResult {
    /// One inner list per input prompt
    pub generations: Vec<Vec<Generation>>,
}

impl LlmResult {
    /// Text of the first generation for each prompt
    pub fn texts(&self) -> Vec<&str> {
        self.generations
            .iter()
            .filter_map(|g| g.first())
            .map(|g| g.text.as_str())
            .collect()
    }
}

/// Outcome of moderating one input
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModerationVerdict {
    /// Whether any category was violated
    pub flagged: bool,
    /// Per-category violation flags
    #[serde(default)]
    pub categories: BTreeMap<String, bool>,
    /// Per-category confidence scores
    #[serde(default)]
    pub category_scores: BTreeMap<String, f64>,
}

impl ModerationVerdict {
    /// Names of the categories that were flagged
    pub fn flagged_categories(&self) -> Vec<&str> {
        self.categories
            .iter()
            .filter(|(_, flagged)| **flagged)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

/// Declaration of a tool available to a model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDeclaration {
    /// Function name
    pub name: String,
    /// What the tool does
    pub description: String,
    /// JSON Schema for parameters
    pub input_schema: serde_json::Value,
}

/// Unified model selection for the completion adapters
#[derive(Debug, Clone)]
pub enum Model {
    /// AI21 Studio completion model
    Ai21(Ai21Config),
    /// Aleph Alpha completion model
    AlephAlpha(AlephAlphaConfig),
}

impl Model {
    /// Get the model identifier as a string
    pub fn as_str(&self) -> &str {
        match self {
            Model::Ai21(config) => &config.model,
            Model::AlephAlpha(config) => &config.model,
        }
    }
}
