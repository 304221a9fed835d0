//! Aleph Alpha adapter configuration

use serde::{Deserialize, Serialize};

use super::types::SamplingParams;

/// Static configuration of an Aleph Alpha adapter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlephAlphaConfig {
    /// Model name
    pub model: String,
    /// Maximum tokens to generate
    pub maximum_tokens: u32,
    /// Optional sampling parameters
    #[serde(flatten)]
    pub params: SamplingParams,
    /// Stop sequences applied to every call
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_sequences: Option<Vec<String>>,
}

impl Default for AlephAlphaConfig {
    fn default() -> Self {
        Self {
            model: "luminous-base".to_string(),
            maximum_tokens: 64,
            params: SamplingParams::default(),
            stop_sequences: None,
        }
    }
}

impl AlephAlphaConfig {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_maximum_tokens(mut self, maximum_tokens: u32) -> Self {
        self.maximum_tokens = maximum_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.params.temperature = Some(temperature);
        self
    }

    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.params.top_k = Some(top_k);
        self
    }

    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.params.top_p = Some(top_p);
        self
    }

    pub fn with_params(mut self, params: SamplingParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_stop_sequences(mut self, stop: Vec<String>) -> Self {
        self.stop_sequences = Some(stop);
        self
    }
}
