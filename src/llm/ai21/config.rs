//! AI21 adapter configuration

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::types::PenaltyDescriptor;

/// Static configuration of an AI21 adapter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ai21Config {
    /// Model name, templated into the endpoint URL
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Minimum tokens to generate
    pub min_tokens: u32,
    /// Nucleus sampling threshold
    pub top_p: f32,
    pub presence_penalty: PenaltyDescriptor,
    pub count_penalty: PenaltyDescriptor,
    pub frequency_penalty: PenaltyDescriptor,
    /// Completions requested per prompt
    pub num_results: u32,
    /// Token-to-bias map
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logit_bias: Option<HashMap<String, f32>>,
    /// Stop sequences applied to every call
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,
}

impl Default for Ai21Config {
    fn default() -> Self {
        Self {
            model: "j2-jumbo-instruct".to_string(),
            temperature: 0.7,
            max_tokens: 1024,
            min_tokens: 0,
            top_p: 1.0,
            presence_penalty: PenaltyDescriptor::default(),
            count_penalty: PenaltyDescriptor::default(),
            frequency_penalty: PenaltyDescriptor::default(),
            num_results: 1,
            logit_bias: None,
            stop: None,
        }
    }
}

impl Ai21Config {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_min_tokens(mut self, min_tokens: u32) -> Self {
        self.min_tokens = min_tokens;
        self
    }

    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = top_p;
        self
    }

    pub fn with_presence_penalty(mut self, penalty: PenaltyDescriptor) -> Self {
        self.presence_penalty = penalty;
        self
    }

    pub fn with_count_penalty(mut self, penalty: PenaltyDescriptor) -> Self {
        self.count_penalty = penalty;
        self
    }

    pub fn with_frequency_penalty(mut self, penalty: PenaltyDescriptor) -> Self {
        self.frequency_penalty = penalty;
        self
    }

    pub fn with_num_results(mut self, num_results: u32) -> Self {
        self.num_results = num_results;
        self
    }

    pub fn with_logit_bias(mut self, logit_bias: HashMap<String, f32>) -> Self {
        self.logit_bias = Some(logit_bias);
        self
    }

    pub fn with_stop(mut self, stop: Vec<String>) -> Self {
        self.stop = Some(stop);
        self
    }
}
