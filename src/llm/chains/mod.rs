//! Chains: components mapping named inputs to named outputs

pub mod moderation;

pub use moderation::{ModerationChain, POLICY_VIOLATION_MESSAGE};

use async_trait::async_trait;

use crate::llm::core::error::AdapterError;

/// Named values flowing into and out of a chain
pub type ChainValues = serde_json::Map<String, serde_json::Value>;

#[async_trait]
pub trait Chain: Send + Sync {
    /// Short identifier of the chain
    fn chain_type(&self) -> &'static str;

    /// Keys `call` reads from its input
    fn input_keys(&self) -> Vec<String>;

    /// Keys `call` always writes to its output
    fn output_keys(&self) -> Vec<String>;

    async fn call(&self, values: ChainValues) -> Result<ChainValues, AdapterError>;
}

/// Read a required string input
pub(crate) fn require_str<'a>(values: &'a ChainValues, key: &str) -> Result<&'a str, AdapterError> {
    values
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| AdapterError::InvalidRequest(format!("missing string input `{}`", key)))
}
