//! Exposing adapters as callable tools

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::declaration::schema_value;
use crate::llm::chains::ModerationChain;
use crate::llm::core::{config::CallOptions, provider::Llm, types::ToolDeclaration};

/// A named capability with a parameter schema
#[async_trait]
pub trait StructuredTool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON Schema of the accepted arguments
    fn schema(&self) -> serde_json::Value;

    /// Run the tool; errors are messages meant for the model
    async fn invoke(&self, arguments: serde_json::Value) -> Result<String, String>;

    fn declaration(&self) -> ToolDeclaration {
        ToolDeclaration {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.schema(),
        }
    }
}

fn parse_args<T: serde::de::DeserializeOwned>(arguments: serde_json::Value) -> Result<T, String> {
    serde_json::from_value(arguments).map_err(|e| format!("Failed to deserialize arguments: {}", e))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Failed to serialize result: {}", e))
}

/// Arguments accepted by `LlmTool`
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct PromptArgs {
    /// The prompt to complete
    pub prompt: String,
    /// Sequences at which generation stops
    #[serde(default)]
    pub stop: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct CompletionOutput {
    text: String,
}

/// Any completion model, callable as a tool
pub struct LlmTool {
    llm: Arc<dyn Llm>,
    name: String,
    description: String,
}

impl LlmTool {
    pub fn new(llm: Arc<dyn Llm>, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            llm,
            name: name.into(),
            description: description.into(),
        }
    }
}

#[async_trait]
impl StructuredTool for LlmTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn schema(&self) -> serde_json::Value {
        schema_value::<PromptArgs>()
    }

    async fn invoke(&self, arguments: serde_json::Value) -> Result<String, String> {
        let args: PromptArgs = parse_args(arguments)?;
        let options = match args.stop {
            Some(stop) => CallOptions::new().with_stop(stop),
            None => CallOptions::new(),
        };

        let text = self
            .llm
            .call(&args.prompt, options)
            .await
            .map_err(|e| e.to_string())?;
        to_json(&CompletionOutput { text })
    }
}

/// Arguments accepted by `ModerationTool`
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ModerationArgs {
    /// Text to check against the content policy
    pub input: String,
}

#[derive(Debug, Serialize)]
struct ModerationOutput {
    output: String,
    flagged: bool,
}

/// The moderation chain, callable as a tool
pub struct ModerationTool {
    chain: Arc<ModerationChain>,
}

impl ModerationTool {
    pub fn new(chain: Arc<ModerationChain>) -> Self {
        Self { chain }
    }
}

#[async_trait]
impl StructuredTool for ModerationTool {
    fn name(&self) -> &str {
        "moderate_text"
    }

    fn description(&self) -> &str {
        "Check text against the content policy. Returns the text unchanged when it is acceptable."
    }

    fn schema(&self) -> serde_json::Value {
        schema_value::<ModerationArgs>()
    }

    async fn invoke(&self, arguments: serde_json::Value) -> Result<String, String> {
        let args: ModerationArgs = parse_args(arguments)?;
        let (output, results) = self
            .chain
            .moderate(&args.input, &CallOptions::default())
            .await
            .map_err(|e| e.to_string())?;

        to_json(&ModerationOutput {
            output,
            flagged: results.iter().any(|r| r.flagged),
        })
    }
}
