//! Tool executor trait

use async_trait::async_trait;

/// Executes tool calls by name
///
/// Failures are reported as plain messages so they can be handed back to a
/// model verbatim.
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    /// Execute a tool call
    ///
    /// # Arguments
    ///
    /// * `tool_use_id` - Unique identifier for this tool invocation
    /// * `name` - Name of the tool to execute
    /// * `arguments` - Tool arguments as a JSON value
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - Successful execution result (JSON string)
    /// * `Err(String)` - Error message describing what went wrong
    async fn execute(
        &self,
        tool_use_id: String,
        name: String,
        arguments: serde_json::Value,
    ) -> Result<String, String>;
}
