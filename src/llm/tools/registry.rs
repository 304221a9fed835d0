//! Registry of callable tools

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::declaration::create_tool_declaration;
use super::executor::ToolExecutor;
use super::structured::StructuredTool;
use crate::llm::core::types::ToolDeclaration;

/// Type alias for boxed async functions
type AsyncToolFn = Box<
    dyn Fn(serde_json::Value) -> BoxFuture<'static, Result<String, String>> + Send + Sync,
>;

/// Errors raised while registering tools
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Tool already registered: {0}")]
    DuplicateTool(String),
}

struct Registered {
    function: AsyncToolFn,
    /// Present for tools registered with a schema
    declaration: Option<ToolDeclaration>,
}

/// Registry mapping tool names to executable functions
///
/// Arguments are deserialized from JSON before the function runs and results
/// are serialized back to JSON strings.
///
/// # Example
///
/// ```ignore
/// let mut registry = ToolRegistry::new();
/// registry.register_tool(Arc::new(LlmTool::new(llm, "complete", "Complete a prompt")))?;
/// registry.register_sync("word_count", |args: WordCountArgs| {
///     Ok(args.text.split_whitespace().count())
/// });
///
/// let declarations = registry.declarations();
/// ```
pub struct ToolRegistry {
    tools: HashMap<String, Registered>,
}

impl ToolRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a structured tool under its own name
    ///
    /// # Errors
    ///
    /// Returns `DuplicateTool` if the name is taken.
    pub fn register_tool(&mut self, tool: Arc<dyn StructuredTool>) -> Result<(), RegistryError> {
        let name = tool.name().to_string();
        if self.tools.contains_key(&name) {
            return Err(RegistryError::DuplicateTool(name));
        }

        let declaration = tool.declaration();
        let function = move |args: serde_json::Value| {
            let tool = Arc::clone(&tool);
            Box::pin(async move { tool.invoke(args).await }) as BoxFuture<'static, _>
        };

        self.tools.insert(
            name,
            Registered {
                function: Box::new(function),
                declaration: Some(declaration),
            },
        );
        Ok(())
    }

    /// Register an async function with a schema derived from its argument type
    ///
    /// # Errors
    ///
    /// Returns `DuplicateTool` if the name is taken.
    pub fn register_async_tool<F, Args, R, Fut>(
        &mut self,
        name: &str,
        description: &str,
        func: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn(Args) -> Fut + Send + Sync + 'static,
        Args: DeserializeOwned + JsonSchema + Send + 'static,
        R: Serialize + Send + 'static,
        Fut: Future<Output = Result<R, String>> + Send + 'static,
    {
        if self.tools.contains_key(name) {
            return Err(RegistryError::DuplicateTool(name.to_string()));
        }
        self.register_async(name, func);
        if let Some(registered) = self.tools.get_mut(name) {
            registered.declaration = Some(create_tool_declaration::<Args>(name, description));
        }
        Ok(())
    }

    /// Register an async function that returns a serializable result
    ///
    /// Replaces any function already registered under `name`.
    pub fn register_async<F, Args, R, Fut>(&mut self, name: impl Into<String>, func: F)
    where
        F: Fn(Args) -> Fut + Send + Sync + 'static,
        Args: DeserializeOwned + Send + 'static,
        R: Serialize + Send + 'static,
        Fut: Future<Output = Result<R, String>> + Send + 'static,
    {
        let wrapper = move |args_json: serde_json::Value| {
            let args = match serde_json::from_value::<Args>(args_json) {
                Ok(args) => args,
                Err(e) => {
                    let err_msg = format!("Failed to deserialize arguments: {}", e);
                    return Box::pin(async move { Err(err_msg) }) as BoxFuture<'static, _>;
                }
            };

            let future = func(args);

            Box::pin(async move {
                let result = future.await?;
                serde_json::to_string(&result).map_err(|e| format!("Failed to serialize result: {}", e))
            }) as BoxFuture<'static, _>
        };

        self.insert_function(name.into(), Box::new(wrapper));
    }

    /// Register a synchronous function that returns a serializable result
    ///
    /// Replaces any function already registered under `name`.
    pub fn register_sync<F, Args, R>(&mut self, name: impl Into<String>, func: F)
    where
        F: Fn(Args) -> Result<R, String> + Send + Sync + 'static,
        Args: DeserializeOwned + Send + 'static,
        R: Serialize + Send + 'static,
    {
        let wrapper = move |args_json: serde_json::Value| {
            let result = serde_json::from_value::<Args>(args_json)
                .map_err(|e| format!("Failed to deserialize arguments: {}", e))
                .and_then(&func)
                .and_then(|result| {
                    serde_json::to_string(&result).map_err(|e| format!("Failed to serialize result: {}", e))
                });

            Box::pin(async move { result }) as BoxFuture<'static, _>
        };

        self.insert_function(name.into(), Box::new(wrapper));
    }

    fn insert_function(&mut self, name: String, function: AsyncToolFn) {
        self.tools.insert(
            name,
            Registered {
                function,
                declaration: None,
            },
        );
    }

    /// Check if a tool is registered
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Get the number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Declarations of every tool registered with a schema, sorted by name
    pub fn declarations(&self) -> Vec<ToolDeclaration> {
        let mut declarations: Vec<ToolDeclaration> = self
            .tools
            .values()
            .filter_map(|r| r.declaration.clone())
            .collect();
        declarations.sort_by(|a, b| a.name.cmp(&b.name));
        declarations
    }

    async fn execute_function(&self, name: &str, arguments: serde_json::Value) -> Result<String, String> {
        match self.tools.get(name) {
            Some(registered) => (registered.function)(arguments).await,
            None => Err(format!("Unknown tool: {}", name)),
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolExecutor for ToolRegistry {
    async fn execute(
        &self,
        tool_use_id: String,
        name: String,
        arguments: serde_json::Value,
    ) -> Result<String, String> {
        debug!(tool_use_id = %tool_use_id, tool = %name, "executing tool");
        self.execute_function(&name, arguments).await
    }
}
