//! Tool execution framework
//!
//! Adapters and chains can be exposed to an agent loop as named tools. Every
//! tool carries a JSON Schema for its arguments, generated with `schemars`
//! from the argument type, and is executed through the `ToolExecutor` trait.

pub mod declaration;
pub mod executor;
pub mod registry;
pub mod structured;

// Re-export commonly used types
pub use declaration::{create_tool_declaration, schema_value};
pub use executor::ToolExecutor;
pub use registry::{RegistryError, ToolRegistry};
pub use structured::{LlmTool, ModerationArgs, ModerationTool, PromptArgs, StructuredTool};
