//! Tool declaration helpers using JSON Schema generation

use schemars::{schema_for, JsonSchema};

use crate::llm::core::types::ToolDeclaration;

/// Create a tool declaration from a type that implements JsonSchema
///
/// The argument type's doc comments become parameter descriptions in the
/// generated schema.
///
/// # Example
///
/// ```ignore
/// use schemars::JsonSchema;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, JsonSchema)]
/// struct SummarizeArgs {
///     /// Text to summarize
///     text: String,
///     /// Upper bound on summary length, in words
///     max_words: u32,
/// }
///
/// let decl = create_tool_declaration::<SummarizeArgs>(
///     "summarize",
///     "Summarize a passage of text"
/// );
/// ```
pub fn create_tool_declaration<T: JsonSchema>(
    name: impl Into<String>,
    description: impl Into<String>,
) -> ToolDeclaration {
    ToolDeclaration {
        name: name.into(),
        description: description.into(),
        input_schema: schema_value::<T>(),
    }
}

/// JSON Schema of `T` as a JSON value
pub fn schema_value<T: JsonSchema>() -> serde_json::Value {
    serde_json::to_value(schema_for!(T)).unwrap_or_else(|_| serde_json::json!({"type": "object"}))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[allow(dead_code)]
    #[derive(Deserialize, JsonSchema)]
    struct TestArgs {
        /// Text to summarize
        text: String,
        /// Upper bound on summary length
        max_words: u32,
    }

    #[test]
    fn test_create_tool_declaration() {
        let decl = create_tool_declaration::<TestArgs>("summarize", "Summarize text");

        assert_eq!(decl.name, "summarize");
        assert_eq!(decl.description, "Summarize text");

        let schema_obj = decl.input_schema.as_object().unwrap();
        assert!(schema_obj.contains_key("$schema"));
        assert!(schema_obj.contains_key("title"));
        assert!(schema_obj.contains_key("type"));
        assert!(schema_obj.contains_key("properties"));
    }

    #[test]
    fn test_schema_includes_doc_comments() {
        let schema_str = serde_json::to_string_pretty(&schema_value::<TestArgs>()).unwrap();

        assert!(schema_str.contains("Text to summarize"));
        assert!(schema_str.contains("Upper bound on summary length"));
    }
}
