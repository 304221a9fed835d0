//! Vector stores over any `Embeddings` model

pub mod memory;

pub use memory::MemoryVectorStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::llm::core::error::AdapterError;

/// A piece of text with metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub page_content: String,
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
    /// Assigned by the store when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Document {
    pub fn new(page_content: impl Into<String>) -> Self {
        Self {
            page_content: page_content.into(),
            metadata: serde_json::Map::new(),
            id: None,
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Embed and store documents, returning their ids in input order
    async fn add_documents(&self, documents: Vec<Document>) -> Result<Vec<String>, AdapterError>;

    /// The `k` documents most similar to `query`, best first, with their scores
    async fn similarity_search_with_score(
        &self,
        query: &str,
        k: usize,
    ) -> Result<Vec<(Document, f32)>, AdapterError>;

    /// The `k` documents most similar to `query`, best first
    async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<Document>, AdapterError> {
        Ok(self
            .similarity_search_with_score(query, k)
            .await?
            .into_iter()
            .map(|(document, _)| document)
            .collect())
    }
}
