//! In-memory vector store with cosine similarity

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Document, VectorStore};
use crate::llm::core::{error::AdapterError, provider::Embeddings};

struct Entry {
    document: Document,
    vector: Vec<f32>,
}

/// Keeps every document and its embedding in memory
pub struct MemoryVectorStore {
    embeddings: Arc<dyn Embeddings>,
    entries: RwLock<Vec<Entry>>,
}

impl MemoryVectorStore {
    pub fn new(embeddings: Arc<dyn Embeddings>) -> Self {
        Self {
            embeddings,
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Store documents with precomputed vectors
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` when the two lists differ in length.
    pub async fn add_vectors(
        &self,
        vectors: Vec<Vec<f32>>,
        documents: Vec<Document>,
    ) -> Result<Vec<String>, AdapterError> {
        if vectors.len() != documents.len() {
            return Err(AdapterError::InvalidRequest(format!(
                "got {} vectors for {} documents",
                vectors.len(),
                documents.len()
            )));
        }

        let mut entries = self.entries.write().await;
        let mut ids = Vec::with_capacity(documents.len());
        for (vector, mut document) in vectors.into_iter().zip(documents) {
            let id = document
                .id
                .get_or_insert_with(|| Uuid::new_v4().to_string())
                .clone();
            ids.push(id);
            entries.push(Entry { document, vector });
        }
        Ok(ids)
    }

    /// Number of stored documents
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Search with a precomputed query vector
    pub async fn similarity_search_by_vector(&self, query: &[f32], k: usize) -> Vec<(Document, f32)> {
        let entries = self.entries.read().await;
        let mut scored: Vec<(&Entry, f32)> = entries
            .iter()
            .map(|entry| (entry, cosine_similarity(query, &entry.vector)))
            .collect();

        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored
            .into_iter()
            .take(k)
            .map(|(entry, score)| (entry.document.clone(), score))
            .collect()
    }
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn add_documents(&self, documents: Vec<Document>) -> Result<Vec<String>, AdapterError> {
        let texts: Vec<String> = documents.iter().map(|d| d.page_content.clone()).collect();
        let vectors = self.embeddings.embed_documents(&texts).await?;
        self.add_vectors(vectors, documents).await
    }

    async fn similarity_search_with_score(
        &self,
        query: &str,
        k: usize,
    ) -> Result<Vec<(Document, f32)>, AdapterError> {
        if k == 0 {
            return Ok(Vec::new());
        }
        let query = self.embeddings.embed_query(query).await?;
        Ok(self.similarity_search_by_vector(&query, k).await)
    }
}

/// Cosine similarity; 0 when either vector has zero length or the sizes differ
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::core::config::CallOptions;

    /// Embeds text as counts of the letters a, b and c
    struct LetterEmbeddings;

    fn letters(text: &str) -> Vec<f32> {
        ['a', 'b', 'c']
            .iter()
            .map(|l| text.chars().filter(|c| c == l).count() as f32)
            .collect()
    }

    #[async_trait]
    impl Embeddings for LetterEmbeddings {
        async fn embed_documents_with(
            &self,
            texts: &[String],
            _options: &CallOptions,
        ) -> Result<Vec<Vec<f32>>, AdapterError> {
            Ok(texts.iter().map(|t| letters(t)).collect())
        }

        async fn embed_query_with(&self, text: &str, _options: &CallOptions) -> Result<Vec<f32>, AdapterError> {
            Ok(letters(text))
        }
    }

    fn store() -> MemoryVectorStore {
        MemoryVectorStore::new(Arc::new(LetterEmbeddings))
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
    }

    #[tokio::test]
    async fn test_nearest_first() {
        let store = store();
        store
            .add_documents(vec![
                Document::new("aaaa").with_id("a"),
                Document::new("bbbb").with_id("b"),
                Document::new("cccc").with_id("c"),
            ])
            .await
            .unwrap();

        let results = store.similarity_search_with_score("bbbc", 2).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0.id.as_deref(), Some("b"));
        assert_eq!(results[1].0.id.as_deref(), Some("c"));
        assert!(results[0].1 > results[1].1);
    }

    #[tokio::test]
    async fn test_assigns_ids_and_keeps_metadata() {
        let store = store();
        let ids = store
            .add_documents(vec![Document::new("abc").with_metadata("source", serde_json::json!("unit"))])
            .await
            .unwrap();

        assert_eq!(ids.len(), 1);
        assert!(Uuid::parse_str(&ids[0]).is_ok());

        let docs = store.similarity_search("abc", 1).await.unwrap();
        assert_eq!(docs[0].metadata["source"], "unit");
        assert_eq!(docs[0].id.as_deref(), Some(ids[0].as_str()));
    }

    #[tokio::test]
    async fn test_k_zero_and_empty_store() {
        let store = store();
        assert!(store.similarity_search("abc", 3).await.unwrap().is_empty());

        store.add_documents(vec![Document::new("abc")]).await.unwrap();
        assert!(store.similarity_search("abc", 0).await.unwrap().is_empty());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_add_vectors_length_mismatch() {
        let err = store()
            .add_vectors(vec![vec![1.0]], vec![])
            .await
            .unwrap_err();
        assert!(matches!(err, AdapterError::InvalidRequest(_)));
    }
}
