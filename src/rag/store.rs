//! Qdrant-backed document store
//!
//! The ingestion job writes each chunk's body under the `text` payload key
//! and its source page under `url`; chunks missing `url` are still valid
//! and come back without provenance.

use async_trait::async_trait;
use qdrant_client::{
    client::QdrantClient,
    qdrant::{with_payload_selector::SelectorOptions, SearchPoints, WithPayloadSelector},
};
use std::sync::Arc;
use tracing::info;

use crate::embedding::EmbeddingEngine;
use crate::errors::{Result, TriageError};
use crate::rag::retriever::{Collection, DocumentChunk, StoreFactory, VectorStore};

/// Read-only similarity search over one qdrant collection
pub struct QdrantDocStore {
    client: Arc<QdrantClient>,
    collection_name: String,
    embedder: Arc<EmbeddingEngine>,
}

#[async_trait]
impl VectorStore for QdrantDocStore {
    async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<DocumentChunk>> {
        let query_vector = self
            .embedder
            .embed(query)
            .map_err(|e| TriageError::Embedding(e.to_string()))?;

        let search_result = self
            .client
            .search_points(&SearchPoints {
                collection_name: self.collection_name.clone(),
                vector: query_vector,
                limit: k as u64,
                with_payload: Some(WithPayloadSelector {
                    selector_options: Some(SelectorOptions::Enable(true)),
                }),
                ..Default::default()
            })
            .await
            .map_err(|e| {
                TriageError::IndexUnavailable(format!(
                    "search against '{}' failed: {}",
                    self.collection_name, e
                ))
            })?;

        let chunks = search_result
            .result
            .into_iter()
            .map(|point| DocumentChunk {
                text: payload_string(&point.payload, "text").unwrap_or_default(),
                source_url: payload_string(&point.payload, "url"),
            })
            .collect();

        Ok(chunks)
    }
}

fn payload_string(
    payload: &std::collections::HashMap<String, qdrant_client::qdrant::Value>,
    key: &str,
) -> Option<String> {
    use qdrant_client::qdrant::value::Kind;
    payload.get(key).and_then(|value| match value.kind.as_ref() {
        Some(Kind::StringValue(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    })
}

/// Opens per-collection qdrant handles. The probe at open time makes
/// unreachable-store and missing-collection errors fatal when the handle is
/// first built, rather than on some later query.
pub struct QdrantStoreFactory {
    client: Arc<QdrantClient>,
    embedder: Arc<EmbeddingEngine>,
    docs_collection: String,
    dev_collection: String,
}

impl QdrantStoreFactory {
    pub fn new(
        url: &str,
        embedder: Arc<EmbeddingEngine>,
        docs_collection: String,
        dev_collection: String,
    ) -> Result<Self> {
        let client = QdrantClient::from_url(url)
            .build()
            .map_err(|e| TriageError::Config(format!("failed to create qdrant client: {}", e)))?;

        Ok(Self {
            client: Arc::new(client),
            embedder,
            docs_collection,
            dev_collection,
        })
    }

    fn dataset_name(&self, collection: Collection) -> &str {
        match collection {
            Collection::Docs => &self.docs_collection,
            Collection::Dev => &self.dev_collection,
        }
    }
}

#[async_trait]
impl StoreFactory for QdrantStoreFactory {
    async fn open(&self, collection: Collection) -> Result<Arc<dyn VectorStore>> {
        let name = self.dataset_name(collection).to_string();

        self.client.collection_info(&name).await.map_err(|e| {
            TriageError::IndexUnavailable(format!("cannot open collection '{}': {}", name, e))
        })?;

        info!(collection = %collection, dataset = %name, "opened document collection");

        Ok(Arc::new(QdrantDocStore {
            client: self.client.clone(),
            collection_name: name,
            embedder: self.embedder.clone(),
        }))
    }
}
