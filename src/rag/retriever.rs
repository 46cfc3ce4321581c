//! Semantic retrieval over the named document collections
//!
//! Store handles are expensive to open (remote collection probe), so the
//! retriever owns a registry of lazily-built, once-per-key handles behind a
//! mutex. The factory is injectable: tests substitute fake stores per key.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use crate::errors::Result;

/// Named partition of the document index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    /// End-user documentation
    Docs,
    /// Developer-hub documentation (API/SDK)
    Dev,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Docs => "docs",
            Collection::Dev => "dev",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bounded excerpt of a source document, with provenance when the index
/// carries it. Ordering among chunks for a query is similarity-ranked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub text: String,
    pub source_url: Option<String>,
}

/// A read-only similarity index over one collection
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Top-k most similar chunks for the query, ranked best-first.
    /// An empty result is a normal outcome; errors mean the index itself
    /// failed.
    async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<DocumentChunk>>;
}

/// Opens the store handle for a collection. Construction errors (store
/// unreachable, collection missing) propagate to the caller.
#[async_trait]
pub trait StoreFactory: Send + Sync {
    async fn open(&self, collection: Collection) -> Result<Arc<dyn VectorStore>>;
}

/// Retriever with a memoized per-collection handle registry.
///
/// The mutex is held across handle construction, so concurrent first-use of
/// the same collection builds exactly one handle; later callers reuse it.
pub struct Retriever {
    factory: Arc<dyn StoreFactory>,
    handles: Mutex<HashMap<Collection, Arc<dyn VectorStore>>>,
}

impl Retriever {
    pub fn new(factory: Arc<dyn StoreFactory>) -> Self {
        Self {
            factory,
            handles: Mutex::new(HashMap::new()),
        }
    }

    /// Top-k chunks from the given collection, at most `k`, possibly empty
    pub async fn search(
        &self,
        query: &str,
        collection: Collection,
        k: usize,
    ) -> Result<Vec<DocumentChunk>> {
        let store = self.store(collection).await?;
        let mut chunks = store.similarity_search(query, k).await?;
        chunks.truncate(k);
        debug!(collection = %collection, returned = chunks.len(), "similarity search");
        Ok(chunks)
    }

    async fn store(&self, collection: Collection) -> Result<Arc<dyn VectorStore>> {
        let mut handles = self.handles.lock().await;
        if let Some(store) = handles.get(&collection) {
            return Ok(store.clone());
        }

        let store = self.factory.open(collection).await?;
        handles.insert(collection, store.clone());
        Ok(store)
    }
}
