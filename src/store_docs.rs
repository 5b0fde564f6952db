//! Semantic search over car description documents.
//!
//! Holds the description table in memory plus a lazily-built vector index:
//! one embedding per document, produced on first search and reused for the
//! lifetime of the store. Search is brute-force cosine similarity, which
//! is plenty at fleet scale.

use anyhow::{Context, Result};
use std::path::Path;
use tokio::sync::OnceCell;

use crate::embedding::{cosine_similarity, EmbeddingProvider};
use crate::models::DocRecord;

/// Read-only semantic description store.
#[derive(Debug)]
pub struct DocStore {
    docs: Vec<DocRecord>,
    index: OnceCell<Vec<Vec<f32>>>,
}

impl DocStore {
    /// Load the description table from a CSV file (`id,text,category`).
    pub fn load(path: &Path) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("Failed to open docs table: {}", path.display()))?;

        let mut docs = Vec::new();
        for row in reader.deserialize() {
            let record: DocRecord =
                row.with_context(|| format!("Malformed row in {}", path.display()))?;
            docs.push(record);
        }

        Ok(Self {
            docs,
            index: OnceCell::new(),
        })
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Whether the vector index has been built yet.
    pub fn indexed(&self) -> bool {
        self.index.initialized()
    }

    /// Return up to `k` documents nearest to `query`, best first.
    ///
    /// The index is built on the first call; concurrent first calls are
    /// collapsed into a single build. Results are deterministic for a
    /// fixed index and query: similarity descending, table order on ties.
    pub async fn search(
        &self,
        provider: &dyn EmbeddingProvider,
        query: &str,
        k: usize,
    ) -> Result<Vec<DocRecord>> {
        if self.docs.is_empty() {
            return Ok(Vec::new());
        }

        let index = self
            .index
            .get_or_try_init(|| async {
                tracing::info!(
                    docs = self.docs.len(),
                    model = provider.model_name(),
                    "building semantic index"
                );
                let texts: Vec<String> = self.docs.iter().map(|d| d.text.clone()).collect();
                provider.embed_batch(&texts).await
            })
            .await?;

        let query_vec = provider.embed(query).await?;

        let mut ranked: Vec<(usize, f32)> = index
            .iter()
            .enumerate()
            .map(|(i, vec)| (i, cosine_similarity(&query_vec, vec)))
            .collect();

        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(k);

        Ok(ranked.into_iter().map(|(i, _)| self.docs[i].clone()).collect())
    }
}
