use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::models::resume::{MatchResult, ResumeDocument};
use crate::vector::{
    confidence_from_distance, Embedder, EmbeddingError, IndexRecord, VectorIndex,
    VectorStoreError,
};

/// Embeds documents and queries, and delegates storage to a `VectorIndex`.
pub struct VectorStore {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
}

impl VectorStore {
    pub fn new(embedder: Arc<dyn Embedder>, index: Arc<dyn VectorIndex>) -> Self {
        Self { embedder, index }
    }

    /// Upserts documents under freshly generated vector ids and returns those ids.
    ///
    /// No duplicate detection: the same resume uploaded twice is stored twice.
    /// A failure part-way leaves earlier writes in place.
    pub async fn insert_documents(
        &self,
        documents: Vec<ResumeDocument>,
    ) -> Result<Vec<String>, VectorStoreError> {
        if documents.is_empty() {
            return Ok(Vec::new());
        }

        let texts: Vec<String> = documents.iter().map(|d| d.text.clone()).collect();
        let vectors = self.embedder.embed(&texts).await?;
        if vectors.len() != documents.len() {
            return Err(EmbeddingError::CountMismatch {
                expected: documents.len(),
                got: vectors.len(),
            }
            .into());
        }

        let records: Vec<IndexRecord> = documents
            .into_iter()
            .zip(vectors)
            .map(|(document, values)| IndexRecord {
                id: Uuid::new_v4().to_string(),
                values,
                document,
            })
            .collect();
        let ids: Vec<String> = records.iter().map(|r| r.id.clone()).collect();

        self.index.upsert(records).await?;
        info!(count = ids.len(), "inserted resume documents");
        Ok(ids)
    }

    /// Returns up to `k` resumes nearest to `query`, best first.
    pub async fn search_similar(
        &self,
        query: &str,
        k: usize,
    ) -> Result<Vec<MatchResult>, VectorStoreError> {
        if k == 0 {
            return Ok(Vec::new());
        }

        let mut vectors = self.embedder.embed(&[query.to_string()]).await?;
        let vector = vectors.pop().ok_or(EmbeddingError::CountMismatch {
            expected: 1,
            got: 0,
        })?;

        let hits = self.index.query(vector, k).await?;
        debug!(k, hits = hits.len(), "similarity search finished");

        Ok(hits
            .into_iter()
            .map(|hit| MatchResult {
                resume_id: hit.document.metadata.resume_id,
                confidence_score: confidence_from_distance(hit.distance),
                resume_text: hit.document.text,
                metadata: hit.document.metadata,
            })
            .collect())
    }
}
