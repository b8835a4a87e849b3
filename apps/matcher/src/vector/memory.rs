use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::vector::embedding::cosine_similarity;
use crate::vector::{IndexHit, IndexRecord, VectorIndex, VectorStoreError};

/// In-process cosine index. Upserting an existing id replaces the record.
#[derive(Default)]
pub struct InMemoryIndex {
    records: RwLock<Vec<IndexRecord>>,
}

impl InMemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl VectorIndex for InMemoryIndex {
    async fn upsert(&self, records: Vec<IndexRecord>) -> Result<(), VectorStoreError> {
        let mut stored = self.records.write().await;
        for record in records {
            match stored.iter_mut().find(|r| r.id == record.id) {
                Some(existing) => *existing = record,
                None => stored.push(record),
            }
        }
        Ok(())
    }

    async fn query(&self, vector: Vec<f32>, top_k: usize) -> Result<Vec<IndexHit>, VectorStoreError> {
        if top_k == 0 {
            return Ok(Vec::new());
        }
        let stored = self.records.read().await;
        let mut hits: Vec<IndexHit> = stored
            .iter()
            .map(|r| IndexHit {
                document: r.document.clone(),
                distance: 1.0 - cosine_similarity(&r.values, &vector),
            })
            .collect();
        hits.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hits.truncate(top_k);
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::ResumeDocument;

    fn record(id: &str, text: &str, values: Vec<f32>) -> IndexRecord {
        IndexRecord {
            id: id.to_string(),
            values,
            document: ResumeDocument::new(text.to_string(), format!("{id}.pdf"), None),
        }
    }

    #[tokio::test]
    async fn test_query_returns_nearest_first() {
        let index = InMemoryIndex::new();
        index
            .upsert(vec![
                record("far", "far", vec![0.0, 1.0]),
                record("near", "near", vec![1.0, 0.1]),
                record("exact", "exact", vec![1.0, 0.0]),
            ])
            .await
            .unwrap();

        let hits = index.query(vec![1.0, 0.0], 2).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].document.text, "exact");
        assert_eq!(hits[1].document.text, "near");
        assert!(hits[0].distance.abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_fewer_records_than_k_returns_all() {
        let index = InMemoryIndex::new();
        index
            .upsert(vec![record("only", "only", vec![1.0, 0.0])])
            .await
            .unwrap();

        let hits = index.query(vec![1.0, 0.0], 2).await.unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_index_returns_no_hits() {
        let index = InMemoryIndex::new();
        assert!(index.query(vec![1.0, 0.0], 2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upsert_same_id_replaces() {
        let index = InMemoryIndex::new();
        index
            .upsert(vec![record("a", "old", vec![1.0, 0.0])])
            .await
            .unwrap();
        index
            .upsert(vec![record("a", "new", vec![1.0, 0.0])])
            .await
            .unwrap();

        assert_eq!(index.len().await, 1);
        let hits = index.query(vec![1.0, 0.0], 5).await.unwrap();
        assert_eq!(hits[0].document.text, "new");
    }
}
