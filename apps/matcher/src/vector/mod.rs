//! Vector Store Adapter: embeds distilled resumes, upserts them into an index,
//! and turns similarity hits into 0–100 confidence scores.
//!
//! The index itself is a seam (`VectorIndex`): Pinecone in production, an
//! in-process cosine index for local runs and tests. Every backend reports a
//! *distance* per hit so the confidence formula is backend-independent.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::resume::ResumeDocument;

pub mod embedding;
pub mod memory;
pub mod pinecone;
pub mod store;

pub use embedding::{Embedder, EmbeddingError};
pub use store::VectorStore;

#[derive(Debug, Error)]
pub enum VectorStoreError {
    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Index '{0}' did not become ready in time")]
    IndexNotReady(String),

    #[error("Index '{name}' is incompatible: {reason}")]
    IndexMismatch { name: String, reason: String },

    #[error("Metadata error: {0}")]
    Metadata(String),

    #[error("Unknown distance metric '{0}' (expected cosine, euclidean or dotproduct)")]
    UnknownMetric(String),
}

/// Similarity metric of the vector index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceMetric {
    Cosine,
    Euclidean,
    DotProduct,
}

impl DistanceMetric {
    pub fn as_str(self) -> &'static str {
        match self {
            DistanceMetric::Cosine => "cosine",
            DistanceMetric::Euclidean => "euclidean",
            DistanceMetric::DotProduct => "dotproduct",
        }
    }

    /// Only cosine distance lands in a range where `(1 - d) * 100` reads as a percentage.
    pub fn supports_confidence(self) -> bool {
        matches!(self, DistanceMetric::Cosine)
    }

    /// Converts a raw index score into a distance (lower = more similar).
    ///
    /// Cosine and dot-product indexes report similarity; euclidean indexes
    /// already report a distance.
    pub fn distance_from_score(self, score: f64) -> f64 {
        match self {
            DistanceMetric::Cosine | DistanceMetric::DotProduct => 1.0 - score,
            DistanceMetric::Euclidean => score,
        }
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DistanceMetric {
    type Err = VectorStoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cosine" => Ok(DistanceMetric::Cosine),
            "euclidean" => Ok(DistanceMetric::Euclidean),
            "dotproduct" => Ok(DistanceMetric::DotProduct),
            other => Err(VectorStoreError::UnknownMetric(other.to_string())),
        }
    }
}

/// Converts a cosine distance into a confidence percentage rounded to 2 decimals.
///
/// Valid for cosine distance in [0, 1]; anti-correlated vectors (d > 1) yield
/// negative values, which are passed through unchanged.
pub fn confidence_from_distance(distance: f64) -> f64 {
    let confidence = (1.0 - distance) * 100.0;
    // Format on the exact binary value; scaling by 100 first would round twice.
    format!("{confidence:.2}").parse().unwrap_or(confidence)
}

/// A record written to the index. `id` is the vector id, distinct from the
/// document's `resume_id`.
#[derive(Debug, Clone)]
pub struct IndexRecord {
    pub id: String,
    pub values: Vec<f32>,
    pub document: ResumeDocument,
}

#[derive(Debug, Clone)]
pub struct IndexHit {
    pub document: ResumeDocument,
    /// Lower = more similar.
    pub distance: f64,
}

/// Storage backend for resume vectors.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    async fn upsert(&self, records: Vec<IndexRecord>) -> Result<(), VectorStoreError>;

    /// Returns at most `top_k` hits, nearest first. Fewer stored records than
    /// `top_k` is not an error.
    async fn query(&self, vector: Vec<f32>, top_k: usize) -> Result<Vec<IndexHit>, VectorStoreError>;
}
