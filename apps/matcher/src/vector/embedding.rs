use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when producing embeddings.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("embedding HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("expected {expected}-dimensional embeddings, got {got}")]
    InvalidDimension { expected: usize, got: usize },

    #[error("expected {expected} embeddings, got {got}")]
    CountMismatch { expected: usize, got: usize },
}

/// Provider interface for generating fixed-dimension embeddings.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate one embedding per input text, in input order.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    fn dimension(&self) -> usize;
}

/// Client for a feature-extraction endpoint serving a sentence-transformers
/// model (Hugging Face Inference API or a compatible embeddings server).
///
/// Request: `{"inputs": [...]}`; response: one pooled vector per input.
pub struct HttpEmbedder {
    http: Client,
    url: String,
    api_key: Option<String>,
    dimension: usize,
}

#[derive(Serialize)]
struct FeatureExtractionRequest<'a> {
    inputs: &'a [String],
    options: RequestOptions,
}

#[derive(Serialize)]
struct RequestOptions {
    wait_for_model: bool,
}

impl HttpEmbedder {
    pub fn new(http: Client, url: String, api_key: Option<String>, dimension: usize) -> Self {
        Self {
            http,
            url,
            api_key,
            dimension,
        }
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let payload = FeatureExtractionRequest {
            inputs: texts,
            options: RequestOptions {
                wait_for_model: true,
            },
        };

        let mut request = self.http.post(&self.url).json(&payload);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        let resp = request.send().await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(EmbeddingError::Api { status, message });
        }

        let vectors: Vec<Vec<f32>> = resp.json().await?;

        if vectors.len() != texts.len() {
            return Err(EmbeddingError::CountMismatch {
                expected: texts.len(),
                got: vectors.len(),
            });
        }
        if let Some(bad) = vectors.iter().find(|v| v.len() != self.dimension) {
            return Err(EmbeddingError::InvalidDimension {
                expected: self.dimension,
                got: bad.len(),
            });
        }

        debug!(count = vectors.len(), "embedded texts");
        Ok(vectors)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Compute the cosine similarity between two equal-length vectors.
/// Returns 0.0 when either vector has zero norm or the dimensions differ.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let mut dot = 0.0f64;
    let mut na = 0.0f64;
    let mut nb = 0.0f64;
    for (x, y) in a.iter().zip(b) {
        let x = f64::from(*x);
        let y = f64::from(*y);
        dot += x * y;
        na += x * x;
        nb += y * y;
    }
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    dot / (na.sqrt() * nb.sqrt())
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{bearer_token, body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn embedder_for(server: &MockServer, dimension: usize) -> HttpEmbedder {
        HttpEmbedder::new(
            Client::new(),
            format!("{}/embed", server.uri()),
            Some("hf-test".to_string()),
            dimension,
        )
    }

    #[test]
    fn test_cosine_orders_similarities() {
        let q = [1.0, 0.0, 0.0];
        let a = [1.0, 0.0, 0.0];
        let b = [0.5, 0.5, 0.0];
        let c = [0.0, 1.0, 0.0];
        let s_a = cosine_similarity(&q, &a);
        let s_b = cosine_similarity(&q, &b);
        let s_c = cosine_similarity(&q, &c);
        assert!(s_a > s_b && s_b > s_c);
    }

    #[test]
    fn test_cosine_zero_vector_is_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
    }

    #[tokio::test]
    async fn test_embed_posts_inputs_and_returns_vectors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embed"))
            .and(bearer_token("hf-test"))
            .and(body_partial_json(json!({ "inputs": ["rust", "python"] })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                [0.1, 0.2, 0.3],
                [0.3, 0.2, 0.1]
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let vectors = embedder_for(&server, 3)
            .embed(&["rust".to_string(), "python".to_string()])
            .await
            .unwrap();
        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors[1], vec![0.3, 0.2, 0.1]);
    }

    #[tokio::test]
    async fn test_wrong_dimension_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embed"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([[0.1, 0.2]])))
            .mount(&server)
            .await;

        let err = embedder_for(&server, 384)
            .embed(&["rust".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EmbeddingError::InvalidDimension {
                expected: 384,
                got: 2
            }
        ));
    }

    #[tokio::test]
    async fn test_api_error_carries_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embed"))
            .respond_with(ResponseTemplate::new(503).set_body_string("model loading"))
            .mount(&server)
            .await;

        let err = embedder_for(&server, 3)
            .embed(&["rust".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, EmbeddingError::Api { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_empty_input_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let vectors = embedder_for(&server, 3).embed(&[]).await.unwrap();
        assert!(vectors.is_empty());
    }
}
