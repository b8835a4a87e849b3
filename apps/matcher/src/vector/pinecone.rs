//! Pinecone REST backend.
//!
//! Control plane (`api.pinecone.io`) describes or creates the index; the data
//! plane (the index host) serves upsert and query. Pinecone reports cosine
//! *similarity*, converted here to a distance via the configured metric.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{info, warn};

use crate::config::PineconeConfig;
use crate::models::resume::{ResumeDocument, ResumeMetadata};
use crate::vector::{DistanceMetric, IndexHit, IndexRecord, VectorIndex, VectorStoreError};

const API_VERSION: &str = "2024-07";
const UPSERT_BATCH_SIZE: usize = 100;
const READY_POLL_ATTEMPTS: u32 = 30;
const READY_POLL_INTERVAL: Duration = Duration::from_secs(2);

#[derive(Debug, Deserialize)]
struct IndexDescription {
    dimension: usize,
    metric: String,
    host: String,
    status: IndexStatus,
}

#[derive(Debug, Deserialize)]
struct IndexStatus {
    ready: bool,
}

#[derive(Debug, Serialize)]
struct UpsertVector<'a> {
    id: &'a str,
    values: &'a [f32],
    metadata: Map<String, Value>,
}

#[derive(Debug, Serialize)]
struct UpsertRequest<'a> {
    vectors: Vec<UpsertVector<'a>>,
    namespace: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: Vec<f32>,
    top_k: usize,
    include_metadata: bool,
    include_values: bool,
    namespace: &'a str,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Debug, Deserialize)]
struct QueryMatch {
    id: String,
    score: f64,
    #[serde(default)]
    metadata: Option<Map<String, Value>>,
}

/// Flattened form stored as Pinecone metadata: document metadata plus the text.
#[derive(Debug, Serialize, Deserialize)]
struct StoredMetadata {
    text: String,
    #[serde(flatten)]
    metadata: ResumeMetadata,
}

pub struct PineconeIndex {
    http: Client,
    api_key: String,
    data_url: String,
    namespace: String,
    metric: DistanceMetric,
}

impl PineconeIndex {
    /// Opens the configured index, creating it first when it does not exist,
    /// and waits until Pinecone reports it ready.
    pub async fn connect(
        http: Client,
        config: &PineconeConfig,
        dimension: usize,
        metric: DistanceMetric,
    ) -> Result<Self, VectorStoreError> {
        let control = ControlPlane {
            http: &http,
            api_key: &config.api_key,
            base_url: config.control_url.trim_end_matches('/'),
        };

        let mut description = match control.describe(&config.index_name).await? {
            Some(existing) => {
                check_compatible(&config.index_name, &existing, dimension, metric)?;
                existing
            }
            None => {
                info!(
                    index = %config.index_name,
                    dimension,
                    metric = %metric,
                    "creating Pinecone index"
                );
                control.create(config, dimension, metric).await?;
                control
                    .describe(&config.index_name)
                    .await?
                    .ok_or_else(|| VectorStoreError::IndexNotReady(config.index_name.clone()))?
            }
        };

        let mut attempts = 0;
        while !description.status.ready {
            attempts += 1;
            if attempts > READY_POLL_ATTEMPTS {
                return Err(VectorStoreError::IndexNotReady(config.index_name.clone()));
            }
            tokio::time::sleep(READY_POLL_INTERVAL).await;
            description = control
                .describe(&config.index_name)
                .await?
                .ok_or_else(|| VectorStoreError::IndexNotReady(config.index_name.clone()))?;
        }

        info!(index = %config.index_name, host = %description.host, "Pinecone index ready");

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            data_url: data_url(&description.host),
            namespace: config.namespace.clone(),
            metric,
        })
    }

    fn post(&self, path: &str) -> RequestBuilder {
        with_headers(self.http.post(format!("{}{path}", self.data_url)), &self.api_key)
    }
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    async fn upsert(&self, records: Vec<IndexRecord>) -> Result<(), VectorStoreError> {
        for batch in records.chunks(UPSERT_BATCH_SIZE) {
            let vectors = batch
                .iter()
                .map(|r| {
                    Ok(UpsertVector {
                        id: &r.id,
                        values: &r.values,
                        metadata: encode_metadata(&r.document)?,
                    })
                })
                .collect::<Result<Vec<_>, VectorStoreError>>()?;

            let body = UpsertRequest {
                vectors,
                namespace: &self.namespace,
            };
            let response = self.post("/vectors/upsert").json(&body).send().await?;
            ensure_success(response).await?;
        }
        Ok(())
    }

    async fn query(&self, vector: Vec<f32>, top_k: usize) -> Result<Vec<IndexHit>, VectorStoreError> {
        let body = QueryRequest {
            vector,
            top_k,
            include_metadata: true,
            include_values: false,
            namespace: &self.namespace,
        };
        let response = self.post("/query").json(&body).send().await?;
        let parsed: QueryResponse = ensure_success(response).await?.json().await?;

        let mut hits = Vec::with_capacity(parsed.matches.len());
        for m in parsed.matches {
            match m.metadata.map(decode_metadata) {
                Some(Ok(document)) => hits.push(IndexHit {
                    document,
                    distance: self.metric.distance_from_score(m.score),
                }),
                Some(Err(e)) => warn!(id = %m.id, "skipping match with unreadable metadata: {e}"),
                None => warn!(id = %m.id, "skipping match without metadata"),
            }
        }
        Ok(hits)
    }
}

struct ControlPlane<'a> {
    http: &'a Client,
    api_key: &'a str,
    base_url: &'a str,
}

impl ControlPlane<'_> {
    async fn describe(&self, name: &str) -> Result<Option<IndexDescription>, VectorStoreError> {
        let response = with_headers(
            self.http.get(format!("{}/indexes/{name}", self.base_url)),
            self.api_key,
        )
        .send()
        .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Ok(Some(ensure_success(response).await?.json().await?))
    }

    async fn create(
        &self,
        config: &PineconeConfig,
        dimension: usize,
        metric: DistanceMetric,
    ) -> Result<(), VectorStoreError> {
        let body = json!({
            "name": config.index_name,
            "dimension": dimension,
            "metric": metric.as_str(),
            "spec": {
                "serverless": { "cloud": config.cloud, "region": config.region }
            }
        });
        let response = with_headers(
            self.http.post(format!("{}/indexes", self.base_url)),
            self.api_key,
        )
        .json(&body)
        .send()
        .await?;

        // Another process may have created it between describe and create.
        if response.status() == StatusCode::CONFLICT {
            return Ok(());
        }
        ensure_success(response).await?;
        Ok(())
    }
}

fn with_headers(request: RequestBuilder, api_key: &str) -> RequestBuilder {
    request
        .header("Api-Key", api_key)
        .header("X-Pinecone-API-Version", API_VERSION)
}

async fn ensure_success(response: Response) -> Result<Response, VectorStoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(VectorStoreError::Api {
        status: status.as_u16(),
        message,
    })
}

/// Pinecone hands out bare hostnames; tests pass full URLs.
fn data_url(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{host}")
    }
}

fn check_compatible(
    name: &str,
    existing: &IndexDescription,
    dimension: usize,
    metric: DistanceMetric,
) -> Result<(), VectorStoreError> {
    if existing.dimension != dimension {
        return Err(VectorStoreError::IndexMismatch {
            name: name.to_string(),
            reason: format!("dimension {} != {dimension}", existing.dimension),
        });
    }
    if !existing.metric.eq_ignore_ascii_case(metric.as_str()) {
        return Err(VectorStoreError::IndexMismatch {
            name: name.to_string(),
            reason: format!("metric '{}' != '{metric}'", existing.metric),
        });
    }
    Ok(())
}

fn encode_metadata(document: &ResumeDocument) -> Result<Map<String, Value>, VectorStoreError> {
    let stored = StoredMetadata {
        text: document.text.clone(),
        metadata: document.metadata.clone(),
    };
    match serde_json::to_value(stored).map_err(|e| VectorStoreError::Metadata(e.to_string()))? {
        Value::Object(map) => Ok(map),
        _ => Err(VectorStoreError::Metadata(
            "metadata must encode to a JSON object".to_string(),
        )),
    }
}

fn decode_metadata(map: Map<String, Value>) -> Result<ResumeDocument, serde_json::Error> {
    let stored: StoredMetadata = serde_json::from_value(Value::Object(map))?;
    Ok(ResumeDocument {
        text: stored.text,
        metadata: stored.metadata,
    })
}
