use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::matching::handlers::MAX_K;
use crate::vector::DistanceMetric;

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";
const DEFAULT_PINECONE_CONTROL_URL: &str = "https://api.pinecone.io";
const DEFAULT_INDEX_NAME: &str = "candidate-index";
const DEFAULT_EMBEDDING_URL: &str = "https://api-inference.huggingface.co/pipeline/feature-extraction/sentence-transformers/all-MiniLM-L6-v2";

/// Which vector index backend the service talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorBackend {
    Pinecone,
    /// In-process index. Nothing survives a restart.
    Memory,
}

impl FromStr for VectorBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pinecone" => Ok(VectorBackend::Pinecone),
            "memory" => Ok(VectorBackend::Memory),
            other => bail!("VECTOR_BACKEND must be 'pinecone' or 'memory', got '{other}'"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PineconeConfig {
    pub api_key: String,
    pub index_name: String,
    pub control_url: String,
    pub cloud: String,
    pub region: String,
    pub namespace: String,
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or invalid.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub llm_model: String,
    pub llm_timeout_secs: u64,
    /// Total attempts per model call. 1 disables retries.
    pub llm_max_attempts: u32,
    pub vector_backend: VectorBackend,
    /// Present only when `vector_backend` is `Pinecone`.
    pub pinecone: Option<PineconeConfig>,
    pub vector_metric: DistanceMetric,
    pub embedding_url: String,
    pub embedding_api_key: Option<String>,
    pub embedding_dimension: usize,
    pub search_top_k: usize,
    pub max_resume_chars: usize,
    pub resume_dir: PathBuf,
    pub jd_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let vector_backend: VectorBackend = env.or("VECTOR_BACKEND", "pinecone").parse()?;
        let pinecone = match vector_backend {
            VectorBackend::Pinecone => Some(PineconeConfig {
                api_key: env.require("PINECONE_API_KEY")?,
                index_name: env.or("PINECONE_INDEX_NAME", DEFAULT_INDEX_NAME),
                control_url: env.or("PINECONE_CONTROL_URL", DEFAULT_PINECONE_CONTROL_URL),
                cloud: env.or("PINECONE_CLOUD", "aws"),
                region: env.or("PINECONE_REGION", "us-east-1"),
                namespace: env.or("PINECONE_NAMESPACE", ""),
            }),
            VectorBackend::Memory => None,
        };

        let config = Config {
            openai_api_key: env.require("OPENAI_API_KEY")?,
            openai_base_url: env.or("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL),
            llm_model: env.or("LLM_MODEL", DEFAULT_LLM_MODEL),
            llm_timeout_secs: env.parse("LLM_TIMEOUT_SECS", 120)?,
            llm_max_attempts: env.parse("LLM_MAX_ATTEMPTS", 1)?,
            vector_backend,
            pinecone,
            vector_metric: env.or("VECTOR_METRIC", "cosine").parse()?,
            embedding_url: env.or("EMBEDDING_URL", DEFAULT_EMBEDDING_URL),
            embedding_api_key: env.get("EMBEDDING_API_KEY").filter(|k| !k.is_empty()),
            embedding_dimension: env.parse("EMBEDDING_DIMENSION", 384)?,
            search_top_k: env.parse("SEARCH_TOP_K", 2)?,
            max_resume_chars: env.parse("MAX_RESUME_CHARS", 60_000)?,
            resume_dir: PathBuf::from(env.or("RESUME_DIR", "data/resumes")),
            jd_dir: PathBuf::from(env.or("JD_DIR", "data/jobdesc")),
            max_upload_bytes: env.parse("MAX_UPLOAD_BYTES", 20 * 1024 * 1024)?,
            port: env.parse("PORT", 8080)?,
            rust_log: env.or("RUST_LOG", "info"),
        };

        config.validate()?;
        Ok(config)
    }

    /// Rejects settings the matching pipeline cannot honor.
    pub fn validate(&self) -> Result<()> {
        // confidence = (1 - d) * 100 only maps onto 0..100 for cosine distance
        if !self.vector_metric.supports_confidence() {
            bail!(
                "VECTOR_METRIC '{}' is not supported: confidence scoring requires 'cosine'",
                self.vector_metric
            );
        }
        if self.llm_max_attempts == 0 {
            bail!("LLM_MAX_ATTEMPTS must be at least 1");
        }
        if self.search_top_k == 0 {
            bail!("SEARCH_TOP_K must be at least 1");
        }
        if self.search_top_k > MAX_K {
            bail!("SEARCH_TOP_K must be at most {MAX_K}");
        }
        if self.embedding_dimension == 0 {
            bail!("EMBEDDING_DIMENSION must be at least 1");
        }
        if self.max_resume_chars == 0 {
            bail!("MAX_RESUME_CHARS must be at least 1");
        }
        Ok(())
    }
}

struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key)
    }

    fn require(&self, key: &str) -> Result<String> {
        self.get(key)
            .filter(|v| !v.trim().is_empty())
            .with_context(|| format!("Required environment variable '{key}' is not set"))
    }

    fn or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    fn parse<T>(&self, key: &str, default: T) -> Result<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get(key) {
            Some(raw) => raw
                .trim()
                .parse::<T>()
                .map_err(|e| anyhow::anyhow!("{key} has an invalid value '{raw}': {e}")),
            None => Ok(default),
        }
    }
}
