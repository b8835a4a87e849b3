use std::sync::Arc;

use crate::config::Config;
use crate::ingest::loader::ResumeLoader;
use crate::llm_client::LanguageModel;
use crate::vector::VectorStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub llm: Arc<dyn LanguageModel>,
    pub loader: Arc<ResumeLoader>,
    pub store: Arc<VectorStore>,
    /// Used for job-description URL fetches.
    pub http: reqwest::Client,
    pub config: Config,
}

impl AppState {
    pub fn new(
        config: Config,
        llm: Arc<dyn LanguageModel>,
        store: VectorStore,
        http: reqwest::Client,
    ) -> Self {
        let loader = ResumeLoader::new(llm.clone(), config.max_resume_chars);
        Self {
            llm,
            loader: Arc::new(loader),
            store: Arc::new(store),
            http,
            config,
        }
    }
}
