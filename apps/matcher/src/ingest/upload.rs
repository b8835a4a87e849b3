//! Upload mode: processes a batch of resume files one at a time.
//!
//! Each file is saved, distilled and inserted on its own; a failure is
//! recorded against that file and the batch moves on.

use std::path::Path;

use bytes::Bytes;
use serde::Serialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::ingest::loader::ResumeLoader;
use crate::ingest::IngestError;
use crate::storage::save_upload;
use crate::vector::VectorStore;

/// A file received from the client.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Bytes,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UploadStatus {
    Uploaded { resume_id: Uuid },
    Failed { error: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadOutcome {
    pub filename: String,
    #[serde(flatten)]
    pub status: UploadStatus,
}

impl UploadOutcome {
    pub fn is_uploaded(&self) -> bool {
        matches!(self.status, UploadStatus::Uploaded { .. })
    }
}

/// Runs every file through save → load → insert, in upload order.
pub async fn upload_resumes(
    files: Vec<UploadedFile>,
    user_id: Option<String>,
    loader: &ResumeLoader,
    store: &VectorStore,
    resume_dir: &Path,
) -> Vec<UploadOutcome> {
    info!(count = files.len(), "processing resumes");

    let mut outcomes = Vec::with_capacity(files.len());
    for file in files {
        let status = match upload_one(&file, user_id.clone(), loader, store, resume_dir).await {
            Ok(resume_id) => {
                info!(filename = %file.filename, %resume_id, "uploaded");
                UploadStatus::Uploaded { resume_id }
            }
            Err(e) => {
                error!(filename = %file.filename, "error processing resume: {e}");
                UploadStatus::Failed {
                    error: e.to_string(),
                }
            }
        };
        outcomes.push(UploadOutcome {
            filename: file.filename,
            status,
        });
    }
    outcomes
}

async fn upload_one(
    file: &UploadedFile,
    user_id: Option<String>,
    loader: &ResumeLoader,
    store: &VectorStore,
    resume_dir: &Path,
) -> Result<Uuid, IngestError> {
    let path = save_upload(resume_dir, &file.filename, &file.bytes).await?;
    let document = loader.load(&path, user_id).await?;
    let resume_id = document.metadata.resume_id;
    store.insert_documents(vec![document]).await?;
    Ok(resume_id)
}
