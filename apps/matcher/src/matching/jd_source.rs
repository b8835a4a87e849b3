//! Job-description input resolution.
//!
//! Exactly one source is used, in precedence order: pasted text, uploaded
//! file, URL. Later sources are not touched once an earlier one is present.

use std::path::Path;

use reqwest::{header::CONTENT_TYPE, Client, Url};
use thiserror::Error;
use tracing::info;

use crate::ingest::extract::{
    extract_text_blocking, DocumentFormat, ExtractionError, JOB_DESCRIPTION_FORMATS,
    JOB_DESCRIPTION_FORMATS_LABEL,
};
use crate::ingest::upload::UploadedFile;
use crate::storage::save_upload;

/// Wrap width for HTML-to-text conversion; wide enough to avoid reflowing prose.
const HTML_TEXT_WIDTH: usize = 200;

#[derive(Debug, Error)]
pub enum JobDescriptionError {
    #[error("Please provide a job description")]
    Missing,

    #[error("Failed to extract content from the uploaded file")]
    EmptyFile,

    #[error("Failed to fetch or extract content from the provided URL")]
    EmptyUrl,

    #[error("Invalid job description URL '{0}'")]
    InvalidUrl(String),

    #[error("Fetching {url} returned status {status}")]
    FetchStatus { url: String, status: u16 },

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),
}

/// The three ways a job description can arrive. Any subset may be set.
#[derive(Debug, Clone, Default)]
pub struct JobDescriptionInput {
    pub text: Option<String>,
    pub file: Option<UploadedFile>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobDescriptionSource {
    Text,
    File,
    Url,
}

impl JobDescriptionInput {
    /// Picks the source that will be used, without doing any I/O.
    pub fn source(&self) -> Option<JobDescriptionSource> {
        if self.text.as_deref().is_some_and(|t| !t.trim().is_empty()) {
            Some(JobDescriptionSource::Text)
        } else if self.file.as_ref().is_some_and(|f| !f.bytes.is_empty()) {
            Some(JobDescriptionSource::File)
        } else if self.url.as_deref().is_some_and(|u| !u.trim().is_empty()) {
            Some(JobDescriptionSource::Url)
        } else {
            None
        }
    }

    /// Produces the job-description text from the winning source.
    pub async fn resolve(self, jd_dir: &Path, http: &Client) -> Result<String, JobDescriptionError> {
        match self.source() {
            Some(JobDescriptionSource::Text) => Ok(self.text.unwrap_or_default()),
            Some(JobDescriptionSource::File) => match self.file {
                Some(file) => load_from_file(&file, jd_dir).await,
                None => Err(JobDescriptionError::Missing),
            },
            Some(JobDescriptionSource::Url) => {
                load_from_url(self.url.as_deref().unwrap_or_default().trim(), http).await
            }
            None => Err(JobDescriptionError::Missing),
        }
    }
}

async fn load_from_file(file: &UploadedFile, jd_dir: &Path) -> Result<String, JobDescriptionError> {
    let format = DocumentFormat::detect(
        &file.filename,
        JOB_DESCRIPTION_FORMATS,
        JOB_DESCRIPTION_FORMATS_LABEL,
    )?;
    save_upload(jd_dir, &file.filename, &file.bytes).await?;

    let text = extract_text_blocking(format, file.bytes.to_vec()).await?;
    if text.trim().is_empty() {
        return Err(JobDescriptionError::EmptyFile);
    }
    info!(filename = %file.filename, chars = text.len(), "job description loaded from file");
    Ok(text)
}

async fn load_from_url(raw_url: &str, http: &Client) -> Result<String, JobDescriptionError> {
    let url = Url::parse(raw_url).map_err(|_| JobDescriptionError::InvalidUrl(raw_url.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(JobDescriptionError::InvalidUrl(raw_url.to_string()));
    }

    let response = http.get(url.clone()).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(JobDescriptionError::FetchStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let is_html = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map_or(true, |ct| ct.contains("html"));
    let body = response.bytes().await?;

    let text = if is_html {
        html2text::from_read(body.as_ref(), HTML_TEXT_WIDTH)
    } else {
        String::from_utf8_lossy(&body).into_owned()
    };

    if text.trim().is_empty() {
        return Err(JobDescriptionError::EmptyUrl);
    }
    info!(url = %url, chars = text.len(), "job description fetched from URL");
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn file(name: &str, bytes: &'static [u8]) -> UploadedFile {
        UploadedFile {
            filename: name.to_string(),
            bytes: Bytes::from_static(bytes),
        }
    }

    #[test]
    fn test_text_wins_over_file_and_url() {
        let input = JobDescriptionInput {
            text: Some("Rust engineer".to_string()),
            file: Some(file("jd.txt", b"Go engineer")),
            url: Some("https://example.com/jd".to_string()),
        };
        assert_eq!(input.source(), Some(JobDescriptionSource::Text));
    }

    #[test]
    fn test_blank_text_falls_through_to_file() {
        let input = JobDescriptionInput {
            text: Some("   \n".to_string()),
            file: Some(file("jd.txt", b"Go engineer")),
            url: Some("https://example.com/jd".to_string()),
        };
        assert_eq!(input.source(), Some(JobDescriptionSource::File));
    }

    #[test]
    fn test_empty_file_falls_through_to_url() {
        let input = JobDescriptionInput {
            text: None,
            file: Some(file("jd.txt", b"")),
            url: Some("https://example.com/jd".to_string()),
        };
        assert_eq!(input.source(), Some(JobDescriptionSource::Url));
    }

    #[test]
    fn test_nothing_usable_has_no_source() {
        let input = JobDescriptionInput {
            text: Some(" ".to_string()),
            file: None,
            url: Some("".to_string()),
        };
        assert_eq!(input.source(), None);
    }

    #[tokio::test]
    async fn test_pasted_text_is_used_exclusively() {
        let tmp = tempfile::tempdir().unwrap();
        // The file would fail extraction if it were touched.
        let input = JobDescriptionInput {
            text: Some("Rust engineer".to_string()),
            file: Some(file("jd.docx", b"not a zip")),
            url: None,
        };
        let jd = input.resolve(tmp.path(), &Client::new()).await.unwrap();
        assert_eq!(jd, "Rust engineer");
        assert!(!tmp.path().join("jd.docx").exists());
    }

    #[tokio::test]
    async fn test_missing_input_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = JobDescriptionInput::default()
            .resolve(tmp.path(), &Client::new())
            .await
            .unwrap_err();
        assert!(matches!(err, JobDescriptionError::Missing));
    }

    #[tokio::test]
    async fn test_file_is_saved_and_extracted() {
        let tmp = tempfile::tempdir().unwrap();
        let input = JobDescriptionInput {
            file: Some(file("jd.txt", b"Senior Go engineer")),
            ..Default::default()
        };
        let jd = input.resolve(tmp.path(), &Client::new()).await.unwrap();
        assert_eq!(jd, "Senior Go engineer");
        assert!(tmp.path().join("jd.txt").exists());
    }

    #[tokio::test]
    async fn test_whitespace_only_file_is_empty_content() {
        let tmp = tempfile::tempdir().unwrap();
        let input = JobDescriptionInput {
            file: Some(file("jd.txt", b"   \n\t")),
            ..Default::default()
        };
        let err = input.resolve(tmp.path(), &Client::new()).await.unwrap_err();
        assert!(matches!(err, JobDescriptionError::EmptyFile));
    }

    #[tokio::test]
    async fn test_unsupported_file_format_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let input = JobDescriptionInput {
            file: Some(file("jd.exe", b"MZ")),
            ..Default::default()
        };
        let err = input.resolve(tmp.path(), &Client::new()).await.unwrap_err();
        assert!(matches!(
            err,
            JobDescriptionError::Extraction(ExtractionError::UnsupportedFormat { .. })
        ));
    }

    #[tokio::test]
    async fn test_url_html_is_converted_to_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/jobs/42"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                "<html><body><h1>Rust Engineer</h1><p>Tokio and Axum experience</p></body></html>",
                "text/html; charset=utf-8",
            ))
            .mount(&server)
            .await;

        let tmp = tempfile::tempdir().unwrap();
        let input = JobDescriptionInput {
            url: Some(format!("{}/jobs/42", server.uri())),
            ..Default::default()
        };
        let jd = input.resolve(tmp.path(), &Client::new()).await.unwrap();
        assert!(jd.contains("Rust Engineer"));
        assert!(jd.contains("Tokio and Axum experience"));
        assert!(!jd.contains("<p>"));
    }

    #[tokio::test]
    async fn test_url_with_empty_page_is_empty_content() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/blank"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw("<html><body></body></html>", "text/html"),
            )
            .mount(&server)
            .await;

        let tmp = tempfile::tempdir().unwrap();
        let input = JobDescriptionInput {
            url: Some(format!("{}/blank", server.uri())),
            ..Default::default()
        };
        let err = input.resolve(tmp.path(), &Client::new()).await.unwrap_err();
        assert!(matches!(err, JobDescriptionError::EmptyUrl));
    }

    #[tokio::test]
    async fn test_url_error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let tmp = tempfile::tempdir().unwrap();
        let input = JobDescriptionInput {
            url: Some(format!("{}/gone", server.uri())),
            ..Default::default()
        };
        let err = input.resolve(tmp.path(), &Client::new()).await.unwrap_err();
        assert!(matches!(err, JobDescriptionError::FetchStatus { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_non_http_url_is_invalid() {
        let tmp = tempfile::tempdir().unwrap();
        let input = JobDescriptionInput {
            url: Some("file:///etc/passwd".to_string()),
            ..Default::default()
        };
        let err = input.resolve(tmp.path(), &Client::new()).await.unwrap_err();
        assert!(matches!(err, JobDescriptionError::InvalidUrl(_)));
    }
}
