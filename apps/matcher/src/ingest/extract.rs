//! Text extraction for uploaded documents.
//!
//! PDF goes through `pdf-extract`; DOCX is a zip archive whose
//! `word/document.xml` part holds the body text.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file format for '{filename}': only {allowed} files are allowed")]
    UnsupportedFormat {
        filename: String,
        allowed: &'static str,
    },

    #[error("Failed to extract content from the uploaded file")]
    EmptyContent,

    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("DOCX archive error: {0}")]
    Docx(#[from] zip::result::ZipError),

    #[error("DOCX XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    PlainText,
}

/// Formats accepted for resumes.
pub const RESUME_FORMATS: &[DocumentFormat] = &[DocumentFormat::Pdf, DocumentFormat::Docx];
pub const RESUME_FORMATS_LABEL: &str = ".pdf and .docx";

/// Formats accepted for job-description files.
pub const JOB_DESCRIPTION_FORMATS: &[DocumentFormat] = &[
    DocumentFormat::Pdf,
    DocumentFormat::Docx,
    DocumentFormat::PlainText,
];
pub const JOB_DESCRIPTION_FORMATS_LABEL: &str = ".pdf, .docx, .txt and .md";

impl DocumentFormat {
    /// Detects the format from the file extension, case-insensitively.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, ext) = filename.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(DocumentFormat::Pdf),
            "docx" => Some(DocumentFormat::Docx),
            "txt" | "md" => Some(DocumentFormat::PlainText),
            _ => None,
        }
    }

    /// Like `from_filename`, restricted to `allowed`.
    pub fn detect(
        filename: &str,
        allowed: &[DocumentFormat],
        label: &'static str,
    ) -> Result<Self, ExtractionError> {
        Self::from_filename(filename)
            .filter(|f| allowed.contains(f))
            .ok_or_else(|| ExtractionError::UnsupportedFormat {
                filename: filename.to_string(),
                allowed: label,
            })
    }
}

/// Extracts plain text, pages and paragraphs in document order.
pub fn extract_text(format: DocumentFormat, bytes: &[u8]) -> Result<String, ExtractionError> {
    match format {
        DocumentFormat::Pdf => {
            pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractionError::Pdf(e.to_string()))
        }
        DocumentFormat::Docx => extract_docx(bytes),
        DocumentFormat::PlainText => Ok(String::from_utf8_lossy(bytes).into_owned()),
    }
}

/// Runs `extract_text` on the blocking pool; PDF parsing is CPU-bound.
pub async fn extract_text_blocking(
    format: DocumentFormat,
    bytes: Vec<u8>,
) -> Result<String, ExtractionError> {
    tokio::task::spawn_blocking(move || extract_text(format, &bytes))
        .await
        .map_err(|e| ExtractionError::Io(std::io::Error::other(e)))?
}

fn extract_docx(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")?
        .read_to_string(&mut xml)?;

    let mut reader = Reader::from_str(&xml);
    let mut text = String::new();
    let mut in_run_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"w:t" => in_run_text = true,
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_run_text = false,
                b"w:p" => text.push('\n'),
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:tab" => text.push('\t'),
                b"w:br" | b"w:cr" => text.push('\n'),
                _ => {}
            },
            Event::Text(t) if in_run_text => text.push_str(&t.unescape()?),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(text)
}

#[cfg(test)]
pub mod testing {
    use std::io::{Cursor, Write};

    /// Builds a minimal .docx with one paragraph per entry.
    pub fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
        let body: String = paragraphs
            .iter()
            .map(|p| format!("<w:p><w:r><w:t xml:space=\"preserve\">{p}</w:t></w:r></w:p>"))
            .collect();
        let document = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
             <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
             <w:body>{body}</w:body></w:document>"
        );

        let mut cursor = Cursor::new(Vec::new());
        {
            let mut zip = zip::ZipWriter::new(&mut cursor);
            zip.start_file("word/document.xml", zip::write::FileOptions::default())
                .unwrap();
            zip.write_all(document.as_bytes()).unwrap();
            zip.finish().unwrap();
        }
        cursor.into_inner()
    }
}
