//! Local storage for uploaded files.

use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Reduces a client-supplied file name to its final path component.
/// Returns `None` when nothing usable remains.
pub fn sanitize_filename(name: &str) -> Option<String> {
    let base = name.rsplit(|c: char| c == '/' || c == '\\').next()?.trim();
    match base {
        "" | "." | ".." => None,
        other => Some(other.to_string()),
    }
}

/// Writes `bytes` to `dir/filename`, creating `dir` if needed.
/// An existing file with the same name is overwritten.
pub async fn save_upload(dir: &Path, filename: &str, bytes: &[u8]) -> io::Result<PathBuf> {
    let name = sanitize_filename(filename).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid file name '{filename}'"),
        )
    })?;

    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(name);
    tokio::fs::write(&path, bytes).await?;
    debug!(path = %path.display(), size = bytes.len(), "saved upload");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_directories() {
        assert_eq!(sanitize_filename("../../etc/passwd").as_deref(), Some("passwd"));
        assert_eq!(sanitize_filename("C:\\Users\\cv.pdf").as_deref(), Some("cv.pdf"));
        assert_eq!(sanitize_filename("cv.pdf").as_deref(), Some("cv.pdf"));
    }

    #[test]
    fn test_sanitize_rejects_empty_and_dot_names() {
        assert_eq!(sanitize_filename(""), None);
        assert_eq!(sanitize_filename("uploads/"), None);
        assert_eq!(sanitize_filename(".."), None);
    }

    #[tokio::test]
    async fn test_save_upload_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("data/resumes");

        let path = save_upload(&dir, "../cv.pdf", b"%PDF").await.unwrap();
        assert_eq!(path, dir.join("cv.pdf"));
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"%PDF");
    }

    #[tokio::test]
    async fn test_save_upload_rejects_unusable_name() {
        let tmp = tempfile::tempdir().unwrap();
        let err = save_upload(tmp.path(), "..", b"x").await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
