use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tokio::fs;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("invalid upload: {0}")]
    Invalid(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Location of a stored file, relative to the upload root.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StoredFile {
    pub path: String,
    pub size: u64,
}

/// File storage used by the web application for user-supplied assets.
#[async_trait]
pub trait FileUploadService: Send + Sync {
    async fn upload(&self, namespace: &str, file_name: &str, bytes: &[u8]) -> Result<StoredFile, UploadError>;
    /// Returns whether the file existed.
    async fn remove(&self, path: &str) -> Result<bool, UploadError>;
}

/// Stores uploads under `root/<namespace>/<uuid>-<name>`.
pub struct LocalFileUploadService {
    root: PathBuf,
}

impl LocalFileUploadService {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self { Self { root: root.into() } }

    pub fn root(&self) -> &Path { &self.root }
}

/// Keep a single safe path segment: ASCII alphanumerics plus `.`, `-`, `_`.
fn sanitize_segment(raw: &str) -> Result<String, UploadError> {
    let cleaned: String = raw
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect();
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        return Err(UploadError::Invalid(format!("unusable name {raw:?}")));
    }
    Ok(cleaned)
}

#[async_trait]
impl FileUploadService for LocalFileUploadService {
    async fn upload(&self, namespace: &str, file_name: &str, bytes: &[u8]) -> Result<StoredFile, UploadError> {
        if bytes.is_empty() {
            return Err(UploadError::Invalid("empty file".into()));
        }
        let namespace = sanitize_segment(namespace)?;
        let name = format!("{}-{}", Uuid::new_v4(), sanitize_segment(file_name)?);

        let dir = self.root.join(&namespace);
        fs::create_dir_all(&dir).await?;
        fs::write(dir.join(&name), bytes).await?;

        let stored = StoredFile { path: format!("{namespace}/{name}"), size: bytes.len() as u64 };
        info!(path = %stored.path, size = stored.size, "file_uploaded");
        Ok(stored)
    }

    async fn remove(&self, path: &str) -> Result<bool, UploadError> {
        let mut parts = path.split('/');
        let (Some(ns), Some(name), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(UploadError::Invalid(format!("bad path {path:?}")));
        };
        let target = self.root.join(sanitize_segment(ns)?).join(sanitize_segment(name)?);
        match fs::remove_file(target).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upload_then_remove() {
        let dir = tempfile::tempdir().unwrap();
        let svc = LocalFileUploadService::new(dir.path());

        let stored = svc.upload("promotions", "banner.png", b"png-bytes").await.unwrap();
        assert!(stored.path.starts_with("promotions/"));
        assert!(stored.path.ends_with("-banner.png"));
        assert_eq!(stored.size, 9);
        let on_disk = tokio::fs::read(dir.path().join(&stored.path)).await.unwrap();
        assert_eq!(on_disk, b"png-bytes");

        assert!(svc.remove(&stored.path).await.unwrap());
        assert!(!svc.remove(&stored.path).await.unwrap());
    }

    #[tokio::test]
    async fn traversal_names_stay_inside_root() {
        let dir = tempfile::tempdir().unwrap();
        let svc = LocalFileUploadService::new(dir.path());
        let stored = svc.upload("../etc", "../../passwd", b"x").await.unwrap();
        assert_eq!(stored.path.split('/').count(), 2);
        assert!(stored.path.starts_with(".._etc/"));
        assert!(stored.path.ends_with("-.._.._passwd"));
        assert!(dir.path().join(&stored.path).exists());
    }

    #[tokio::test]
    async fn rejects_empty_payloads_and_names() {
        let dir = tempfile::tempdir().unwrap();
        let svc = LocalFileUploadService::new(dir.path());
        assert!(matches!(svc.upload("p", "a.txt", b"").await, Err(UploadError::Invalid(_))));
        assert!(matches!(svc.upload("p", "  ", b"x").await, Err(UploadError::Invalid(_))));
        assert!(matches!(svc.upload("..", "a.txt", b"x").await, Err(UploadError::Invalid(_))));
        assert!(matches!(svc.remove("only-one-segment").await, Err(UploadError::Invalid(_))));
    }
}
