//! Blob storage seam. Uploaded files live under
//! `uploads/{shop_id}/{order_number}/{file_name}`; two files with the same
//! name in one order overwrite each other.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes` at `path`, returning a stable retrieval URL.
    async fn put(&self, path: &str, bytes: &[u8]) -> AppResult<String>;

    async fn get(&self, path: &str) -> AppResult<Vec<u8>>;
}

pub fn upload_path(shop_id: Uuid, order_number: &str, file_name: &str) -> String {
    format!("uploads/{shop_id}/{order_number}/{file_name}")
}

/// Filesystem-backed store serving blobs back through `/files/{path}`.
pub struct LocalBlobStore {
    root: PathBuf,
    public_base: String,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>, public_base: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base: public_base.into(),
        }
    }

    fn resolve(&self, path: &str) -> AppResult<PathBuf> {
        let traversal = path
            .split('/')
            .any(|seg| seg.is_empty() || seg == "." || seg == "..");
        if traversal {
            return Err(AppError::BadRequest("Invalid storage path".to_string()));
        }
        Ok(self.root.join(path))
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(&self, path: &str, bytes: &[u8]) -> AppResult<String> {
        let full = self.resolve(path)?;
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Internal(e.into()))?;
        }
        fs::write(&full, bytes)
            .await
            .map_err(|e| AppError::Internal(e.into()))?;
        Ok(format!(
            "{}/files/{path}",
            self.public_base.trim_end_matches('/')
        ))
    }

    async fn get(&self, path: &str) -> AppResult<Vec<u8>> {
        let full = self.resolve(path)?;
        match fs::read(&full).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(AppError::NotFound),
            Err(e) => Err(AppError::Internal(e.into())),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> LocalBlobStore {
        let root = std::env::temp_dir().join(format!("printshop-test-{}", Uuid::new_v4()));
        LocalBlobStore::new(root, "http://localhost:3000")
    }

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let store = temp_store();
        let url = store.put("uploads/a/b/doc.pdf", b"hello").await.unwrap();
        assert_eq!(url, "http://localhost:3000/files/uploads/a/b/doc.pdf");
        assert_eq!(store.get("uploads/a/b/doc.pdf").await.unwrap(), b"hello");
    }

    #[tokio::test]
    async fn missing_blob_is_not_found() {
        let store = temp_store();
        assert!(matches!(
            store.get("uploads/a/b/missing.pdf").await,
            Err(AppError::NotFound)
        ));
    }

    #[tokio::test]
    async fn traversal_segments_are_rejected() {
        let store = temp_store();
        for path in ["../etc/passwd", "uploads/../../x", "uploads//x", "./x"] {
            assert!(store.get(path).await.is_err(), "path {path} accepted");
            assert!(store.put(path, b"x").await.is_err(), "path {path} accepted");
        }
    }

    #[test]
    fn upload_path_follows_the_convention() {
        let shop = Uuid::new_v4();
        assert_eq!(
            upload_path(shop, "1234ABC", "doc.pdf"),
            format!("uploads/{shop}/1234ABC/doc.pdf")
        );
    }
}
