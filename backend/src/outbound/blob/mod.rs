//! Blob storage adapters for profile images.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::fs;

use crate::domain::ports::{BlobStore, BlobStoreError};

/// Filesystem-backed blob store.
///
/// Blobs land under `root/<path>` and are advertised at
/// `<base_url>/<path>`; serving the directory publicly is the deployment's
/// concern (a static file server or CDN in front of `root`).
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
    base_url: String,
}

impl FsBlobStore {
    /// Create a store rooted at `root`, advertising URLs under `base_url`.
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        }
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn path_for_url(&self, url: &str) -> Option<PathBuf> {
        let relative = url.strip_prefix(&self.base_url)?.trim_start_matches('/');
        // Reject traversal out of the root.
        if relative.is_empty() || relative.split('/').any(|part| part == "..") {
            return None;
        }
        Some(self.root.join(relative))
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn put(&self, path: &str, bytes: &[u8]) -> Result<String, BlobStoreError> {
        if path.split('/').any(|part| part == "..") {
            return Err(BlobStoreError::upload("path escapes the blob root"));
        }
        let target = self.root.join(path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|err| BlobStoreError::upload(err.to_string()))?;
        }
        fs::write(&target, bytes)
            .await
            .map_err(|err| BlobStoreError::upload(err.to_string()))?;
        Ok(self.url_for(path))
    }

    async fn remove(&self, url: &str) -> Result<(), BlobStoreError> {
        let Some(target) = self.path_for_url(url) else {
            return Err(BlobStoreError::delete(format!(
                "url `{url}` is not under this store"
            )));
        };
        match fs::remove_file(&target).await {
            Ok(()) => Ok(()),
            // Removing an already-absent blob is not an error.
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(BlobStoreError::delete(err.to_string())),
        }
    }
}

/// In-memory blob store for tests and store-less local runs.
#[derive(Debug, Default)]
pub struct InMemoryBlobStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl InMemoryBlobStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of blobs currently held.
    pub fn len(&self) -> usize {
        self.blobs.lock().map(|blobs| blobs.len()).unwrap_or(0)
    }

    /// Whether the store holds no blobs.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn put(&self, path: &str, bytes: &[u8]) -> Result<String, BlobStoreError> {
        let url = format!("memory://{path}");
        self.blobs
            .lock()
            .map_err(|_| BlobStoreError::upload("blob mutex poisoned"))?
            .insert(url.clone(), bytes.to_vec());
        Ok(url)
    }

    async fn remove(&self, url: &str) -> Result<(), BlobStoreError> {
        self.blobs
            .lock()
            .map_err(|_| BlobStoreError::delete("blob mutex poisoned"))?
            .remove(url);
        Ok(())
    }
}
