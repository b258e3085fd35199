//! Port abstraction over public blob storage for profile images.

use async_trait::async_trait;

/// Errors raised by blob store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BlobStoreError {
    /// The blob could not be written.
    #[error("blob upload failed: {message}")]
    Upload { message: String },

    /// The blob could not be removed.
    #[error("blob delete failed: {message}")]
    Delete { message: String },
}

impl BlobStoreError {
    /// Create an upload error with the given message.
    pub fn upload(message: impl Into<String>) -> Self {
        Self::Upload {
            message: message.into(),
        }
    }

    /// Create a delete error with the given message.
    pub fn delete(message: impl Into<String>) -> Self {
        Self::Delete {
            message: message.into(),
        }
    }
}

/// Async blob storage port.
///
/// Blobs are written under caller-chosen paths and become publicly readable
/// at the returned URL. Deletion takes the public URL previously returned by
/// [`BlobStore::put`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes` under `path`, returning the public URL.
    async fn put(&self, path: &str, bytes: &[u8]) -> Result<String, BlobStoreError>;

    /// Remove the blob behind a previously returned public URL.
    async fn remove(&self, url: &str) -> Result<(), BlobStoreError>;
}
