//! Domain ports for the hexagonal boundary.

mod blob_store;
mod kv_store;

pub use blob_store::{BlobStore, BlobStoreError};
#[cfg(test)]
pub use blob_store::MockBlobStore;
pub use kv_store::{KeyValueStore, KvError};
#[cfg(test)]
pub use kv_store::MockKeyValueStore;
