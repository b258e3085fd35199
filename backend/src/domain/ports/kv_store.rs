//! Port abstraction over the external key-value store.
//!
//! The store is the single source of truth: string keys with optional TTL,
//! hashes for structured records, sets for membership indices, and sorted
//! sets as timestamped event logs. Adapters provide Redis-backed and
//! in-memory implementations; services never see a concrete client type.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

/// Errors raised by key-value store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KvError {
    /// A connection could not be checked out or established.
    #[error("key-value store connection failed: {message}")]
    Connection { message: String },

    /// A command failed during execution.
    #[error("key-value store command failed: {message}")]
    Command { message: String },

    /// A stored value could not be decoded into the expected shape.
    #[error("key-value store returned malformed data: {message}")]
    Corrupt { message: String },
}

impl KvError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a command error with the given message.
    pub fn command(message: impl Into<String>) -> Self {
        Self::Command {
            message: message.into(),
        }
    }

    /// Create a malformed-data error with the given message.
    pub fn corrupt(message: impl Into<String>) -> Self {
        Self::Corrupt {
            message: message.into(),
        }
    }
}

/// Async key-value store port.
///
/// Each method maps to a single store command; compound semantics (check
/// then write, counter plus log) live in the domain services built on top.
/// `set_add` and `set_string_nx` report whether the member or key was newly
/// written, which is what lets registration enforce uniqueness atomically.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetch a string value.
    async fn get_string(&self, key: &str) -> Result<Option<String>, KvError>;

    /// Store a string value, optionally with a time-to-live.
    async fn set_string(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> Result<(), KvError>;

    /// Store a string value only if the key does not exist yet.
    ///
    /// Returns `true` when the key was written by this call.
    async fn set_string_nx(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> Result<bool, KvError>;

    /// Delete a key of any type. Returns the number of keys removed.
    async fn delete(&self, key: &str) -> Result<u64, KvError>;

    /// Check whether a key exists.
    async fn exists(&self, key: &str) -> Result<bool, KvError>;

    /// Fetch every field of a hash. `None` when the hash is absent or empty.
    async fn hash_get_all(&self, key: &str) -> Result<Option<HashMap<String, String>>, KvError>;

    /// Write (or overwrite) the given fields of a hash.
    async fn hash_set(&self, key: &str, fields: &[(String, String)]) -> Result<(), KvError>;

    /// Atomically increment an integer hash field, returning the new value.
    async fn hash_incr_by(&self, key: &str, field: &str, delta: i64) -> Result<i64, KvError>;

    /// Add a member to a set. Returns `true` when the member was new.
    async fn set_add(&self, key: &str, member: &str) -> Result<bool, KvError>;

    /// Remove a member from a set. Returns `true` when the member existed.
    async fn set_remove(&self, key: &str, member: &str) -> Result<bool, KvError>;

    /// List every member of a set. Absent sets yield an empty vector.
    async fn set_members(&self, key: &str) -> Result<Vec<String>, KvError>;

    /// Add a member with the given score to a sorted set.
    async fn sorted_set_add(&self, key: &str, score: i64, member: &str) -> Result<(), KvError>;

    /// List members whose score lies in `[min, max]`, ascending by score.
    async fn sorted_set_range_by_score(
        &self,
        key: &str,
        min: i64,
        max: i64,
    ) -> Result<Vec<String>, KvError>;

    /// List keys matching a glob-style pattern (single `*` wildcard).
    ///
    /// Used only by administrative sweeps; never on a request path.
    async fn keys(&self, pattern: &str) -> Result<Vec<String>, KvError>;
}
