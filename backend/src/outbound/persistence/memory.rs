//! In-memory [`KeyValueStore`] used by tests and store-less local runs.
//!
//! Semantics mirror the Redis adapter closely enough for the domain
//! services: string TTLs expire lazily on read, sets deduplicate members,
//! and sorted sets deduplicate members while keeping the latest score.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::domain::ports::{KeyValueStore, KvError};

#[derive(Debug, Clone)]
enum Entry {
    Str {
        value: String,
        expires_at: Option<Instant>,
    },
    Hash(HashMap<String, String>),
    Set(HashSet<String>),
    SortedSet(BTreeMap<String, i64>),
}

/// Thread-safe in-memory key-value store.
#[derive(Debug, Default)]
pub struct InMemoryKvStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl InMemoryKvStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Entry>>, KvError> {
        self.entries
            .lock()
            .map_err(|_| KvError::command("store mutex poisoned"))
    }

    fn prune(entries: &mut HashMap<String, Entry>, key: &str) {
        let expired = matches!(
            entries.get(key),
            Some(Entry::Str {
                expires_at: Some(at),
                ..
            }) if *at <= Instant::now()
        );
        if expired {
            entries.remove(key);
        }
    }

    fn wrong_type(key: &str) -> KvError {
        KvError::command(format!("key `{key}` holds a value of the wrong type"))
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKvStore {
    async fn get_string(&self, key: &str) -> Result<Option<String>, KvError> {
        let mut entries = self.lock()?;
        Self::prune(&mut entries, key);
        match entries.get(key) {
            None => Ok(None),
            Some(Entry::Str { value, .. }) => Ok(Some(value.clone())),
            Some(_) => Err(Self::wrong_type(key)),
        }
    }

    async fn set_string(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> Result<(), KvError> {
        let mut entries = self.lock()?;
        entries.insert(
            key.to_owned(),
            Entry::Str {
                value: value.to_owned(),
                expires_at: ttl.map(|d| Instant::now() + d),
            },
        );
        Ok(())
    }

    async fn set_string_nx(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> Result<bool, KvError> {
        let mut entries = self.lock()?;
        Self::prune(&mut entries, key);
        if entries.contains_key(key) {
            return Ok(false);
        }
        entries.insert(
            key.to_owned(),
            Entry::Str {
                value: value.to_owned(),
                expires_at: ttl.map(|d| Instant::now() + d),
            },
        );
        Ok(true)
    }

    async fn delete(&self, key: &str) -> Result<u64, KvError> {
        let mut entries = self.lock()?;
        Ok(u64::from(entries.remove(key).is_some()))
    }

    async fn exists(&self, key: &str) -> Result<bool, KvError> {
        let mut entries = self.lock()?;
        Self::prune(&mut entries, key);
        Ok(entries.contains_key(key))
    }

    async fn hash_get_all(&self, key: &str) -> Result<Option<HashMap<String, String>>, KvError> {
        let entries = self.lock()?;
        match entries.get(key) {
            None => Ok(None),
            Some(Entry::Hash(fields)) if fields.is_empty() => Ok(None),
            Some(Entry::Hash(fields)) => Ok(Some(fields.clone())),
            Some(_) => Err(Self::wrong_type(key)),
        }
    }

    async fn hash_set(&self, key: &str, fields: &[(String, String)]) -> Result<(), KvError> {
        let mut entries = self.lock()?;
        let entry = entries
            .entry(key.to_owned())
            .or_insert_with(|| Entry::Hash(HashMap::new()));
        match entry {
            Entry::Hash(existing) => {
                for (field, value) in fields {
                    existing.insert(field.clone(), value.clone());
                }
                Ok(())
            }
            _ => Err(Self::wrong_type(key)),
        }
    }

    async fn hash_incr_by(&self, key: &str, field: &str, delta: i64) -> Result<i64, KvError> {
        let mut entries = self.lock()?;
        let entry = entries
            .entry(key.to_owned())
            .or_insert_with(|| Entry::Hash(HashMap::new()));
        match entry {
            Entry::Hash(existing) => {
                let current = match existing.get(field) {
                    None => 0,
                    Some(raw) => raw.parse::<i64>().map_err(|_| {
                        KvError::command(format!("hash field `{field}` is not an integer"))
                    })?,
                };
                let next = current + delta;
                existing.insert(field.to_owned(), next.to_string());
                Ok(next)
            }
            _ => Err(Self::wrong_type(key)),
        }
    }

    async fn set_add(&self, key: &str, member: &str) -> Result<bool, KvError> {
        let mut entries = self.lock()?;
        let entry = entries
            .entry(key.to_owned())
            .or_insert_with(|| Entry::Set(HashSet::new()));
        match entry {
            Entry::Set(members) => Ok(members.insert(member.to_owned())),
            _ => Err(Self::wrong_type(key)),
        }
    }

    async fn set_remove(&self, key: &str, member: &str) -> Result<bool, KvError> {
        let mut entries = self.lock()?;
        match entries.get_mut(key) {
            None => Ok(false),
            Some(Entry::Set(members)) => Ok(members.remove(member)),
            Some(_) => Err(Self::wrong_type(key)),
        }
    }

    async fn set_members(&self, key: &str) -> Result<Vec<String>, KvError> {
        let entries = self.lock()?;
        match entries.get(key) {
            None => Ok(Vec::new()),
            Some(Entry::Set(members)) => Ok(members.iter().cloned().collect()),
            Some(_) => Err(Self::wrong_type(key)),
        }
    }

    async fn sorted_set_add(&self, key: &str, score: i64, member: &str) -> Result<(), KvError> {
        let mut entries = self.lock()?;
        let entry = entries
            .entry(key.to_owned())
            .or_insert_with(|| Entry::SortedSet(BTreeMap::new()));
        match entry {
            Entry::SortedSet(members) => {
                members.insert(member.to_owned(), score);
                Ok(())
            }
            _ => Err(Self::wrong_type(key)),
        }
    }

    async fn sorted_set_range_by_score(
        &self,
        key: &str,
        min: i64,
        max: i64,
    ) -> Result<Vec<String>, KvError> {
        let entries = self.lock()?;
        match entries.get(key) {
            None => Ok(Vec::new()),
            Some(Entry::SortedSet(members)) => {
                let mut in_range: Vec<(&String, &i64)> = members
                    .iter()
                    .filter(|(_, score)| (min..=max).contains(*score))
                    .collect();
                in_range.sort_by(|a, b| a.1.cmp(b.1).then_with(|| a.0.cmp(b.0)));
                Ok(in_range.into_iter().map(|(member, _)| member.clone()).collect())
            }
            Some(_) => Err(Self::wrong_type(key)),
        }
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>, KvError> {
        let entries = self.lock()?;
        Ok(entries
            .keys()
            .filter(|key| glob_match(pattern, key))
            .cloned()
            .collect())
    }
}

/// Minimal glob support: at most one `*`, matching any run of characters.
fn glob_match(pattern: &str, candidate: &str) -> bool {
    match pattern.split_once('*') {
        None => pattern == candidate,
        Some((prefix, suffix)) => {
            candidate.len() >= prefix.len() + suffix.len()
                && candidate.starts_with(prefix)
                && candidate.ends_with(suffix)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn string_nx_claims_only_once() {
        let store = InMemoryKvStore::new();
        assert!(store.set_string_nx("email:a@b.io", "ada", None).await.expect("nx"));
        assert!(!store.set_string_nx("email:a@b.io", "eve", None).await.expect("nx"));
        assert_eq!(
            store.get_string("email:a@b.io").await.expect("get").as_deref(),
            Some("ada")
        );
    }

    #[tokio::test]
    async fn expired_strings_vanish() {
        let store = InMemoryKvStore::new();
        store
            .set_string("session:x", "ada", Some(Duration::ZERO))
            .await
            .expect("set");
        assert_eq!(store.get_string("session:x").await.expect("get"), None);
        assert!(!store.exists("session:x").await.expect("exists"));
    }

    #[tokio::test]
    async fn hash_incr_creates_and_counts() {
        let store = InMemoryKvStore::new();
        assert_eq!(store.hash_incr_by("link:1", "clicks", 1).await.expect("incr"), 1);
        assert_eq!(store.hash_incr_by("link:1", "clicks", 1).await.expect("incr"), 2);
    }

    #[tokio::test]
    async fn sorted_set_range_is_inclusive() {
        let store = InMemoryKvStore::new();
        for score in [10, 20, 30] {
            store
                .sorted_set_add("log", score, &score.to_string())
                .await
                .expect("zadd");
        }
        let members = store
            .sorted_set_range_by_score("log", 10, 20)
            .await
            .expect("zrange");
        assert_eq!(members, vec!["10".to_owned(), "20".to_owned()]);
    }

    #[tokio::test]
    async fn sorted_set_members_deduplicate() {
        let store = InMemoryKvStore::new();
        store.sorted_set_add("log", 1, "42").await.expect("zadd");
        store.sorted_set_add("log", 2, "42").await.expect("zadd");
        let members = store
            .sorted_set_range_by_score("log", 0, 10)
            .await
            .expect("zrange");
        assert_eq!(members.len(), 1);
    }

    #[test]
    fn glob_matches_session_pattern() {
        assert!(glob_match("session:*", "session:abc"));
        assert!(!glob_match("session:*", "profile:ada"));
        assert!(glob_match("users", "users"));
    }

    #[tokio::test]
    async fn wrong_type_access_is_an_error() {
        let store = InMemoryKvStore::new();
        store.set_add("users", "ada").await.expect("sadd");
        assert!(store.get_string("users").await.is_err());
    }
}
