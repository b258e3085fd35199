//! Redis-backed [`KeyValueStore`] adapter using a `bb8` connection pool.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use bb8_redis::bb8::{Pool, PooledConnection};
use bb8_redis::redis::{self, AsyncCommands};
use bb8_redis::RedisConnectionManager;

use crate::domain::ports::{KeyValueStore, KvError};

/// Key-value store adapter backed by a pooled Redis client.
#[derive(Clone)]
pub struct RedisKvStore {
    pool: Pool<RedisConnectionManager>,
}

fn command_error(error: redis::RedisError) -> KvError {
    if error.is_io_error() || error.is_connection_refusal() || error.is_connection_dropped() {
        KvError::connection(error.to_string())
    } else {
        KvError::command(error.to_string())
    }
}

impl RedisKvStore {
    /// Connect a pool to the Redis instance at `url`.
    pub async fn connect(url: &str) -> Result<Self, KvError> {
        let manager = RedisConnectionManager::new(url)
            .map_err(|error| KvError::connection(error.to_string()))?;
        let pool = Pool::builder()
            .build(manager)
            .await
            .map_err(|error| KvError::connection(error.to_string()))?;
        Ok(Self { pool })
    }

    async fn conn(&self) -> Result<PooledConnection<'_, RedisConnectionManager>, KvError> {
        self.pool
            .get()
            .await
            .map_err(|error| KvError::connection(error.to_string()))
    }
}

#[async_trait]
impl KeyValueStore for RedisKvStore {
    async fn get_string(&self, key: &str) -> Result<Option<String>, KvError> {
        let mut conn = self.conn().await?;
        conn.get(key).await.map_err(command_error)
    }

    async fn set_string(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> Result<(), KvError> {
        let mut conn = self.conn().await?;
        match ttl {
            Some(ttl) => conn
                .set_ex(key, value, ttl.as_secs())
                .await
                .map_err(command_error),
            None => conn.set(key, value).await.map_err(command_error),
        }
    }

    async fn set_string_nx(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> Result<bool, KvError> {
        let mut conn = self.conn().await?;
        match ttl {
            Some(ttl) => {
                // SET key value NX EX <secs>; nil reply means the key existed.
                let reply: Option<String> = redis::cmd("SET")
                    .arg(key)
                    .arg(value)
                    .arg("NX")
                    .arg("EX")
                    .arg(ttl.as_secs())
                    .query_async(&mut *conn)
                    .await
                    .map_err(command_error)?;
                Ok(reply.is_some())
            }
            None => conn.set_nx(key, value).await.map_err(command_error),
        }
    }

    async fn delete(&self, key: &str) -> Result<u64, KvError> {
        let mut conn = self.conn().await?;
        conn.del(key).await.map_err(command_error)
    }

    async fn exists(&self, key: &str) -> Result<bool, KvError> {
        let mut conn = self.conn().await?;
        conn.exists(key).await.map_err(command_error)
    }

    async fn hash_get_all(&self, key: &str) -> Result<Option<HashMap<String, String>>, KvError> {
        let mut conn = self.conn().await?;
        let fields: HashMap<String, String> = conn.hgetall(key).await.map_err(command_error)?;
        // Redis reports an absent hash as an empty map.
        Ok((!fields.is_empty()).then_some(fields))
    }

    async fn hash_set(&self, key: &str, fields: &[(String, String)]) -> Result<(), KvError> {
        let mut conn = self.conn().await?;
        conn.hset_multiple(key, fields).await.map_err(command_error)
    }

    async fn hash_incr_by(&self, key: &str, field: &str, delta: i64) -> Result<i64, KvError> {
        let mut conn = self.conn().await?;
        conn.hincr(key, field, delta).await.map_err(command_error)
    }

    async fn set_add(&self, key: &str, member: &str) -> Result<bool, KvError> {
        let mut conn = self.conn().await?;
        let added: u64 = conn.sadd(key, member).await.map_err(command_error)?;
        Ok(added == 1)
    }

    async fn set_remove(&self, key: &str, member: &str) -> Result<bool, KvError> {
        let mut conn = self.conn().await?;
        let removed: u64 = conn.srem(key, member).await.map_err(command_error)?;
        Ok(removed == 1)
    }

    async fn set_members(&self, key: &str) -> Result<Vec<String>, KvError> {
        let mut conn = self.conn().await?;
        conn.smembers(key).await.map_err(command_error)
    }

    async fn sorted_set_add(&self, key: &str, score: i64, member: &str) -> Result<(), KvError> {
        let mut conn = self.conn().await?;
        conn.zadd(key, member, score).await.map_err(command_error)
    }

    async fn sorted_set_range_by_score(
        &self,
        key: &str,
        min: i64,
        max: i64,
    ) -> Result<Vec<String>, KvError> {
        let mut conn = self.conn().await?;
        conn.zrangebyscore(key, min, max).await.map_err(command_error)
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>, KvError> {
        let mut conn = self.conn().await?;
        conn.keys(pattern).await.map_err(command_error)
    }
}
