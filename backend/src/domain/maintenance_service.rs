//! Administrative maintenance: stats, structural repair, account removal.
//!
//! These operations iterate the whole keyspace and are synchronous
//! conveniences for the admin surface, never part of a user-facing request
//! path.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::domain::ports::{KeyValueStore, KvError};
use crate::domain::profile::Profile;
use crate::domain::record;
use crate::domain::user::User;
use crate::domain::{Error, ids, keys};

/// Aggregate totals across every account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SystemStats {
    pub total_users: u64,
    pub total_links: u64,
    pub total_views: i64,
    pub total_clicks: i64,
}

/// Outcome of a structural repair pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RepairReport {
    /// Profiles recreated with safe defaults.
    pub profiles_created: u64,
    /// Dangling link ids dropped from per-user link sets.
    pub dangling_links_removed: u64,
}

/// Maintenance service over the key-value store.
#[derive(Clone)]
pub struct MaintenanceService {
    kv: Arc<dyn KeyValueStore>,
}

fn map_kv(error: KvError) -> Error {
    match error {
        KvError::Connection { message } => {
            Error::service_unavailable(format!("store unavailable: {message}"))
        }
        KvError::Command { message } => Error::internal(format!("store command failed: {message}")),
        KvError::Corrupt { message } => Error::internal(format!("store data malformed: {message}")),
    }
}

impl MaintenanceService {
    /// Create the service over a key-value store.
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Aggregate counts across all users and their links.
    ///
    /// O(users × links): every user hash, profile hash, and link hash is
    /// read individually.
    pub async fn system_stats(&self) -> Result<SystemStats, Error> {
        let usernames = self
            .kv
            .set_members(keys::USERS_SET)
            .await
            .map_err(map_kv)?;

        let mut stats = SystemStats {
            total_users: 0,
            total_links: 0,
            total_views: 0,
            total_clicks: 0,
        };

        for username in usernames {
            let Some(user_fields) = self
                .kv
                .hash_get_all(&keys::user(&username))
                .await
                .map_err(map_kv)?
            else {
                continue;
            };
            stats.total_users += 1;

            if let Some(profile_fields) = self
                .kv
                .hash_get_all(&keys::profile(&username))
                .await
                .map_err(map_kv)?
            {
                stats.total_views +=
                    record::i64_or_zero(&profile_fields, "views").unwrap_or_default();
            }

            let Some(user_id) = user_fields.get("id") else {
                continue;
            };
            let link_ids = self
                .kv
                .set_members(&keys::user_links(user_id))
                .await
                .map_err(map_kv)?;
            stats.total_links += link_ids.len() as u64;
            for link_id in link_ids {
                if let Some(link_fields) = self
                    .kv
                    .hash_get_all(&keys::link(&link_id))
                    .await
                    .map_err(map_kv)?
                {
                    stats.total_clicks +=
                        record::i64_or_zero(&link_fields, "clicks").unwrap_or_default();
                }
            }
        }

        Ok(stats)
    }

    /// Idempotent repair pass over per-user structures.
    ///
    /// Recreates missing profile hashes with safe defaults and drops link
    /// ids whose backing hash has vanished. Safe to run repeatedly.
    pub async fn repair_key_structure(&self) -> Result<RepairReport, Error> {
        let usernames = self
            .kv
            .set_members(keys::USERS_SET)
            .await
            .map_err(map_kv)?;
        let mut report = RepairReport::default();

        for username in usernames {
            let Some(user_fields) = self
                .kv
                .hash_get_all(&keys::user(&username))
                .await
                .map_err(map_kv)?
            else {
                continue;
            };
            let Ok(user) = User::from_fields(&user_fields) else {
                warn!(%username, "repair skipping undecodable user record");
                continue;
            };

            if !self
                .kv
                .exists(&keys::profile(&username))
                .await
                .map_err(map_kv)?
            {
                let fresh = Profile::initial_for(&user, ids::now_ms());
                let fields = fresh
                    .to_fields()
                    .map_err(|error| Error::internal(format!("corrupt profile record: {error}")))?;
                self.kv
                    .hash_set(&keys::profile(&username), &fields)
                    .await
                    .map_err(map_kv)?;
                report.profiles_created += 1;
            }

            let links_key = keys::user_links(&user.id);
            for link_id in self.kv.set_members(&links_key).await.map_err(map_kv)? {
                if !self
                    .kv
                    .exists(&keys::link(&link_id))
                    .await
                    .map_err(map_kv)?
                {
                    self.kv
                        .set_remove(&links_key, &link_id)
                        .await
                        .map_err(map_kv)?;
                    report.dangling_links_removed += 1;
                }
            }
        }

        info!(
            profiles = report.profiles_created,
            dangling = report.dangling_links_removed,
            "repair pass complete"
        );
        Ok(report)
    }

    /// Remove an account and everything hanging off it.
    ///
    /// Returns `Ok(false)` when the user does not exist. The deletes are
    /// sequential and non-transactional; rerunning after a partial failure
    /// completes the removal.
    pub async fn clear_user_data(&self, username: &str) -> Result<bool, Error> {
        let Some(user_fields) = self
            .kv
            .hash_get_all(&keys::user(username))
            .await
            .map_err(map_kv)?
        else {
            return Ok(false);
        };

        if let Some(user_id) = user_fields.get("id") {
            let links_key = keys::user_links(user_id);
            for link_id in self.kv.set_members(&links_key).await.map_err(map_kv)? {
                self.kv
                    .delete(&keys::link(&link_id))
                    .await
                    .map_err(map_kv)?;
                self.kv
                    .delete(&keys::link_clicks(&link_id))
                    .await
                    .map_err(map_kv)?;
            }
            self.kv.delete(&links_key).await.map_err(map_kv)?;
        }

        self.kv
            .delete(&keys::profile(username))
            .await
            .map_err(map_kv)?;
        self.kv
            .delete(&keys::profile_views(username))
            .await
            .map_err(map_kv)?;

        // Sweep sessions pointing at this user.
        for session_key in self
            .kv
            .keys(keys::SESSION_PATTERN)
            .await
            .map_err(map_kv)?
        {
            match self.kv.get_string(&session_key).await {
                Ok(Some(owner)) if owner == username => {
                    self.kv.delete(&session_key).await.map_err(map_kv)?;
                }
                Ok(_) => {}
                Err(error) => warn!(%session_key, %error, "session sweep read failed"),
            }
        }

        self.kv.delete(&keys::user(username)).await.map_err(map_kv)?;
        if let Some(email) = user_fields.get("email") {
            self.kv
                .delete(&keys::email_index(email))
                .await
                .map_err(map_kv)?;
        }
        self.kv
            .set_remove(keys::USERS_SET, username)
            .await
            .map_err(map_kv)?;

        info!(%username, "user data cleared");
        Ok(true)
    }
}

#[cfg(test)]
mod tests;
