//! Profile store: lazy materialisation, merge updates, images, analytics.

use std::sync::Arc;

use tracing::warn;

use crate::domain::analytics::{self, DAY_MS, ProfileAnalytics};
use crate::domain::ports::{BlobStore, KeyValueStore, KvError};
use crate::domain::profile::{Profile, ProfilePatch};
use crate::domain::record::RecordError;
use crate::domain::user::User;
use crate::domain::{Error, ids, keys};

/// Profile store service over the key-value store and blob storage.
#[derive(Clone)]
pub struct ProfilesService {
    kv: Arc<dyn KeyValueStore>,
    blobs: Arc<dyn BlobStore>,
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

fn map_record(error: RecordError) -> Error {
    Error::internal(format!("corrupt profile record: {error}"))
}

impl ProfilesService {
    /// Create the service over a key-value store and blob storage.
    pub fn new(kv: Arc<dyn KeyValueStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { kv, blobs }
    }

    async fn user_fields(&self, username: &str) -> Result<Option<User>, Error> {
        let Some(fields) = self
            .kv
            .hash_get_all(&keys::user(username))
            .await
            .map_err(map_kv)?
        else {
            return Ok(None);
        };
        User::from_fields(&fields)
            .map(Some)
            .map_err(|error| Error::internal(format!("corrupt user record: {error}")))
    }

    /// Fetch a profile, materialising the default on first read.
    ///
    /// NOT a pure read: the first call for a user persists the synthesised
    /// default profile. `Ok(None)` when the user itself does not exist.
    pub async fn profile(&self, username: &str) -> Result<Option<Profile>, Error> {
        let Some(user) = self.user_fields(username).await? else {
            return Ok(None);
        };

        if let Some(fields) = self
            .kv
            .hash_get_all(&keys::profile(username))
            .await
            .map_err(map_kv)?
        {
            return Profile::from_fields(&fields).map(Some).map_err(map_record);
        }

        let fresh = Profile::initial_for(&user, ids::now_ms());
        self.kv
            .hash_set(&keys::profile(username), &fresh.to_fields().map_err(map_record)?)
            .await
            .map_err(map_kv)?;
        Ok(Some(fresh))
    }

    /// Merge a partial update into the profile.
    ///
    /// Top-level fields are shallow-merged; `customization` deep-merges.
    /// Display name and bio changes are synced back onto the user record.
    pub async fn update(
        &self,
        username: &str,
        patch: &ProfilePatch,
    ) -> Result<Option<Profile>, Error> {
        let Some(mut profile) = self.profile(username).await? else {
            return Ok(None);
        };

        patch.apply(&mut profile, ids::now_ms());
        self.kv
            .hash_set(
                &keys::profile(username),
                &profile.to_fields().map_err(map_record)?,
            )
            .await
            .map_err(map_kv)?;

        if patch.display_name.is_some() || patch.bio.is_some() {
            self.kv
                .hash_set(
                    &keys::user(username),
                    &[
                        ("displayName".into(), profile.display_name.clone()),
                        ("bio".into(), profile.bio.clone()),
                    ],
                )
                .await
                .map_err(map_kv)?;
        }

        Ok(Some(profile))
    }

    /// Store a new profile image and point the profile and user records at
    /// it. The previous blob is deleted best-effort; the three writes are
    /// not transactional.
    pub async fn upload_image(
        &self,
        username: &str,
        bytes: &[u8],
    ) -> Result<Option<String>, Error> {
        let Some(profile) = self.profile(username).await? else {
            return Ok(None);
        };

        if let Some(previous) = &profile.profile_image {
            if let Err(error) = self.blobs.remove(previous).await {
                warn!(%username, %error, "failed to delete previous profile image");
            }
        }

        let path = format!("profiles/{username}/profile-{}.jpg", ids::now_ms());
        let url = self
            .blobs
            .put(&path, bytes)
            .await
            .map_err(|error| Error::internal(format!("image upload failed: {error}")))?;

        self.kv
            .hash_set(
                &keys::profile(username),
                &[("profileImage".into(), url.clone())],
            )
            .await
            .map_err(map_kv)?;
        self.kv
            .hash_set(&keys::user(username), &[("profileImage".into(), url.clone())])
            .await
            .map_err(map_kv)?;

        Ok(Some(url))
    }

    /// Record a profile view: counter increment plus best-effort log append.
    pub async fn record_view(&self, username: &str) -> Result<i64, Error> {
        let views = self
            .kv
            .hash_incr_by(&keys::profile(username), "views", 1)
            .await
            .map_err(map_kv)?;
        let now = ids::now_ms();
        if let Err(error) = self
            .kv
            .sorted_set_add(&keys::profile_views(username), now, &now.to_string())
            .await
        {
            warn!(%username, %error, "view analytics append failed");
        }
        Ok(views)
    }

    /// Aggregate view analytics for the trailing `days` window.
    ///
    /// The histogram is rebuilt from the event log and can undercount the
    /// total when log appends previously failed.
    pub async fn analytics(
        &self,
        username: &str,
        days: u32,
    ) -> Result<Option<ProfileAnalytics>, Error> {
        let Some(profile) = self.profile(username).await? else {
            return Ok(None);
        };

        let since = ids::now_ms() - i64::from(days) * DAY_MS;
        let raw = self
            .kv
            .sorted_set_range_by_score(&keys::profile_views(username), since, i64::MAX)
            .await
            .map_err(map_kv)?;
        let timestamps = raw.iter().filter_map(|member| {
            member
                .parse::<i64>()
                .map_err(|err| {
                    warn!(%username, member, %err, "skipping non-numeric analytics member");
                })
                .ok()
        });

        Ok(Some(ProfileAnalytics {
            views: profile.views,
            views_by_day: analytics::bucket_by_day(timestamps),
        }))
    }
}

#[cfg(test)]
mod tests;
