//! Link store: CRUD, ordering, and click recording.

use std::sync::Arc;

use tracing::warn;

use crate::domain::link::{self, Link, LinkDraft, LinkPatch};
use crate::domain::ports::{KeyValueStore, KvError};
use crate::domain::record::RecordError;
use crate::domain::{Error, ids, keys};

/// One entry of a reorder request: a link and its new position.
#[derive(Debug, Clone, serde::Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PositionUpdate {
    pub id: String,
    pub position: i64,
}

/// Link store service over the key-value store.
///
/// Ownership is NOT checked here: callers (the HTTP layer) decide whether
/// the acting user may touch a link.
#[derive(Clone)]
pub struct LinksService {
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

fn map_record(error: RecordError) -> Error {
    Error::internal(format!("corrupt link record: {error}"))
}

impl LinksService {
    /// Create the service over a key-value store.
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Create a link for `user_id`. Unset draft fields take legacy defaults.
    pub async fn create(&self, user_id: &str, draft: LinkDraft) -> Result<Link, Error> {
        if let Some(url) = draft.url.as_deref() {
            if !url.is_empty() && !link::validate_url(url) {
                return Err(Error::invalid_request(
                    "url must be a valid http(s) address",
                ));
            }
        }

        let now = ids::now_ms();
        let created = Link {
            id: ids::new_link_id(now),
            user_id: user_id.to_owned(),
            title: draft.title.unwrap_or_else(|| "New Link".into()),
            url: draft.url.unwrap_or_default(),
            r#type: draft.r#type.unwrap_or_default(),
            is_public: draft.is_public.unwrap_or(true),
            position: draft.position.unwrap_or(0),
            created_at: now,
            updated_at: now,
            clicks: 0,
        };

        self.kv
            .hash_set(&keys::link(&created.id), &created.to_fields())
            .await
            .map_err(map_kv)?;
        self.kv
            .set_add(&keys::user_links(user_id), &created.id)
            .await
            .map_err(map_kv)?;

        Ok(created)
    }

    /// Fetch a single link by id.
    pub async fn by_id(&self, link_id: &str) -> Result<Option<Link>, Error> {
        let Some(fields) = self
            .kv
            .hash_get_all(&keys::link(link_id))
            .await
            .map_err(map_kv)?
        else {
            return Ok(None);
        };
        Link::from_fields(&fields).map(Some).map_err(map_record)
    }

    /// Fetch every link owned by `user_id`, in display order.
    ///
    /// Reads each link individually (one round-trip per id, as the data
    /// layout dictates); ids without a backing hash are skipped.
    pub async fn links_by_user(&self, user_id: &str) -> Result<Vec<Link>, Error> {
        let ids = self
            .kv
            .set_members(&keys::user_links(user_id))
            .await
            .map_err(map_kv)?;
        let mut links = Vec::with_capacity(ids.len());
        for link_id in ids {
            let Some(fields) = self
                .kv
                .hash_get_all(&keys::link(&link_id))
                .await
                .map_err(map_kv)?
            else {
                continue;
            };
            match Link::from_fields(&fields) {
                Ok(found) => links.push(found),
                Err(error) => warn!(%link_id, %error, "skipping undecodable link record"),
            }
        }
        link::sort_for_display(&mut links);
        Ok(links)
    }

    /// Read-modify-write update. `Ok(None)` when the link does not exist.
    pub async fn update(&self, link_id: &str, patch: &LinkPatch) -> Result<Option<Link>, Error> {
        if let Some(url) = patch.url.as_deref() {
            if !url.is_empty() && !link::validate_url(url) {
                return Err(Error::invalid_request(
                    "url must be a valid http(s) address",
                ));
            }
        }

        let Some(mut found) = self.by_id(link_id).await? else {
            return Ok(None);
        };
        patch.apply(&mut found, ids::now_ms());
        self.kv
            .hash_set(&keys::link(link_id), &found.to_fields())
            .await
            .map_err(map_kv)?;
        Ok(Some(found))
    }

    /// Remove a link from its owner's set and delete the record.
    pub async fn delete(&self, link_id: &str, user_id: &str) -> Result<bool, Error> {
        self.kv
            .set_remove(&keys::user_links(user_id), link_id)
            .await
            .map_err(map_kv)?;
        self.kv
            .delete(&keys::link(link_id))
            .await
            .map_err(map_kv)?;
        Ok(true)
    }

    /// Record a click: atomic counter increment plus a best-effort append to
    /// the analytics log. Returns the new counter value.
    pub async fn record_click(&self, link_id: &str) -> Result<i64, Error> {
        let clicks = self
            .kv
            .hash_incr_by(&keys::link(link_id), "clicks", 1)
            .await
            .map_err(map_kv)?;
        let now = ids::now_ms();
        if let Err(error) = self
            .kv
            .sorted_set_add(&keys::link_clicks(link_id), now, &now.to_string())
            .await
        {
            // The counter already moved; the histogram may undercount.
            warn!(%link_id, %error, "click analytics append failed");
        }
        Ok(clicks)
    }

    /// Public links for a username's page, in display order.
    ///
    /// `Ok(None)` when the user does not exist; an existing user with no
    /// public links yields an empty vector.
    pub async fn public_links_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Vec<Link>>, Error> {
        let Some(fields) = self
            .kv
            .hash_get_all(&keys::user(username))
            .await
            .map_err(map_kv)?
        else {
            return Ok(None);
        };
        let Some(user_id) = fields.get("id") else {
            return Ok(None);
        };
        let links = self.links_by_user(user_id).await?;
        Ok(Some(links.into_iter().filter(|l| l.is_public).collect()))
    }

    /// Apply a reorder as a sequence of independent updates.
    ///
    /// Not atomic as a batch: a failure partway leaves a partially
    /// reordered state. Unknown ids are skipped.
    pub async fn update_positions(&self, updates: &[PositionUpdate]) -> Result<(), Error> {
        for update in updates {
            let patch = LinkPatch {
                position: Some(update.position),
                ..LinkPatch::default()
            };
            self.update(&update.id, &patch).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
