//! Link data model.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;
use utoipa::ToSchema;

use crate::domain::record::{self, RecordError};

/// Kind of destination a link points at; drives the icon on the public page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    /// Plain website link.
    #[default]
    Website,
    Instagram,
    Youtube,
    Linkedin,
    Whatsapp,
}

impl LinkType {
    /// Stable string form stored in the hash field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Website => "website",
            Self::Instagram => "instagram",
            Self::Youtube => "youtube",
            Self::Linkedin => "linkedin",
            Self::Whatsapp => "whatsapp",
        }
    }

    /// Parse the stored string form; unknown values fall back to `Website`.
    ///
    /// Records written by earlier versions may carry arbitrary type strings,
    /// so decoding is forgiving rather than failing the whole link.
    pub fn parse_lenient(raw: &str) -> Self {
        match raw {
            "instagram" => Self::Instagram,
            "youtube" => Self::Youtube,
            "linkedin" => Self::Linkedin,
            "whatsapp" => Self::Whatsapp,
            _ => Self::Website,
        }
    }
}

impl fmt::Display for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A link owned by a user and shown on their public page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    /// Generated identifier (`link_<ms>_<suffix>`).
    pub id: String,
    /// Identifier of the owning user.
    pub user_id: String,
    /// Label shown on the profile page.
    pub title: String,
    /// Destination URL.
    pub url: String,
    /// Destination kind.
    pub r#type: LinkType,
    /// Whether the link appears on the public page.
    pub is_public: bool,
    /// Display position within the owner's list; lower sorts first.
    pub position: i64,
    /// Creation time in epoch milliseconds.
    pub created_at: i64,
    /// Last mutation time in epoch milliseconds.
    pub updated_at: i64,
    /// Denormalised click counter.
    pub clicks: i64,
}

impl Link {
    /// Encode the record as store hash fields.
    pub fn to_fields(&self) -> Vec<(String, String)> {
        vec![
            ("id".into(), self.id.clone()),
            ("userId".into(), self.user_id.clone()),
            ("title".into(), self.title.clone()),
            ("url".into(), self.url.clone()),
            ("type".into(), self.r#type.to_string()),
            ("isPublic".into(), self.is_public.to_string()),
            ("position".into(), self.position.to_string()),
            ("createdAt".into(), self.created_at.to_string()),
            ("updatedAt".into(), self.updated_at.to_string()),
            ("clicks".into(), self.clicks.to_string()),
        ]
    }

    /// Decode a link from store hash fields.
    pub fn from_fields(fields: &HashMap<String, String>) -> Result<Self, RecordError> {
        Ok(Self {
            id: record::require(fields, "id")?.to_owned(),
            user_id: record::require(fields, "userId")?.to_owned(),
            title: record::require(fields, "title")?.to_owned(),
            url: fields.get("url").cloned().unwrap_or_default(),
            r#type: LinkType::parse_lenient(
                fields.get("type").map(String::as_str).unwrap_or("website"),
            ),
            is_public: record::require_bool(fields, "isPublic")?,
            position: record::require_i64(fields, "position")?,
            created_at: record::require_i64(fields, "createdAt")?,
            updated_at: record::require_i64(fields, "updatedAt")?,
            clicks: record::i64_or_zero(fields, "clicks")?,
        })
    }
}

/// Input for creating a link. Unset fields take the legacy defaults.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LinkDraft {
    /// Label shown on the profile page; defaults to "New Link".
    pub title: Option<String>,
    /// Destination URL; defaults to empty.
    pub url: Option<String>,
    /// Destination kind; defaults to `website`.
    pub r#type: Option<LinkType>,
    /// Visibility flag; defaults to public.
    pub is_public: Option<bool>,
    /// Display position; defaults to 0.
    pub position: Option<i64>,
}

/// Partial update applied over an existing link. `None` leaves a field alone.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LinkPatch {
    pub title: Option<String>,
    pub url: Option<String>,
    pub r#type: Option<LinkType>,
    pub is_public: Option<bool>,
    pub position: Option<i64>,
}

impl LinkPatch {
    /// Apply this patch over `link`, bumping `updated_at` to `now_ms`.
    pub fn apply(&self, link: &mut Link, now_ms: i64) {
        if let Some(title) = &self.title {
            link.title = title.clone();
        }
        if let Some(url) = &self.url {
            link.url = url.clone();
        }
        if let Some(kind) = self.r#type {
            link.r#type = kind;
        }
        if let Some(is_public) = self.is_public {
            link.is_public = is_public;
        }
        if let Some(position) = self.position {
            link.position = position;
        }
        link.updated_at = now_ms;
    }
}

/// Validate a user-supplied destination URL (http or https only).
pub fn validate_url(raw: &str) -> bool {
    match Url::parse(raw) {
        Ok(url) => matches!(url.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

/// Sort links for display: ascending position, ties broken by id.
///
/// Position density is never enforced, so duplicates are possible; the id
/// tie-break keeps the rendered order deterministic regardless.
pub fn sort_for_display(links: &mut [Link]) {
    links.sort_by(|a, b| a.position.cmp(&b.position).then_with(|| a.id.cmp(&b.id)));
}

#[cfg(test)]
mod tests;
