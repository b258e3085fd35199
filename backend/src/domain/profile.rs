//! Public profile data model.
//!
//! A profile is one-to-one with a user, keyed by username, and materialised
//! lazily on first read. The `customization` sub-object is a partial map:
//! updates merge field-by-field and never replace it wholesale.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::record::{self, RecordError};
use crate::domain::theme;
use crate::domain::user::User;

/// Free-form page customization. Every field optional; absent fields fall
/// back to what the selected theme provides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Customization {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub button_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub button_shape: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub button_animation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_layout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_link_icons: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_link_descriptions: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_profile_stats: Option<bool>,
    // Stored records spell this field customCSS, not customCss.
    #[serde(rename = "customCSS", skip_serializing_if = "Option::is_none")]
    pub custom_css: Option<String>,
}

macro_rules! merge_fields {
    ($dst:expr, $src:expr, $($field:ident),+ $(,)?) => {
        $(
            if $src.$field.is_some() {
                $dst.$field = $src.$field.clone();
            }
        )+
    };
}

impl Customization {
    /// Defaults applied when a profile is first materialised.
    pub fn initial() -> Self {
        Self {
            button_style: Some("default".into()),
            button_shape: Some("rounded".into()),
            profile_layout: Some("standard".into()),
            show_link_icons: Some(true),
            show_profile_stats: Some(false),
            ..Self::default()
        }
    }

    /// Shallow merge: fields set in `other` overwrite, unset fields survive.
    pub fn merge(&mut self, other: &Self) {
        merge_fields!(
            self,
            other,
            background_color,
            text_color,
            font_family,
            button_style,
            button_shape,
            button_animation,
            profile_layout,
            show_link_icons,
            show_link_descriptions,
            show_profile_stats,
            custom_css,
        );
    }
}

/// Public profile record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Identifier of the owning user.
    pub user_id: String,
    /// Owning username; also the hash key suffix.
    pub username: String,
    /// Name shown on the public page.
    pub display_name: String,
    /// Short free-form biography.
    pub bio: String,
    /// Identifier into the static theme catalogue.
    pub theme: String,
    /// Public URL of the profile image, when one was uploaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    /// Page customization overrides.
    pub customization: Customization,
    /// Denormalised view counter.
    pub views: i64,
    /// Last mutation time in epoch milliseconds.
    pub updated_at: i64,
}

impl Profile {
    /// Materialise the default profile for a freshly-read user.
    pub fn initial_for(user: &User, now_ms: i64) -> Self {
        Self {
            user_id: user.id.clone(),
            username: user.username.to_string(),
            display_name: if user.display_name.is_empty() {
                user.username.to_string()
            } else {
                user.display_name.clone()
            },
            bio: user.bio.clone(),
            theme: theme::DEFAULT_THEME_ID.into(),
            profile_image: user.profile_image.clone(),
            customization: Customization::initial(),
            views: 0,
            updated_at: now_ms,
        }
    }

    /// Encode the record as store hash fields.
    ///
    /// `customization` is stored as one JSON string field; everything else
    /// stays a flat string for compatibility with existing data.
    pub fn to_fields(&self) -> Result<Vec<(String, String)>, RecordError> {
        let customization =
            serde_json::to_string(&self.customization).map_err(|err| RecordError {
                field: "customization".into(),
                problem: format!("not serialisable: {err}"),
            })?;
        let mut fields = vec![
            ("userId".into(), self.user_id.clone()),
            ("username".into(), self.username.clone()),
            ("displayName".into(), self.display_name.clone()),
            ("bio".into(), self.bio.clone()),
            ("theme".into(), self.theme.clone()),
            ("customization".into(), customization),
            ("views".into(), self.views.to_string()),
            ("updatedAt".into(), self.updated_at.to_string()),
        ];
        if let Some(image) = &self.profile_image {
            fields.push(("profileImage".into(), image.clone()));
        }
        Ok(fields)
    }

    /// Decode a profile from store hash fields.
    pub fn from_fields(fields: &HashMap<String, String>) -> Result<Self, RecordError> {
        let customization = match fields.get("customization") {
            None => Customization::default(),
            Some(raw) => serde_json::from_str(raw).map_err(|err| RecordError {
                field: "customization".into(),
                problem: format!("not valid JSON: {err}"),
            })?,
        };
        Ok(Self {
            user_id: record::require(fields, "userId")?.to_owned(),
            username: record::require(fields, "username")?.to_owned(),
            display_name: record::require(fields, "displayName")?.to_owned(),
            bio: fields.get("bio").cloned().unwrap_or_default(),
            theme: fields
                .get("theme")
                .cloned()
                .unwrap_or_else(|| theme::DEFAULT_THEME_ID.into()),
            profile_image: record::optional(fields, "profileImage"),
            customization,
            views: record::i64_or_zero(fields, "views")?,
            updated_at: record::require_i64(fields, "updatedAt")?,
        })
    }
}

/// Partial profile update. `None` leaves a field alone; `customization`
/// deep-merges instead of replacing.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub theme: Option<String>,
    pub customization: Option<Customization>,
}

impl ProfilePatch {
    /// Apply this patch over `profile`, bumping `updated_at` to `now_ms`.
    pub fn apply(&self, profile: &mut Profile, now_ms: i64) {
        if let Some(display_name) = &self.display_name {
            profile.display_name = display_name.clone();
        }
        if let Some(bio) = &self.bio {
            profile.bio = bio.clone();
        }
        if let Some(theme_id) = &self.theme {
            profile.theme = theme_id.clone();
        }
        if let Some(customization) = &self.customization {
            profile.customization.merge(customization);
        }
        profile.updated_at = now_ms;
    }
}
