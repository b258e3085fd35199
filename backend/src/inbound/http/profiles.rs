//! Profile HTTP handlers: the public profile page plus owner-side editing
//! and analytics.
//!
//! ```text
//! GET   /api/v1/profiles/{username}        (public)
//! POST  /api/v1/profiles/{username}/view   (public)
//! GET   /api/v1/themes                     (public)
//! PATCH /api/v1/profile
//! POST  /api/v1/profile/image
//! GET   /api/v1/profile/analytics?days=N
//! ```

use actix_web::{get, patch, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::analytics::ProfileAnalytics;
use crate::domain::theme::{self, Theme};
use crate::domain::{Error, Link, Profile, ProfilePatch};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionId;
use crate::inbound::http::state::HttpState;

/// Hard cap on uploaded profile images. The server's payload limit must
/// admit bodies of this size so the handler gets to apply it.
pub const MAX_IMAGE_BYTES: usize = 4 * 1024 * 1024;

/// Combined payload for the public profile page.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfileResponse {
    pub profile: Profile,
    /// Catalogue entry the profile's theme id resolves to.
    pub theme: Theme,
    pub links: Vec<Link>,
}

/// Response payload for a recorded view.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ViewResponse {
    pub views: i64,
}

/// Response payload for an uploaded profile image.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageResponse {
    pub url: String,
}

/// Query parameters for the analytics window.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AnalyticsQuery {
    /// Trailing window in days; defaults to 30.
    pub days: Option<u32>,
}

/// Fetch a public profile with its visible links.
#[utoipa::path(
    get,
    path = "/api/v1/profiles/{username}",
    params(("username" = String, Path, description = "Profile owner")),
    responses(
        (status = 200, description = "Profile and public links", body = PublicProfileResponse),
        (status = 404, description = "Unknown user", body = Error)
    ),
    security([]),
    tags = ["profiles"],
    operation_id = "getPublicProfile"
)]
#[get("/profiles/{username}")]
pub async fn public_profile(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<PublicProfileResponse>> {
    let username = path.into_inner();
    let Some(profile) = state.profiles.profile(&username).await? else {
        return Err(Error::not_found("user not found"));
    };
    let links = state
        .links
        .public_links_by_username(&username)
        .await?
        .unwrap_or_default();
    let theme = *theme::by_id(&profile.theme);
    Ok(web::Json(PublicProfileResponse {
        profile,
        theme,
        links,
    }))
}

/// List the selectable themes, default first.
#[utoipa::path(
    get,
    path = "/api/v1/themes",
    responses((status = 200, description = "Theme catalogue", body = [Theme])),
    security([]),
    tags = ["profiles"],
    operation_id = "listThemes"
)]
#[get("/themes")]
pub async fn list_themes() -> web::Json<&'static [Theme]> {
    web::Json(theme::all())
}

/// Record a view of a profile page. Public: no session required.
#[utoipa::path(
    post,
    path = "/api/v1/profiles/{username}/view",
    params(("username" = String, Path, description = "Profile owner")),
    responses(
        (status = 200, description = "New view total", body = ViewResponse),
        (status = 404, description = "Unknown user", body = Error)
    ),
    security([]),
    tags = ["profiles"],
    operation_id = "recordProfileView"
)]
#[post("/profiles/{username}/view")]
pub async fn record_view(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ViewResponse>> {
    let username = path.into_inner();
    if state.profiles.profile(&username).await?.is_none() {
        return Err(Error::not_found("user not found"));
    }
    let views = state.profiles.record_view(&username).await?;
    Ok(web::Json(ViewResponse { views }))
}

/// Partially update the authenticated user's profile.
#[utoipa::path(
    patch,
    path = "/api/v1/profile",
    request_body = ProfilePatch,
    responses(
        (status = 200, description = "Updated profile", body = Profile),
        (status = 400, description = "Unknown theme", body = Error),
        (status = 401, description = "No valid session", body = Error)
    ),
    tags = ["profiles"],
    operation_id = "updateProfile"
)]
#[patch("/profile")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    session: SessionId,
    payload: web::Json<ProfilePatch>,
) -> ApiResult<web::Json<Profile>> {
    let user = state.require_user(&session).await?;
    let patch = payload.into_inner();
    if let Some(theme_id) = &patch.theme {
        if !theme::is_known(theme_id) {
            return Err(Error::invalid_request("unknown theme")
                .with_details(json!({ "field": "theme" })));
        }
    }
    let profile = state
        .profiles
        .update(user.username.as_ref(), &patch)
        .await?
        .ok_or_else(|| Error::not_found("user not found"))?;
    Ok(web::Json(profile))
}

/// Upload a new profile image, replacing the previous one.
///
/// The body is the raw image; no multipart wrapping.
#[utoipa::path(
    post,
    path = "/api/v1/profile/image",
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses(
        (status = 200, description = "URL of the stored image", body = ImageResponse),
        (status = 400, description = "Empty or oversized body", body = Error),
        (status = 401, description = "No valid session", body = Error)
    ),
    tags = ["profiles"],
    operation_id = "uploadProfileImage"
)]
#[post("/profile/image")]
pub async fn upload_image(
    state: web::Data<HttpState>,
    session: SessionId,
    body: web::Bytes,
) -> ApiResult<web::Json<ImageResponse>> {
    let user = state.require_user(&session).await?;
    if body.is_empty() {
        return Err(Error::invalid_request("image body is empty"));
    }
    if body.len() > MAX_IMAGE_BYTES {
        return Err(Error::invalid_request("image exceeds the 4 MiB limit"));
    }

    let url = state
        .profiles
        .upload_image(user.username.as_ref(), &body)
        .await?
        .ok_or_else(|| Error::not_found("user not found"))?;
    Ok(web::Json(ImageResponse { url }))
}

/// Aggregate view analytics for the authenticated user.
#[utoipa::path(
    get,
    path = "/api/v1/profile/analytics",
    params(("days" = Option<u32>, Query, description = "Trailing window in days, default 30")),
    responses(
        (status = 200, description = "View totals and daily histogram", body = ProfileAnalytics),
        (status = 401, description = "No valid session", body = Error)
    ),
    tags = ["profiles"],
    operation_id = "getProfileAnalytics"
)]
#[get("/profile/analytics")]
pub async fn analytics(
    state: web::Data<HttpState>,
    session: SessionId,
    query: web::Query<AnalyticsQuery>,
) -> ApiResult<web::Json<ProfileAnalytics>> {
    let user = state.require_user(&session).await?;
    let days = query.days.unwrap_or(30);
    let report = state
        .profiles
        .analytics(user.username.as_ref(), days)
        .await?
        .ok_or_else(|| Error::not_found("user not found"))?;
    Ok(web::Json(report))
}
