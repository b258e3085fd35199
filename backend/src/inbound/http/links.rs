//! Link management HTTP handlers.
//!
//! ```text
//! GET    /api/v1/links
//! POST   /api/v1/links
//! PATCH  /api/v1/links/{id}
//! DELETE /api/v1/links/{id}
//! PUT    /api/v1/links/positions
//! POST   /api/v1/links/{id}/click   (public)
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::links_service::PositionUpdate;
use crate::domain::{Error, Link, LinkDraft, LinkPatch};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionId;
use crate::inbound::http::state::HttpState;

/// Request payload for a bulk reorder.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PositionsRequest {
    pub positions: Vec<PositionUpdate>,
}

/// Response payload for a recorded click.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClickResponse {
    pub clicks: i64,
}

/// Fetch a link and verify it belongs to `user_id`, hiding other users'
/// links behind a 404.
async fn owned_link(state: &HttpState, link_id: &str, user_id: &str) -> Result<Link, Error> {
    match state.links.by_id(link_id).await? {
        Some(link) if link.user_id == user_id => Ok(link),
        _ => Err(Error::not_found("link not found")),
    }
}

/// List the authenticated user's links in display order.
#[utoipa::path(
    get,
    path = "/api/v1/links",
    responses(
        (status = 200, description = "Links in display order", body = [Link]),
        (status = 401, description = "No valid session", body = Error)
    ),
    tags = ["links"],
    operation_id = "listLinks"
)]
#[get("/links")]
pub async fn list_links(
    state: web::Data<HttpState>,
    session: SessionId,
) -> ApiResult<web::Json<Vec<Link>>> {
    let user = state.require_user(&session).await?;
    let links = state.links.links_by_user(&user.id).await?;
    Ok(web::Json(links))
}

/// Create a link for the authenticated user.
#[utoipa::path(
    post,
    path = "/api/v1/links",
    request_body = LinkDraft,
    responses(
        (status = 201, description = "Created link", body = Link),
        (status = 400, description = "Invalid URL", body = Error),
        (status = 401, description = "No valid session", body = Error)
    ),
    tags = ["links"],
    operation_id = "createLink"
)]
#[post("/links")]
pub async fn create_link(
    state: web::Data<HttpState>,
    session: SessionId,
    payload: web::Json<LinkDraft>,
) -> ApiResult<HttpResponse> {
    let user = state.require_user(&session).await?;
    let link = state.links.create(&user.id, payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(link))
}

/// Partially update one of the authenticated user's links.
#[utoipa::path(
    patch,
    path = "/api/v1/links/{id}",
    request_body = LinkPatch,
    params(("id" = String, Path, description = "Link identifier")),
    responses(
        (status = 200, description = "Updated link", body = Link),
        (status = 400, description = "Invalid URL", body = Error),
        (status = 401, description = "No valid session", body = Error),
        (status = 404, description = "No such link owned by this user", body = Error)
    ),
    tags = ["links"],
    operation_id = "updateLink"
)]
#[patch("/links/{id}")]
pub async fn update_link(
    state: web::Data<HttpState>,
    session: SessionId,
    path: web::Path<String>,
    payload: web::Json<LinkPatch>,
) -> ApiResult<web::Json<Link>> {
    let user = state.require_user(&session).await?;
    let link_id = path.into_inner();
    owned_link(&state, &link_id, &user.id).await?;

    let updated = state
        .links
        .update(&link_id, &payload.into_inner())
        .await?
        .ok_or_else(|| Error::not_found("link not found"))?;
    Ok(web::Json(updated))
}

/// Delete one of the authenticated user's links.
#[utoipa::path(
    delete,
    path = "/api/v1/links/{id}",
    params(("id" = String, Path, description = "Link identifier")),
    responses(
        (status = 204, description = "Link deleted"),
        (status = 401, description = "No valid session", body = Error),
        (status = 404, description = "No such link owned by this user", body = Error)
    ),
    tags = ["links"],
    operation_id = "deleteLink"
)]
#[delete("/links/{id}")]
pub async fn delete_link(
    state: web::Data<HttpState>,
    session: SessionId,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let user = state.require_user(&session).await?;
    let link_id = path.into_inner();
    owned_link(&state, &link_id, &user.id).await?;

    state.links.delete(&link_id, &user.id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Reorder the authenticated user's links.
///
/// Entries referencing other users' links are rejected wholesale before any
/// position is written.
#[utoipa::path(
    put,
    path = "/api/v1/links/positions",
    request_body = PositionsRequest,
    responses(
        (status = 200, description = "Links after the reorder", body = [Link]),
        (status = 401, description = "No valid session", body = Error),
        (status = 404, description = "An entry references a foreign link", body = Error)
    ),
    tags = ["links"],
    operation_id = "updateLinkPositions"
)]
#[put("/links/positions")]
pub async fn update_positions(
    state: web::Data<HttpState>,
    session: SessionId,
    payload: web::Json<PositionsRequest>,
) -> ApiResult<web::Json<Vec<Link>>> {
    let user = state.require_user(&session).await?;
    let updates = payload.into_inner().positions;

    for update in &updates {
        owned_link(&state, &update.id, &user.id).await?;
    }
    state.links.update_positions(&updates).await?;

    let links = state.links.links_by_user(&user.id).await?;
    Ok(web::Json(links))
}

/// Record a click on a link. Public: no session required.
#[utoipa::path(
    post,
    path = "/api/v1/links/{id}/click",
    params(("id" = String, Path, description = "Link identifier")),
    responses(
        (status = 200, description = "New click total", body = ClickResponse),
        (status = 404, description = "Unknown link", body = Error)
    ),
    security([]),
    tags = ["links"],
    operation_id = "recordLinkClick"
)]
#[post("/links/{id}/click")]
pub async fn record_click(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ClickResponse>> {
    let link_id = path.into_inner();
    if state.links.by_id(&link_id).await?.is_none() {
        return Err(Error::not_found("link not found"));
    }
    let clicks = state.links.record_click(&link_id).await?;
    Ok(web::Json(ClickResponse { clicks }))
}
