//! Administrative HTTP handlers, gated on the session user's admin flag.
//!
//! ```text
//! GET    /api/v1/admin/users
//! GET    /api/v1/admin/stats
//! POST   /api/v1/admin/repair
//! DELETE /api/v1/admin/users/{username}
//! ```

use actix_web::{HttpResponse, delete, get, post, web};

use crate::domain::maintenance_service::{RepairReport, SystemStats};
use crate::domain::{Error, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionId;
use crate::inbound::http::state::HttpState;

/// List every account, sorted by username.
#[utoipa::path(
    get,
    path = "/api/v1/admin/users",
    responses(
        (status = 200, description = "All accounts", body = [User]),
        (status = 401, description = "No valid session", body = Error),
        (status = 403, description = "Not an admin", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminListUsers"
)]
#[get("/admin/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    session: SessionId,
) -> ApiResult<web::Json<Vec<User>>> {
    state.require_admin(&session).await?;
    let users = state.users.all_users().await?;
    Ok(web::Json(users))
}

/// Aggregate system-wide totals.
#[utoipa::path(
    get,
    path = "/api/v1/admin/stats",
    responses(
        (status = 200, description = "System totals", body = SystemStats),
        (status = 401, description = "No valid session", body = Error),
        (status = 403, description = "Not an admin", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminSystemStats"
)]
#[get("/admin/stats")]
pub async fn system_stats(
    state: web::Data<HttpState>,
    session: SessionId,
) -> ApiResult<web::Json<SystemStats>> {
    state.require_admin(&session).await?;
    let stats = state.maintenance.system_stats().await?;
    Ok(web::Json(stats))
}

/// Run the idempotent keyspace repair pass.
#[utoipa::path(
    post,
    path = "/api/v1/admin/repair",
    responses(
        (status = 200, description = "What the repair pass changed", body = RepairReport),
        (status = 401, description = "No valid session", body = Error),
        (status = 403, description = "Not an admin", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminRepair"
)]
#[post("/admin/repair")]
pub async fn repair(
    state: web::Data<HttpState>,
    session: SessionId,
) -> ApiResult<web::Json<RepairReport>> {
    state.require_admin(&session).await?;
    let report = state.maintenance.repair_key_structure().await?;
    Ok(web::Json(report))
}

/// Remove an account and all of its data.
///
/// Admins cannot remove their own account this way; that guards against
/// locking the instance out of the admin surface.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/users/{username}",
    params(("username" = String, Path, description = "Account to remove")),
    responses(
        (status = 204, description = "Account removed"),
        (status = 400, description = "Attempted self-removal", body = Error),
        (status = 401, description = "No valid session", body = Error),
        (status = 403, description = "Not an admin", body = Error),
        (status = 404, description = "Unknown account", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminDeleteUser"
)]
#[delete("/admin/users/{username}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    session: SessionId,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let admin = state.require_admin(&session).await?;
    let username = path.into_inner();
    if admin.username.as_ref() == username {
        return Err(Error::invalid_request(
            "admins cannot remove their own account",
        ));
    }

    if !state.maintenance.clear_user_data(&username).await? {
        return Err(Error::not_found("user not found"));
    }
    Ok(HttpResponse::NoContent().finish())
}
